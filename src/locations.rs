use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::lenient;

/// One entry of `/getLocations.php?f=json`, keyed by location id on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
struct RawLocation {
    #[serde(rename = "Label", default, deserialize_with = "lenient::string")]
    label: String,
    #[serde(rename = "labelShort", default, deserialize_with = "lenient::string")]
    label_short: String,
    #[serde(default, deserialize_with = "lenient::string")]
    location: String,
    #[serde(rename = "Browsers", default, deserialize_with = "lenient::string")]
    browsers: String,
    #[serde(default, deserialize_with = "lenient::string")]
    status: String,
    #[serde(default, deserialize_with = "lenient::string")]
    group: String,
    #[serde(default, deserialize_with = "lenient::flag")]
    default: bool,
    #[serde(rename = "relayServer", default, deserialize_with = "lenient::string")]
    relay_server: String,
    #[serde(rename = "relayLocation", default, deserialize_with = "lenient::string")]
    relay_location: String,
    #[serde(rename = "PendingTests", default, deserialize_with = "lenient::or_default")]
    pending_tests: BTreeMap<String, i64>,
}

/// A test location (agent pool).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Location {
    pub label: String,
    pub label_short: String,
    pub location: String,
    pub browsers: Vec<String>,
    pub status: String,
    pub default: bool,
    pub relay_server: String,
    pub relay_location: String,
    /// Queue depth per priority plus `Total`, `Testing`, `Idle`, ...
    pub pending_tests: BTreeMap<String, i64>,
}

/// Locations grouped by their `group` (e.g. "Mobile Devices").
pub type Locations = BTreeMap<String, Vec<Location>>;

impl From<RawLocation> for Location {
    fn from(raw: RawLocation) -> Self {
        let browsers = raw
            .browsers
            .split(',')
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .map(str::to_string)
            .collect();
        Self {
            label: raw.label,
            label_short: raw.label_short,
            location: raw.location,
            browsers,
            status: raw.status,
            default: raw.default,
            relay_server: raw.relay_server,
            relay_location: raw.relay_location,
            pending_tests: raw.pending_tests,
        }
    }
}

/// Group the `data` object of a locations response.
pub(crate) fn group_locations(data: serde_json::Value) -> Result<Locations, serde_json::Error> {
    let raw: BTreeMap<String, RawLocation> = serde_json::from_value(data)?;
    let mut grouped = Locations::new();
    for location in raw.into_values() {
        grouped
            .entry(location.group.clone())
            .or_default()
            .push(Location::from(location));
    }
    Ok(grouped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn groups_and_splits_browsers() {
        let grouped = group_locations(json!({
            "Dulles_MotoG": {
                "Label": "Dulles, VA USA (Android, iOS 9)",
                "location": "Dulles_MotoG",
                "Browsers": "Motorola G - Chrome,Motorola G - Chrome Beta",
                "status": "OK",
                "relayServer": null,
                "relayLocation": null,
                "labelShort": "Dulles, VA",
                "group": "Mobile Devices",
                "PendingTests": {"p1": 0, "Total": 5, "Testing": 5, "Idle": 19}
            },
            "Dulles": {
                "Label": "Dulles, VA",
                "location": "Dulles",
                "Browsers": "Chrome,Firefox",
                "status": "OK",
                "group": "North America",
                "default": true,
                "PendingTests": []
            }
        }))
        .unwrap();

        let mobile = &grouped["Mobile Devices"];
        assert_eq!(mobile.len(), 1);
        assert_eq!(mobile[0].browsers.len(), 2);
        assert_eq!(mobile[0].pending_tests["Idle"], 19);
        assert_eq!(mobile[0].relay_server, "");

        let desktop = &grouped["North America"][0];
        assert!(desktop.default);
        assert!(desktop.pending_tests.is_empty());
    }
}
