use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::lenient;

#[derive(Debug, Clone, Default, Deserialize)]
struct RawTesterPc {
    #[serde(default, deserialize_with = "lenient::string")]
    id: String,
    #[serde(rename = "pc", default, deserialize_with = "lenient::string")]
    name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    ip: String,
    #[serde(rename = "screenwidth", default, deserialize_with = "lenient::string")]
    screen_width: String,
    #[serde(rename = "screenheight", default, deserialize_with = "lenient::string")]
    screen_height: String,
    #[serde(default, deserialize_with = "lenient::string")]
    ec2: String,
    #[serde(default, deserialize_with = "lenient::string")]
    dns: String,
    #[serde(rename = "version", default, deserialize_with = "lenient::string")]
    agent_version: String,
    #[serde(rename = "ie", default, deserialize_with = "lenient::string")]
    ie_version: String,
    #[serde(rename = "winver", default, deserialize_with = "lenient::string")]
    windows_version: String,
    #[serde(rename = "freedisk", default, deserialize_with = "lenient::string")]
    free_disk: String,
    #[serde(rename = "isWinServer", default, deserialize_with = "lenient::flag")]
    is_win_server: bool,
    #[serde(rename = "isWin64", default, deserialize_with = "lenient::flag")]
    is_win64: bool,
    #[serde(default, deserialize_with = "lenient::flag")]
    offline: bool,
    #[serde(default, deserialize_with = "lenient::flag")]
    rebooted: bool,
    #[serde(rename = "GPU", default, deserialize_with = "lenient::flag")]
    gpu: bool,
    #[serde(default, deserialize_with = "lenient::int")]
    cpu: i64,
    #[serde(default, deserialize_with = "lenient::int")]
    errors: i64,
    #[serde(default, deserialize_with = "lenient::int")]
    elapsed: i64,
    #[serde(default, deserialize_with = "lenient::int")]
    last: i64,
    #[serde(default, deserialize_with = "lenient::flag")]
    busy: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RawLocationTesters {
    #[serde(default, deserialize_with = "lenient::string")]
    status: String,
    #[serde(default, deserialize_with = "lenient::or_default")]
    testers: Vec<RawTesterPc>,
}

/// A test agent machine.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Tester {
    pub id: String,
    pub name: String,
    pub agent_version: String,

    pub error_rate: i64,
    pub elapsed: i64,
    /// Minutes since last work
    pub last_work: i64,
    pub is_rebooted: bool,
    pub is_offline: bool,
    pub is_busy: bool,

    pub ec2: String,
    pub ip: String,
    pub dns: String,

    pub screen_width: i64,
    pub screen_height: i64,

    pub ie_version: String,
    pub windows_version: String,
    pub is_win_server: bool,
    pub is_win64: bool,

    /// Free disk in GB
    pub free_disk: f64,
    pub gpu: bool,
    /// CPU utilization
    pub cpu: i64,
}

/// Testers keyed by location id.
pub type Testers = BTreeMap<String, Vec<Tester>>;

impl From<RawTesterPc> for Tester {
    fn from(raw: RawTesterPc) -> Self {
        Self {
            id: raw.id,
            name: raw.name,
            agent_version: raw.agent_version,
            error_rate: raw.errors,
            elapsed: raw.elapsed,
            last_work: raw.last,
            is_rebooted: raw.rebooted,
            is_offline: raw.offline,
            is_busy: raw.busy,
            ec2: raw.ec2,
            ip: raw.ip,
            dns: raw.dns,
            screen_width: raw.screen_width.trim().parse().unwrap_or(0),
            screen_height: raw.screen_height.trim().parse().unwrap_or(0),
            ie_version: raw.ie_version,
            windows_version: raw.windows_version,
            is_win_server: raw.is_win_server,
            is_win64: raw.is_win64,
            free_disk: raw.free_disk.trim().parse().unwrap_or(0.0),
            gpu: raw.gpu,
            cpu: raw.cpu,
        }
    }
}

/// Testers of every location reporting `OK`; offline locations are skipped.
pub(crate) fn collect_testers(data: serde_json::Value) -> Result<Testers, serde_json::Error> {
    let raw: BTreeMap<String, RawLocationTesters> = serde_json::from_value(data)?;
    Ok(raw
        .into_iter()
        .filter(|(_, location)| location.status.eq_ignore_ascii_case("OK"))
        .map(|(id, location)| {
            let testers = location.testers.into_iter().map(Tester::from).collect();
            (id, testers)
        })
        .collect())
}
