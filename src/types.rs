use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::WptError;
use crate::lenient;

/// Status fields shared by every JSON envelope (`{statusCode, statusText, data}`).
#[derive(Debug, Clone, Deserialize)]
pub struct EnvelopeHeader {
    #[serde(rename = "statusCode")]
    pub status_code: i64,
    #[serde(rename = "statusText", default, deserialize_with = "lenient::string")]
    pub status_text: String,
}

impl EnvelopeHeader {
    pub fn ensure_ok(&self) -> Result<(), WptError> {
        if self.status_code != 200 {
            return Err(self.rejection());
        }
        Ok(())
    }

    pub fn rejection(&self) -> WptError {
        WptError::RemoteRejection {
            status_code: self.status_code,
            status_text: self.status_text.clone(),
        }
    }
}

/// A parsed envelope. The header is read before `data` is touched, so a
/// rejected request never fails on the shape of its payload.
#[derive(Debug, Clone)]
pub struct Envelope {
    pub header: EnvelopeHeader,
    pub data: Option<Value>,
}

impl Envelope {
    pub fn parse(body: &[u8]) -> Result<Self, WptError> {
        let mut value: Value = serde_json::from_slice(body)?;
        let header = EnvelopeHeader::deserialize(&value)?;
        let data = match value.get_mut("data").map(Value::take) {
            None | Some(Value::Null) => None,
            Some(Value::Array(items)) if items.is_empty() => None,
            Some(data) => Some(data),
        };
        Ok(Self { header, data })
    }

    /// Decode `data` from an envelope whose status code is exactly 200.
    pub fn into_ok_data<T: DeserializeOwned>(self) -> Result<T, WptError> {
        self.header.ensure_ok()?;
        let data = self.data.ok_or_else(|| WptError::RemoteRejection {
            status_code: self.header.status_code,
            status_text: format!("{} (response carried no data)", self.header.status_text),
        })?;
        Ok(T::deserialize(data)?)
    }
}

/// Identifies a submitted job. Every later call is keyed by `test_id`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct JobHandle {
    #[serde(rename = "testId")]
    pub test_id: String,
    #[serde(rename = "userUrl", default, deserialize_with = "lenient::string")]
    pub user_url: String,
    #[serde(rename = "jsonUrl", default, deserialize_with = "lenient::string")]
    pub json_url: String,
}

impl JobHandle {
    pub fn new(test_id: impl Into<String>) -> Self {
        Self {
            test_id: test_id.into(),
            user_url: String::new(),
            json_url: String::new(),
        }
    }
}

/// Sections of `/jsonResult.php` to include. A `false` flag asks the server
/// to leave that section out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultOptions {
    pub requests: bool,
    pub average: bool,
    pub standard: bool,
}

impl Default for ResultOptions {
    fn default() -> Self {
        Self {
            requests: true,
            average: true,
            standard: true,
        }
    }
}

impl ResultOptions {
    /// Only per-run metrics, no request tables or aggregates.
    pub fn compact() -> Self {
        Self {
            requests: false,
            average: false,
            standard: false,
        }
    }

    pub(crate) fn query_params(&self) -> Vec<(String, String)> {
        [
            ("requests", self.requests),
            ("average", self.average),
            ("standard", self.standard),
        ]
        .into_iter()
        .filter(|(_, include)| !include)
        .map(|(key, _)| (key.to_string(), "0".to_string()))
        .collect()
    }
}
