use serde::{Deserialize, Serialize};

use crate::lenient::{self, Number};

/// Coarse lifecycle stage derived from a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Stage {
    /// code < 100
    Queued,
    /// 100 <= code < 200
    Running,
    /// code == 200
    Completed,
    /// code > 200
    Failed,
}

impl Stage {
    pub fn from_code(code: i64) -> Self {
        match code {
            c if c < 100 => Stage::Queued,
            c if c < 200 => Stage::Running,
            200 => Stage::Completed,
            _ => Stage::Failed,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Stage::Completed | Stage::Failed)
    }
}

/// Echo of the submitted configuration embedded in status responses.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct TestInfo {
    #[serde(default, deserialize_with = "lenient::string")]
    pub url: String,
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub runs: Option<Number>,
    #[serde(rename = "fvonly", default, deserialize_with = "lenient::flag")]
    pub first_view_only: bool,
    /// Stop test at Document Complete
    #[serde(default, deserialize_with = "lenient::flag")]
    pub web10: bool,
    #[serde(rename = "ignoreSSL", default, deserialize_with = "lenient::flag")]
    pub ignore_ssl: bool,
    #[serde(default, deserialize_with = "lenient::string")]
    pub video: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub label: String,
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub priority: Option<Number>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub block: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub location: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub browser: String,

    #[serde(default, deserialize_with = "lenient::string")]
    pub connectivity: String,
    #[serde(rename = "bwIn", default, deserialize_with = "lenient::opt_number")]
    pub bandwidth_in: Option<Number>,
    #[serde(rename = "bwOut", default, deserialize_with = "lenient::opt_number")]
    pub bandwidth_out: Option<Number>,
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub latency: Option<Number>,
    #[serde(rename = "plr", default, deserialize_with = "lenient::opt_number")]
    pub packet_loss_rate: Option<Number>,

    #[serde(default, deserialize_with = "lenient::flag")]
    pub tcpdump: bool,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub timeline: bool,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub trace: bool,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub bodies: bool,
    #[serde(rename = "netlog", default, deserialize_with = "lenient::flag")]
    pub net_log: bool,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub standards: bool,
    #[serde(rename = "noscript", default, deserialize_with = "lenient::flag")]
    pub no_script: bool,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub pngss: bool,
    #[serde(rename = "iq", default, deserialize_with = "lenient::opt_number")]
    pub image_quality: Option<Number>,
    #[serde(rename = "keepua", default, deserialize_with = "lenient::flag")]
    pub keep_user_agent: bool,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub mobile: bool,
    #[serde(rename = "addCmdLine", default, deserialize_with = "lenient::string")]
    pub add_command_line: String,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub scripted: bool,
}

/// One observation of a job's progress. A fresh value is produced by every
/// poll; nothing updates it in place.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatus {
    #[serde(deserialize_with = "lenient::int")]
    pub status_code: i64,
    #[serde(default, deserialize_with = "lenient::string")]
    pub status_text: String,

    #[serde(default, deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub test_id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub location: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub start_time: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub complete_time: String,

    #[serde(default, deserialize_with = "lenient::int")]
    pub runs: i64,
    /// Jobs ahead of this one in the location queue
    #[serde(default, deserialize_with = "lenient::int")]
    pub behind_count: i64,

    /// Relay test
    #[serde(default, deserialize_with = "lenient::flag")]
    pub remote: bool,
    #[serde(rename = "fvonly", default, deserialize_with = "lenient::flag")]
    pub first_view_only: bool,
    /// Seconds since the job started (or was queued). Can be negative when
    /// the server clock is skewed.
    #[serde(default, deserialize_with = "lenient::int")]
    pub elapsed: i64,
    #[serde(default, deserialize_with = "lenient::int")]
    pub elapsed_update: i64,
    #[serde(default, deserialize_with = "lenient::int")]
    pub tests_expected: i64,
    #[serde(default, deserialize_with = "lenient::int")]
    pub tests_completed: i64,
    #[serde(rename = "fvRunsCompleted", default, deserialize_with = "lenient::int")]
    pub first_view_runs_completed: i64,
    #[serde(rename = "rvRunsCompleted", default, deserialize_with = "lenient::int")]
    pub repeat_view_runs_completed: i64,

    #[serde(default, deserialize_with = "lenient::opt_object")]
    pub test_info: Option<TestInfo>,
}

impl JobStatus {
    pub fn stage(&self) -> Stage {
        Stage::from_code(self.status_code)
    }

    pub fn is_terminal(&self) -> bool {
        self.stage().is_terminal()
    }

    /// Status for an error envelope that carried no status object.
    pub(crate) fn from_envelope(test_id: &str, status_code: i64, status_text: &str) -> Self {
        Self {
            status_code,
            status_text: status_text.to_string(),
            id: test_id.to_string(),
            test_id: test_id.to_string(),
            ..Default::default()
        }
    }
}

/// Progress event emitted for every non-terminal poll.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusUpdate {
    pub test_id: String,
    pub status_text: String,
    pub elapsed: i64,
    pub stage: Stage,
}

impl StatusUpdate {
    pub(crate) fn new(test_id: &str, status: &JobStatus) -> Self {
        Self {
            test_id: test_id.to_string(),
            status_text: status.status_text.clone(),
            elapsed: status.elapsed,
            stage: status.stage(),
        }
    }
}
