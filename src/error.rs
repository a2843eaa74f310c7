use crate::median::ViewKind;

#[derive(Debug, thiserror::Error)]
pub enum WptError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Status is not OK: {status} [{body}]")]
    HttpStatus { status: u16, body: String },

    #[error("Remote rejected request ({status_code}): {status_text}")]
    RemoteRejection { status_code: i64, status_text: String },

    #[error("{0}")]
    CancelRejected(String),

    #[error("Unknown error: {0}")]
    CancelUnknown(String),

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Median selection failed: {0}")]
    Selection(#[from] SelectionError),

    #[error("Wait cancelled by caller")]
    Cancelled,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl WptError {
    /// True for errors raised because the remote service refused the request,
    /// as opposed to network or decoding failures.
    pub fn is_remote_rejection(&self) -> bool {
        matches!(
            self,
            WptError::RemoteRejection { .. }
                | WptError::CancelRejected(_)
                | WptError::CancelUnknown(_)
        )
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SelectionError {
    #[error("no eligible runs for {view}")]
    NoEligibleRuns { view: ViewKind },

    #[error("step {step} is out of range for run {run} ({available} steps)")]
    StepOutOfRange {
        run: u32,
        step: usize,
        available: usize,
    },

    #[error("metric {metric:?} is missing or not numeric in run {run}")]
    MissingMetric { run: u32, metric: String },

    #[error("step numbers start at 1")]
    InvalidStep,
}
