//! Client for a WebPageTest instance: submit a page-load test, poll it to
//! completion and decode its per-run, per-view, per-step metrics.

pub mod client;
pub mod config;
pub mod error;
pub mod lenient;
pub mod locations;
pub mod median;
pub mod result;
pub mod settings;
pub mod status;
pub mod testers;
pub mod transport;
pub mod types;

pub use client::Client;
pub use config::ClientConfig;
pub use error::{SelectionError, WptError};
pub use lenient::Number;
pub use median::{select_median, select_medians, MedianRun, Medians, ViewKind, DEFAULT_METRIC};
pub use result::{Run, Step, TestResult, View};
pub use settings::TestConfiguration;
pub use status::{JobStatus, Stage, StatusUpdate};
pub use transport::{HttpTransport, Transport};
pub use types::{JobHandle, ResultOptions};
