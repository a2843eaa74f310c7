use log::{debug, info, warn};
use tokio::sync::{mpsc, watch};
use tokio::time::sleep;

use crate::config::ClientConfig;
use crate::error::WptError;
use crate::locations::{self, Locations};
use crate::result::TestResult;
use crate::settings::TestConfiguration;
use crate::status::{JobStatus, StatusUpdate};
use crate::testers::{self, Testers};
use crate::transport::{HttpTransport, Transport};
use crate::types::{Envelope, JobHandle, ResultOptions};

const CANCELLED_MARKER: &str = "Test cancelled!";
const NOT_CANCELLED_MARKER: &str = "Sorry, the test could not be cancelled.";

/// Client for one WebPageTest instance.
///
/// The client keeps no per-job state; every call is keyed by the
/// [`JobHandle`] passed in, so one client can drive any number of jobs
/// concurrently.
pub struct Client<T: Transport = HttpTransport> {
    config: ClientConfig,
    transport: T,
}

impl Client<HttpTransport> {
    pub fn new(config: ClientConfig) -> Result<Self, WptError> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self { config, transport })
    }
}

impl<T: Transport> Client<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn with_key(&self, mut params: Vec<(String, String)>) -> Vec<(String, String)> {
        if let Some(key) = &self.config.api_key {
            params.push(("k".to_string(), key.clone()));
        }
        params
    }

    fn test_param(handle: &JobHandle) -> Vec<(String, String)> {
        vec![("test".to_string(), handle.test_id.clone())]
    }

    /// Submit a test. Fails with `RemoteRejection` when the envelope status
    /// is above 200 (bad API key, invalid URL, ...).
    pub async fn submit(&self, settings: &TestConfiguration) -> Result<JobHandle, WptError> {
        let form = self.with_key(settings.form_params());
        let body = self.transport.post_form("/runtest.php", &form).await?;

        let envelope = Envelope::parse(&body)?;
        if envelope.header.status_code > 200 {
            return Err(envelope.header.rejection());
        }
        let handle: JobHandle = match envelope.data {
            Some(data) => serde_json::from_value(data)?,
            None => return Err(envelope.header.rejection()),
        };

        info!("Result URL for {}: {}", settings.url, handle.user_url);
        Ok(handle)
    }

    /// One status poll. Error statuses (code > 200) are returned as data.
    pub async fn status(&self, handle: &JobHandle) -> Result<JobStatus, WptError> {
        let body = self
            .transport
            .get("/testStatus.php", &Self::test_param(handle))
            .await?;

        let envelope = Envelope::parse(&body)?;
        let status = match envelope.data {
            Some(data) => serde_json::from_value(data)?,
            None => JobStatus::from_envelope(
                &handle.test_id,
                envelope.header.status_code,
                &envelope.header.status_text,
            ),
        };
        debug!(
            "{}: {} ({})",
            handle.test_id, status.status_text, status.status_code
        );
        Ok(status)
    }

    /// Poll until the job reaches a terminal status.
    ///
    /// Between polls the loop sleeps for the configured interval. Each
    /// non-terminal status is pushed to `progress` without waiting on the
    /// receiver; a dropped receiver is ignored. When `stop` flips to `true`
    /// the wait is abandoned with [`WptError::Cancelled`] before the next
    /// poll. Any poll failure ends the wait immediately.
    pub async fn wait_for_completion(
        &self,
        handle: &JobHandle,
        progress: Option<&mpsc::UnboundedSender<StatusUpdate>>,
        mut stop: Option<watch::Receiver<bool>>,
    ) -> Result<JobStatus, WptError> {
        loop {
            if stop.as_ref().is_some_and(|rx| *rx.borrow()) {
                info!("Stop requested while waiting for {}", handle.test_id);
                return Err(WptError::Cancelled);
            }

            let status = self.status(handle).await?;
            if status.is_terminal() {
                if status.status_code > 200 {
                    warn!(
                        "{} finished with error {}: {}",
                        handle.test_id, status.status_code, status.status_text
                    );
                }
                return Ok(status);
            }

            if let Some(tx) = progress {
                let _ = tx.send(StatusUpdate::new(&handle.test_id, &status));
            }

            self.pause(&mut stop).await;
        }
    }

    async fn pause(&self, stop: &mut Option<watch::Receiver<bool>>) {
        let interval = self.config.poll_interval;
        match stop {
            Some(rx) => {
                tokio::select! {
                    _ = sleep(interval) => {}
                    Ok(_) = rx.wait_for(|stopped| *stopped) => {}
                }
            }
            None => sleep(interval).await,
        }
    }

    /// Fetch and decode the full result. The envelope must report 200.
    pub async fn result(
        &self,
        handle: &JobHandle,
        options: ResultOptions,
    ) -> Result<TestResult, WptError> {
        let mut query = Self::test_param(handle);
        query.extend(options.query_params());
        let body = self.transport.get("/jsonResult.php", &query).await?;
        parse_result(&body)
    }

    /// Cancel a job that has not started running yet.
    pub async fn cancel(&self, handle: &JobHandle) -> Result<(), WptError> {
        let query = self.with_key(Self::test_param(handle));
        let body = self.transport.get("/cancelTest.php", &query).await?;
        parse_cancel_response(&String::from_utf8_lossy(&body))
    }

    pub async fn locations(&self) -> Result<Locations, WptError> {
        let body = self.transport.get("/getLocations.php", &json_format()).await?;
        let data = Envelope::parse(&body)?.into_ok_data()?;
        Ok(locations::group_locations(data)?)
    }

    pub async fn testers(&self) -> Result<Testers, WptError> {
        let body = self.transport.get("/getTesters.php", &json_format()).await?;
        let data = Envelope::parse(&body)?.into_ok_data()?;
        Ok(testers::collect_testers(data)?)
    }

    /// Submit, wait for a terminal status, then fetch the result.
    pub async fn run_test_and_wait(
        &self,
        settings: &TestConfiguration,
        progress: Option<&mpsc::UnboundedSender<StatusUpdate>>,
        stop: Option<watch::Receiver<bool>>,
    ) -> Result<TestResult, WptError> {
        let handle = self.submit(settings).await?;
        let status = self.wait_for_completion(&handle, progress, stop).await?;
        info!(
            "{} reached terminal status {} ({})",
            handle.test_id, status.status_code, status.status_text
        );
        self.result(&handle, ResultOptions::default()).await
    }
}

fn json_format() -> Vec<(String, String)> {
    vec![("f".to_string(), "json".to_string())]
}

/// Decode a `/jsonResult.php` body.
pub fn parse_result(body: &[u8]) -> Result<TestResult, WptError> {
    Envelope::parse(body)?.into_ok_data()
}

/// Interpret the HTML returned by `/cancelTest.php`.
pub fn parse_cancel_response(body: &str) -> Result<(), WptError> {
    if let Some(start) = body.find(NOT_CANCELLED_MARKER) {
        // The sentence runs from the marker to the closing tag.
        let message = body[start..].split('<').next().unwrap_or_default();
        return Err(WptError::CancelRejected(message.trim_end().to_string()));
    }
    if body.contains(CANCELLED_MARKER) {
        return Ok(());
    }
    Err(WptError::CancelUnknown(body.to_string()))
}
