use std::env;
use std::time::Duration;

use crate::error::WptError;

pub const DEFAULT_HOST: &str = "https://www.webpagetest.org";
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL of the instance, without trailing slash
    pub host: String,
    /// Sent as `k` with submissions and cancellations
    pub api_key: Option<String>,
    /// Delay between two status polls
    pub poll_interval: Duration,
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            api_key: None,
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    pub fn new(host: &str) -> Result<Self, WptError> {
        Ok(Self {
            host: normalize_host(host)?,
            ..Default::default()
        })
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Reads `WPT_HOST`, `WPT_API_KEY`, `WPT_POLL_INTERVAL_SECS` and
    /// `WPT_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, WptError> {
        let host = env::var("WPT_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
        let api_key = env::var("WPT_API_KEY").ok().filter(|k| !k.is_empty());
        let poll_interval = secs_from_env("WPT_POLL_INTERVAL_SECS", DEFAULT_POLL_INTERVAL_SECS)?;
        let request_timeout = secs_from_env("WPT_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?;

        Ok(Self {
            host: normalize_host(&host)?,
            api_key,
            poll_interval: Duration::from_secs(poll_interval),
            request_timeout: Duration::from_secs(request_timeout),
        })
    }
}

fn secs_from_env(name: &str, default: u64) -> Result<u64, WptError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| WptError::InvalidConfig(format!("{} must be whole seconds, got {:?}", name, raw))),
        Err(_) => Ok(default),
    }
}

pub(crate) fn normalize_host(host: &str) -> Result<String, WptError> {
    let parsed = reqwest::Url::parse(host)
        .map_err(|e| WptError::InvalidConfig(format!("invalid host {:?}: {}", host, e)))?;
    if parsed.cannot_be_a_base() {
        return Err(WptError::InvalidConfig(format!("invalid host {:?}", host)));
    }
    Ok(parsed.as_str().trim_end_matches('/').to_string())
}
