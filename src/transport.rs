use async_trait::async_trait;
use log::debug;
use reqwest::Client;

use crate::config::ClientConfig;
use crate::error::WptError;

/// Raw request/response plumbing. Paths are relative to the configured host
/// (`/testStatus.php`); bodies are returned untouched.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, path: &str, query: &[(String, String)]) -> Result<Vec<u8>, WptError>;

    async fn post_form(&self, path: &str, form: &[(String, String)]) -> Result<Vec<u8>, WptError>;
}

/// `Transport` backed by a shared reqwest client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    host: String,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, WptError> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self {
            client,
            host: config.host.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.host, path)
    }

    async fn read(response: reqwest::Response) -> Result<Vec<u8>, WptError> {
        let status = response.status();
        let body = response.bytes().await?;
        if !status.is_success() {
            return Err(WptError::HttpStatus {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }
        Ok(body.to_vec())
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, path: &str, query: &[(String, String)]) -> Result<Vec<u8>, WptError> {
        let url = self.url(path);
        debug!("GET {}", url);
        let response = self.client.get(&url).query(query).send().await?;
        Self::read(response).await
    }

    async fn post_form(&self, path: &str, form: &[(String, String)]) -> Result<Vec<u8>, WptError> {
        let url = self.url(path);
        debug!("POST {} ({} fields)", url, form.len());
        let response = self.client.post(&url).form(form).send().await?;
        Self::read(response).await
    }
}
