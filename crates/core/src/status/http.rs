//! HTTP status sink.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::config::Config;

use super::error::StatusReportError;
use super::traits::StatusSink;
use super::types::StatusUpdate;

/// Posts status updates as JSON to a fixed URL.
pub struct HttpStatusSink {
    client: Client,
    url: String,
}

impl HttpStatusSink {
    /// Creates a sink for `url` with the given request timeout.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, StatusReportError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StatusReportError::ClientSetup(e.to_string()))?;

        Ok(Self::with_client(client, url))
    }

    /// Creates a sink that uses an existing HTTP client.
    pub fn with_client(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    /// Creates a sink for the configured status URL.
    pub fn from_config(config: &Config) -> Result<Self, StatusReportError> {
        Self::new(
            config.status_update_url.clone(),
            Duration::from_secs(config.status_timeout_secs),
        )
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl StatusSink for HttpStatusSink {
    fn name(&self) -> &str {
        "http"
    }

    async fn deliver(&self, update: &StatusUpdate) -> Result<(), StatusReportError> {
        let response = self
            .client
            .post(&self.url)
            .json(update)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    StatusReportError::Timeout
                } else if e.is_connect() {
                    StatusReportError::ConnectionFailed(e.to_string())
                } else {
                    StatusReportError::Request(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(StatusReportError::Rejected {
                status: status.as_u16(),
            });
        }

        debug!("Status update accepted with HTTP {}", status.as_u16());
        Ok(())
    }
}
