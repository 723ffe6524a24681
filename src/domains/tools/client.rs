//! openFDA HTTP client.
//!
//! One GET per call, no retry. A response with any status is returned as
//! data; only failing to get a response at all is an error.

use async_trait::async_trait;
use std::borrow::Cow;
use std::time::Duration;
use tracing::{debug, error, instrument, warn};

use super::error::ToolError;
use crate::core::config::UpstreamConfig;

/// Raw upstream reply: status code plus undecoded body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl UpstreamResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as text, replacing invalid UTF-8.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

/// Anything able to perform an upstream GET.
///
/// [`RemoteClient`] is the production implementation; tests drive the
/// dispatcher with canned responses instead.
#[async_trait]
pub trait UpstreamFetch: Send + Sync {
    async fn fetch(
        &self,
        path: &str,
        params: &[(&'static str, String)],
    ) -> Result<UpstreamResponse, ToolError>;
}

/// reqwest-backed openFDA client.
#[derive(Debug, Clone)]
pub struct RemoteClient {
    base_url: String,
    timeout: Duration,
}

impl RemoteClient {
    pub fn new(config: &UpstreamConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: config.timeout(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn classify(err: reqwest::Error) -> ToolError {
        if err.is_timeout() {
            ToolError::transport("Request timed out")
        } else if err.is_connect() {
            ToolError::transport(format!("Connection failed: {}", err))
        } else {
            ToolError::transport(err.to_string())
        }
    }
}

#[async_trait]
impl UpstreamFetch for RemoteClient {
    #[instrument(skip(self, params), fields(base = %self.base_url))]
    async fn fetch(
        &self,
        path: &str,
        params: &[(&'static str, String)],
    ) -> Result<UpstreamResponse, ToolError> {
        // The client (and its connection pool) lives only for this request.
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| ToolError::internal(format!("Failed to create HTTP client: {}", e)))?;

        let url = format!("{}{}", self.base_url, path);

        let response = client
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(|e| {
                error!("openFDA request failed: {}", e);
                Self::classify(e)
            })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| {
            error!("Failed to read openFDA response body: {}", e);
            Self::classify(e)
        })?;

        if !status.is_success() {
            warn!("openFDA returned {} for {}", status, path);
        }
        debug!("openFDA response: {} ({} bytes)", status, body.len());

        Ok(UpstreamResponse::new(status.as_u16(), body.to_vec()))
    }
}
