//! HTTP transport seam.
//!
//! The resolver and pipeline only see [`Transport`]; [`HttpTransport`] is the
//! reqwest-backed implementation used by the binary.

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::config::HttpConfig;
use crate::error::FetchError;

/// Raw response: status code plus body bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl FetchResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The request never produced a response (connect failure, timeout, ...)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Request to {url} failed: {message}")]
pub struct TransportError {
    pub url: String,
    pub message: String,
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchResponse, TransportError>;
}

/// reqwest-backed transport
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a new transport with the configured timeout and user agent
    pub fn new(config: &HttpConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self, url: &str) -> Result<FetchResponse, TransportError> {
        let to_error =
            |e: reqwest::Error| TransportError { url: url.to_string(), message: e.to_string() };

        let response = self.client.get(url).send().await.map_err(to_error)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(to_error)?.to_vec();

        debug!("GET {} -> {} ({} bytes)", url, status, body.len());
        Ok(FetchResponse { status, body })
    }
}

/// Fetch a document and decode it as JSON.
///
/// Non-success statuses are errors; the body is never decoded in that case.
pub async fn fetch_json<T: DeserializeOwned>(
    transport: &dyn Transport,
    url: &str,
) -> Result<T, FetchError> {
    let response = transport.fetch(url).await?;

    if !response.is_success() {
        return Err(FetchError::Status { url: url.to_string(), status: response.status });
    }

    serde_json::from_slice(&response.body)
        .map_err(|source| FetchError::Decode { url: url.to_string(), source })
}
