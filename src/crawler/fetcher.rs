//! HTTP fetcher implementation
//!
//! This module handles the HTTP requests for source pages, including:
//! - Building HTTP clients with proper user agent strings
//! - GET requests bounded by the configured timeout
//! - Error classification into timeout, status and network failures

use crate::config::UserAgentConfig;
use crate::HarvestError;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Fetches page bodies over HTTP
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Returns the response body of `url` as text
    ///
    /// Non-success status codes are reported as errors.
    async fn fetch(&self, url: &str) -> Result<String, HarvestError>;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `timeout` - Upper bound on each request, connect through body
///
/// # Example
///
/// ```no_run
/// use news_harvest::config::UserAgentConfig;
/// use news_harvest::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(10)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .gzip(true)
        .brotli(true)
        .build()
}

/// reqwest-backed page fetcher
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher with its own client
    pub fn new(config: &UserAgentConfig, timeout: Duration) -> Result<Self, HarvestError> {
        Ok(Self {
            client: build_http_client(config, timeout)?,
        })
    }

    /// Creates a fetcher sharing an existing client
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, HarvestError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| HarvestError::from_request(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(HarvestError::HttpStatus {
                url: url.to_string(),
                status_code: status.as_u16(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| HarvestError::from_request(url, e))
    }
}
