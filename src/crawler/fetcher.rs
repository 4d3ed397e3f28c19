//! Fail-soft page fetcher
//!
//! This module retrieves the raw bytes of every collected result page:
//! - Building the HTTP client with a browser-like user agent and timeout
//! - GET requests following redirects
//! - Swallowing every failure into empty content
//!
//! A single unreachable page must never abort a day, so [`PageFetcher`]
//! has no error channel at all.

use crate::config::FetcherConfig;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Retrieves page content for a URL
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Returns the response body, or empty bytes on any failure
    async fn fetch(&self, url: &str) -> Vec<u8>;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The fetcher configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use news_sweep::config::FetcherConfig;
/// use news_sweep::crawler::build_http_client;
///
/// let client = build_http_client(&FetcherConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &FetcherConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.timeout))
        .connect_timeout(Duration::from_secs(config.timeout.min(10)))
        .gzip(true)
        .brotli(true)
        .build()
}

/// [`PageFetcher`] over a shared `reqwest` client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds the client from `config` and wraps it
    pub fn from_config(config: &FetcherConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(config)?))
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    /// Fetches `url`
    ///
    /// # Outcomes
    ///
    /// | Condition | Result |
    /// |-----------|--------|
    /// | HTTP 2xx | Response body |
    /// | HTTP 4xx / 5xx | Empty |
    /// | Timeout, DNS, connection or TLS error | Empty |
    /// | Body read error | Empty |
    async fn fetch(&self, url: &str) -> Vec<u8> {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!("Fetch failed for {}: {}", url, e);
                return Vec::new();
            }
        };

        let status = response.status();
        if !status.is_success() {
            tracing::debug!("Fetch of {} returned HTTP {}", url, status.as_u16());
            return Vec::new();
        }

        match response.bytes().await {
            Ok(body) => {
                tracing::trace!("Fetched {} ({} bytes)", url, body.len());
                body.to_vec()
            }
            Err(e) => {
                tracing::debug!("Failed to read body of {}: {}", url, e);
                Vec::new()
            }
        }
    }
}
