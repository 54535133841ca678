//! HTTP fetch capability backed by reqwest.
//!
//! ### What counts as a failure
//! Any HTTP status, including 4xx and 5xx, is a completed fetch and is
//! returned as a [`Response`]. Only transport errors, timeouts and bodies
//! over `max_bytes` become `Error::NetworkFailure`.
//!
//! ### Limits
//! - Max redirects: 5
//! - Max body bytes: 5MB (configurable)
//! - Request timeout: 20s (configurable)

pub mod url;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, Method, header};
use std::time::{Duration, Instant};

pub use url::{UrlError, canonicalize};

use swcache_core::{AppConfig, Error, Fetcher, Request, Response};

/// Configuration for the fetch client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string (default: "swcache/0.1")
    pub user_agent: String,

    /// Maximum response body size in bytes (default: 5MB)
    pub max_bytes: usize,

    /// Request timeout (default: 20s)
    pub timeout: Duration,

    /// Maximum number of redirects to follow (default: 5)
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "swcache/0.1".to_string(),
            max_bytes: 5 * 1024 * 1024,
            timeout: Duration::from_millis(20000),
            max_redirects: 5,
        }
    }
}

impl From<&AppConfig> for FetchConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            max_bytes: config.max_bytes,
            timeout: config.timeout(),
            ..Default::default()
        }
    }
}

/// HTTP client implementing [`Fetcher`].
pub struct FetchClient {
    http: Client,
    config: FetchConfig,
}

impl FetchClient {
    /// Create a new fetch client with the given configuration.
    pub fn new(config: FetchConfig) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::NetworkFailure(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    fn check_size(&self, len: usize) -> Result<(), Error> {
        if len > self.config.max_bytes {
            return Err(Error::NetworkFailure(format!("{} bytes exceeds {}", len, self.config.max_bytes)));
        }
        Ok(())
    }
}

/// Flatten a header map into ordered name/value pairs, skipping non-UTF-8 values.
fn header_pairs(headers: &header::HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .filter_map(|(name, value)| value.to_str().ok().map(|v| (name.as_str().to_string(), v.to_string())))
        .collect()
}

#[async_trait]
impl Fetcher for FetchClient {
    async fn fetch(&self, request: &Request) -> Result<Response, Error> {
        let start = Instant::now();
        let url = canonicalize(&request.url).map_err(|e| Error::InvalidUrl(e.to_string()))?;
        let method = Method::from_bytes(request.method.as_bytes())
            .map_err(|_| Error::InvalidInput(format!("invalid method: {}", request.method)))?;

        let response = self
            .http
            .request(method, url.as_str())
            .send()
            .await
            .map_err(|e| Error::NetworkFailure(format!("network error: {}", e)))?;

        let status = response.status();
        if let Some(len) = response.content_length() {
            self.check_size(len as usize)?;
        }
        let headers = header_pairs(response.headers());

        let bytes: Bytes = response
            .bytes()
            .await
            .map_err(|e| Error::NetworkFailure(format!("failed to read response: {}", e)))?;
        self.check_size(bytes.len())?;

        tracing::debug!(
            "fetched {} {} -> {} in {}ms ({} bytes)",
            request.method,
            url,
            status.as_u16(),
            start.elapsed().as_millis(),
            bytes.len()
        );

        Ok(Response { status: status.as_u16(), headers, body: bytes.to_vec() })
    }
}
