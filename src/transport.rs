//! HTTP transport for TV.com
//!
//! The scraper core only consumes the [`Transport`] trait: one blocking
//! GET for a URL and a client-identity string. [`HttpTransport`] is the
//! provided implementation, backed by a blocking reqwest client. Entities
//! carry their own identity string and pass it on every request, so one
//! transport value can serve many entities.

use std::time::Duration;

use log::debug;
use thiserror::Error;

/// Base URL for TV.com
pub(crate) const TVCOM_BASE_URL: &str = "https://www.tv.com";

/// Default client identity, mimicking a modern browser
pub const DEFAULT_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Error produced by a [`Transport`] implementation
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network-level failure
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("server returned status {0}")]
    Status(u16),

    /// Implementation-specific failure
    #[error("{0}")]
    Other(String),
}

/// Performs a single blocking HTTP GET for the scraper core.
///
/// Implementations decide their own timeout and connection behavior; the
/// core imposes none and never retries on its own.
pub trait Transport: Send + Sync {
    /// Fetch `url`, identifying as `agent`, and return the response body.
    fn fetch(&self, url: &str, agent: &str) -> std::result::Result<String, TransportError>;
}

/// Configuration for [`HttpTransport`]
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

/// Blocking HTTP transport backed by reqwest
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    /// Create a transport with default configuration.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn new() -> std::result::Result<Self, TransportError> {
        Self::with_config(TransportConfig::default())
    }

    /// Create a transport with custom configuration.
    pub fn with_config(config: TransportConfig) -> std::result::Result<Self, TransportError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn fetch(&self, url: &str, agent: &str) -> std::result::Result<String, TransportError> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, agent)
            .send()?;
        let status = response.status();
        debug!("GET {} -> {}", url, status);

        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }

        Ok(response.text()?)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_config_default() {
        let config = TransportConfig::default();
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_transport_creation() {
        let transport = HttpTransport::new();
        assert!(transport.is_ok());
    }

    #[test]
    fn test_transport_with_custom_config() {
        let config = TransportConfig { timeout_secs: 60 };
        let transport = HttpTransport::with_config(config);
        assert!(transport.is_ok());
    }

    #[test]
    fn test_stub_serves_pages_and_counts_requests() {
        let stub = stub::StubTransport::new().page("https://example.test/a", "body");

        assert_eq!(stub.fetch("https://example.test/a", "agent").unwrap(), "body");
        assert!(stub.fetch("https://example.test/b", "agent").is_err());
        assert_eq!(stub.request_count("https://example.test/a"), 1);
        assert_eq!(stub.requests().len(), 2);
    }
}
