//! HTTP transport.
//!
//! Every network read goes through the [`Transport`] trait so the catalog and
//! the download loop can be exercised against fakes.

use reqwest::blocking::Client;
use std::time::Duration;
use tracing::debug;

use crate::error::{NodeenvError, Result};

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// A blocking GET returning the full response body.
pub trait Transport {
    /// Fetch `url`.
    ///
    /// Fails with [`NodeenvError::Network`] on connection errors and non-success
    /// statuses, and with [`NodeenvError::IncompleteRead`] when the body ends
    /// before the announced length.
    fn get(&self, url: &str) -> Result<Vec<u8>>;
}

/// Fetches over HTTP/HTTPS with reqwest.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a transport with the default timeout.
    pub fn new(ignore_ssl_certs: bool) -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT, ignore_ssl_certs)
    }

    /// Create a transport with a custom timeout.
    pub fn with_timeout(timeout: Duration, ignore_ssl_certs: bool) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("nodeenv/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .danger_accept_invalid_certs(ignore_ssl_certs)
            .build()
            .map_err(|e| NodeenvError::Network {
                url: String::new(),
                status: None,
                message: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> Result<Vec<u8>> {
        debug!(url, "GET");
        let response = self.client.get(url).send().map_err(|e| network(url, &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NodeenvError::Network {
                url: url.to_string(),
                status: Some(status.as_u16()),
                message: format!("HTTP {}", status),
            });
        }

        let expected = response.content_length();
        let body = response.bytes().map_err(|e| {
            if e.is_body() || e.is_decode() {
                NodeenvError::IncompleteRead {
                    url: url.to_string(),
                    message: e.to_string(),
                }
            } else {
                network(url, &e)
            }
        })?;

        if let Some(expected) = expected {
            if (body.len() as u64) < expected {
                return Err(NodeenvError::IncompleteRead {
                    url: url.to_string(),
                    message: format!("got {} of {} bytes", body.len(), expected),
                });
            }
        }

        Ok(body.to_vec())
    }
}

fn network(url: &str, err: &reqwest::Error) -> NodeenvError {
    NodeenvError::Network {
        url: url.to_string(),
        status: err.status().map(|s| s.as_u16()),
        message: err.to_string(),
    }
}
