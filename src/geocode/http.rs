//! HTTP client abstraction for testability

use std::time::Duration;

use crate::error::{Error, Result};

/// Blocking HTTP GET, injected into the geocoding client so tests can stub responses.
pub trait HttpClient: Send + Sync {
    /// Performs an HTTP GET request and returns the response body.
    fn get(&self, url: &str) -> Result<Vec<u8>>;
}

/// Real HTTP client implementation using reqwest.
#[derive(Clone)]
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

const USER_AGENT: &str = concat!("districtscope/", env!("CARGO_PKG_VERSION"));

impl ReqwestClient {
    pub fn new(timeout_secs: u64) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::Http(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }
}

impl HttpClient for ReqwestClient {
    fn get(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url)
            .send()
            .map_err(|e| Error::Http(format!("request failed: {}", e.without_url())))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Http(format!("HTTP {status}")));
        }

        response.bytes()
            .map(|b| b.to_vec())
            .map_err(|e| Error::Http(format!("failed to read response: {}", e.without_url())))
    }
}
