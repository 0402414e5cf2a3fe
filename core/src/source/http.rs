use std::time::Duration;

use tracing::debug;

use crate::error::GeoViewError;

/// Timeout of a single remote fetch
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

const USER_AGENT: &str = concat!("geoview/", env!("CARGO_PKG_VERSION"));

/// Performs plain HTTP GET requests. Implementations return the response
/// body, or a [`GeoViewError::SourceUnavailable`] on transport failures and
/// non-success status codes.
pub trait HttpClient {
    fn get(&self, url: &str) -> Result<Vec<u8>, GeoViewError>;
}

/// An [`HttpClient`] backed by a blocking reqwest client
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    /// Creates a client with the [`DEFAULT_TIMEOUT`]
    pub fn new() -> Result<Self, GeoViewError> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, GeoViewError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| GeoViewError::unavailable("http client", e))?;
        Ok(Self { client })
    }
}

impl HttpClient for ReqwestClient {
    fn get(&self, url: &str) -> Result<Vec<u8>, GeoViewError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| GeoViewError::unavailable(url, e))?;

        let status = response.status();
        debug!(url, %status, "received response");
        if !status.is_success() {
            return Err(GeoViewError::unavailable(url, format!("HTTP {status}")));
        }

        response
            .bytes()
            .map(|b| b.to_vec())
            .map_err(|e| GeoViewError::unavailable(url, e))
    }
}
