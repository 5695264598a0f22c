//! HTTP/HTTPS source backend.
//!
//! Fetches published sheet exports with a blocking client. Any transport
//! failure or non-success status makes the source unavailable; nothing is
//! retried.

use std::time::Duration;

use reqwest::{blocking::Client, header::CONTENT_TYPE};

use super::{Fetched, SourceBackend};
use crate::config::DEFAULT_HTTP_TIMEOUT_SECS;
use crate::error::{Error, Result};

const USER_AGENT: &str = concat!("sheetgrid/", env!("CARGO_PKG_VERSION"));

/// A read-only source backend using HTTP/HTTPS.
///
/// # Example
///
/// ```no_run
/// use sheetgrid::backend::{HttpBackend, SourceBackend};
///
/// let backend = HttpBackend::new().unwrap();
/// let fetched = backend
///     .fetch("https://docs.google.com/spreadsheets/d/abc/export?format=csv&gid=0")
///     .unwrap();
/// println!("{} bytes", fetched.body.len());
/// ```
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
}

impl HttpBackend {
    /// Creates a new HTTP backend with the default timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_HTTP_TIMEOUT_SECS)
    }

    /// Creates a new HTTP backend with a request timeout in seconds.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_timeout(timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| Error::invalid_config(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

impl SourceBackend for HttpBackend {
    fn fetch(&self, location: &str) -> Result<Fetched> {
        let response = self
            .client
            .get(location)
            .send()
            .map_err(|e| Error::source_unavailable(location, format!("HTTP GET error: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::source_unavailable(
                location,
                format!("Failed to fetch sheet: {status}"),
            ));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = response.bytes().map_err(|e| {
            Error::source_unavailable(location, format!("Failed to read response body: {e}"))
        })?;

        tracing::info!(location, bytes = body.len(), ?content_type, "fetched sheet");
        Ok(Fetched { content_type, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn f_http_backend_new() {
        assert!(HttpBackend::new().is_ok());
        assert!(HttpBackend::with_timeout(1).is_ok());
    }

    #[test]
    fn f_http_invalid_url_is_source_unavailable() {
        let backend = HttpBackend::with_timeout(1).unwrap();
        let err = backend.fetch("not a url").unwrap_err();
        assert!(err.is_source_unavailable(), "FALSIFIED: got {err}");
    }

    #[test]
    fn f_user_agent_names_crate() {
        assert!(USER_AGENT.starts_with("sheetgrid/"));
    }
}
