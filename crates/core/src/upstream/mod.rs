//! Outbound calls to the conversion API.
//!
//! The orchestrator only sees the [`UpstreamClient`] trait: a single GET that
//! yields a parsed JSON body. [`HttpUpstream`] is the reqwest-backed
//! implementation; tests substitute `testing::MockUpstream`.

mod endpoints;
mod http;

pub use endpoints::UpstreamEndpoints;
pub use http::HttpUpstream;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// A failed upstream request (non-2xx status, transport error, timeout, or a
/// body that is not JSON).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Request failed: {} {}", status_label(.status), .message)]
pub struct RequestError {
    pub url: String,
    /// HTTP status, when the upstream answered at all.
    pub status: Option<u16>,
    pub message: String,
}

fn status_label(status: &Option<u16>) -> String {
    status.map(|s| s.to_string()).unwrap_or_default()
}

impl RequestError {
    pub fn new(url: impl Into<String>, status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status,
            message: message.into(),
        }
    }

    pub(crate) fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        Self::new(url, err.status().map(|s| s.as_u16()), err.to_string())
    }
}

/// Errors building an [`HttpUpstream`].
#[derive(Debug, Error)]
pub enum UpstreamSetupError {
    #[error("Invalid value for header {name}: {source}")]
    InvalidHeader {
        name: &'static str,
        #[source]
        source: reqwest::header::InvalidHeaderValue,
    },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Fetches a URL from the conversion API.
///
/// Implementations are stateless: concurrent requests may share one client.
/// Errors are never retried at this layer.
#[async_trait]
pub trait UpstreamClient: Send + Sync {
    /// GET `url` and return the parsed JSON body.
    ///
    /// A successful reply whose body is not JSON comes back as
    /// `Value::String` holding the raw text.
    async fn fetch_json(&self, url: &str) -> Result<Value, RequestError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_error_display_with_status() {
        let err = RequestError::new("http://x", Some(503), "service unavailable");
        assert_eq!(err.to_string(), "Request failed: 503 service unavailable");
    }

    #[test]
    fn test_request_error_display_without_status() {
        let err = RequestError::new("http://x", None, "connection refused");
        assert_eq!(err.to_string(), "Request failed:  connection refused");
    }
}
