//! HTTP client error types.

use thiserror::Error;

/// Errors that can occur when making HTTP requests.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The request could not be constructed or sent.
    #[error("Request failed: {0}")]
    Request(String),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// No connection to the server could be established.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Failed to parse the response body.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(String),
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::Json(e.to_string())
    }
}

impl FetchError {
    /// HTTP status of the failure, when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the failure happened before any response arrived.
    pub fn is_network(&self) -> bool {
        matches!(self, FetchError::Connection(_) | FetchError::Request(_))
    }
}
