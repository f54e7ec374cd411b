//! Store error types.

use thiserror::Error;

/// Errors raised by a product store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("HTTP error: {status} for {url}")]
    Http { status: u16, url: String },

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Connection error: {0}")]
    Connection(String),

    /// Payload did not have the expected shape.
    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Request error: {0}")]
    Request(String),
}

impl StoreError {
    /// HTTP status, when the store answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            StoreError::Http { status, .. } => Some(*status),
            StoreError::NotFound(_) => Some(404),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(e: reqwest::Error) -> Self {
        let url = e.url().map(|u| u.to_string()).unwrap_or_default();
        if e.is_timeout() {
            StoreError::Timeout(url)
        } else if e.is_connect() {
            StoreError::Connection(e.to_string())
        } else if e.is_decode() {
            StoreError::Malformed(e.to_string())
        } else if let Some(status) = e.status() {
            StoreError::Http {
                status: status.as_u16(),
                url,
            }
        } else {
            StoreError::Request(e.to_string())
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Malformed(e.to_string())
    }
}
