//! Network response and error types.

use bytes::Bytes;
use thiserror::Error;

use crate::cache::CachedResponse;

/// Transport-level failure: the request produced no HTTP response at all.
///
/// Any HTTP status, including 4xx and 5xx, is a response, not an error.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NetworkError {
    /// Could not reach the host (offline, DNS, refused connection).
    #[error("Connection failed for {url}: {reason}")]
    Connect { url: String, reason: String },

    /// The request did not complete in time.
    #[error("Request to {url} timed out")]
    Timeout { url: String },

    /// The body could not be read.
    #[error("Failed to read body from {url}: {reason}")]
    Body { url: String, reason: String },

    /// The client could not be constructed or the request was malformed.
    #[error("HTTP client error: {0}")]
    Client(String),

    /// Network access is disabled.
    #[error("Offline: {url} not fetched")]
    Offline { url: String },
}

/// A complete HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl HttpResponse {
    pub fn new(status: u16, content_type: Option<String>, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            content_type,
            body: body.into(),
        }
    }

    /// True for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

impl From<HttpResponse> for CachedResponse {
    fn from(response: HttpResponse) -> Self {
        CachedResponse::new(response.status, response.content_type, response.body)
    }
}
