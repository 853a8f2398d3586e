//! Request and response values crossing the interception boundary.

use std::fmt;

use bytes::Bytes;

use crate::cache::CachedResponse;
use crate::provider::HttpResponse;

/// An outbound request from the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: String,
    pub url: String,
}

impl Request {
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into().to_ascii_uppercase(),
            url: url.into(),
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new("GET", url)
    }

    pub fn is_get(&self) -> bool {
        self.method == "GET"
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.url)
    }
}

/// Where a response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseSource {
    Network,
    Cache,
    /// Made up locally because neither network nor cache could answer.
    Synthetic,
}

impl fmt::Display for ResponseSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseSource::Network => write!(f, "network"),
            ResponseSource::Cache => write!(f, "cache"),
            ResponseSource::Synthetic => write!(f, "synthetic"),
        }
    }
}

/// The response handed back to the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Bytes,
    pub source: ResponseSource,
}

impl Response {
    /// Empty "not found" standing in for an unreachable tile.
    pub fn missing_tile() -> Self {
        Self {
            status: 404,
            content_type: None,
            body: Bytes::new(),
            source: ResponseSource::Synthetic,
        }
    }

    /// "Service unavailable" for a request nothing could answer.
    pub fn unavailable() -> Self {
        Self {
            status: 503,
            content_type: Some("text/plain".to_string()),
            body: Bytes::from_static(b"Offline"),
            source: ResponseSource::Synthetic,
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

impl From<HttpResponse> for Response {
    fn from(response: HttpResponse) -> Self {
        Self {
            status: response.status,
            content_type: response.content_type,
            body: response.body,
            source: ResponseSource::Network,
        }
    }
}

impl From<CachedResponse> for Response {
    fn from(response: CachedResponse) -> Self {
        Self {
            status: response.status,
            content_type: response.content_type,
            body: response.body,
            source: ResponseSource::Cache,
        }
    }
}
