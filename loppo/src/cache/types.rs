//! Cached response value and namespace statistics.

use std::fmt;

use bytes::Bytes;

/// A complete stored response: status, content type, and body.
///
/// Cloning is cheap; the body is reference counted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedResponse {
    /// HTTP status code.
    pub status: u16,
    /// Value of the `Content-Type` header, if any.
    pub content_type: Option<String>,
    /// Response body.
    pub body: Bytes,
}

impl CachedResponse {
    pub fn new(status: u16, content_type: Option<String>, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            content_type,
            body: body.into(),
        }
    }

    /// True for 2xx statuses, the only responses callers may store.
    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body length in bytes.
    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Size summary of one namespace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NamespaceStats {
    /// Number of stored entries.
    pub entries: u64,
    /// Stored size in bytes: body bytes in memory, file bytes on disk.
    pub bytes: u64,
}

impl fmt::Display for NamespaceStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} entries, {} bytes", self.entries, self.bytes)
    }
}
