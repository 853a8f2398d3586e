//! Core traits for the namespaced response cache.
//!
//! A [`CacheStore`] is a registry of named namespaces; each namespace is a
//! [`Namespace`] mapping exact request URLs to complete stored responses.
//! The split mirrors what a client platform offers: open a cache by name,
//! then match/put entries inside it, and enumerate or delete whole caches.
//!
//! # Design Principles
//!
//! - **URL keys**: keys are the canonical request URL, never rewritten
//! - **Whole responses**: a hit always returns the full stored response
//! - **Dyn-compatible**: async methods return [`BoxFuture`] so stores can be
//!   shared as `Arc<dyn CacheStore>`
//! - **No policy**: stores never decide what is cacheable; callers only put
//!   successful responses

use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

use super::handle::CacheHandle;
use super::types::{CachedResponse, NamespaceStats};

/// Boxed future type for dyn-compatible async methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Maximum namespace name length.
pub const MAX_NAMESPACE_LEN: usize = 128;

/// Errors that can occur during cache operations.
#[derive(Debug, Error)]
pub enum CacheError {
    /// I/O error during cache operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored entry could not be encoded or decoded.
    #[error("Entry encoding error: {0}")]
    Encode(String),

    /// Namespace name is empty, too long, or has unsupported characters.
    #[error("Invalid cache namespace name: '{0}'")]
    InvalidNamespace(String),

    /// Failed to spawn background task.
    #[error("Failed to spawn task: {0}")]
    SpawnError(String),
}

impl From<bincode::Error> for CacheError {
    fn from(e: bincode::Error) -> Self {
        CacheError::Encode(e.to_string())
    }
}

/// Entries of a single cache namespace.
///
/// Implementations must be safe to call concurrently. Writes for the same
/// URL are last-write-wins.
pub trait Namespace: Send + Sync {
    /// Name this namespace was opened with.
    fn name(&self) -> &str;

    /// Look up the response stored for exactly this URL.
    ///
    /// A miss is `Ok(None)`, never an error.
    fn get(&self, url: &str) -> BoxFuture<'_, Result<Option<CachedResponse>, CacheError>>;

    /// Store or overwrite the response for this URL.
    fn put(&self, url: &str, response: CachedResponse) -> BoxFuture<'_, Result<(), CacheError>>;

    /// Remove the entry for this URL. Returns `true` if it existed.
    fn delete(&self, url: &str) -> BoxFuture<'_, Result<bool, CacheError>>;

    /// All URLs currently stored, sorted.
    fn keys(&self) -> BoxFuture<'_, Result<Vec<String>, CacheError>>;

    /// Entry count and total body size.
    fn stats(&self) -> BoxFuture<'_, Result<NamespaceStats, CacheError>>;
}

/// Registry of named cache namespaces.
pub trait CacheStore: Send + Sync {
    /// Open a namespace, creating it if absent. Idempotent.
    fn open(&self, name: &str) -> BoxFuture<'_, Result<CacheHandle, CacheError>>;

    /// Names of every namespace that currently exists, sorted.
    fn list_namespaces(&self) -> BoxFuture<'_, Result<Vec<String>, CacheError>>;

    /// Remove a namespace and all of its entries. Returns `true` if it existed.
    fn delete_namespace(&self, name: &str) -> BoxFuture<'_, Result<bool, CacheError>>;
}

/// Checks a namespace name against the characters every provider can store.
///
/// Names double as directory names for the disk provider, so they are kept
/// to `[A-Za-z0-9._@-]` and may not start with a dot.
pub fn validate_namespace_name(name: &str) -> Result<(), CacheError> {
    let valid = !name.is_empty()
        && name.len() <= MAX_NAMESPACE_LEN
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '@' | '-'));

    if valid {
        Ok(())
    } else {
        Err(CacheError::InvalidNamespace(name.to_string()))
    }
}
