//! Handle to an opened cache namespace.

use std::fmt;
use std::sync::Arc;

use super::traits::{CacheError, Namespace};
use super::types::{CachedResponse, NamespaceStats};

/// Cheap, cloneable handle returned by [`CacheStore::open`].
///
/// A handle keeps working after another holder deletes the namespace, but
/// what it sees then is provider specific: the memory provider keeps the
/// detached entries, the disk provider reports misses and fails writes.
///
/// [`CacheStore::open`]: super::CacheStore::open
#[derive(Clone)]
pub struct CacheHandle {
    inner: Arc<dyn Namespace>,
}

impl CacheHandle {
    pub fn new(inner: Arc<dyn Namespace>) -> Self {
        Self { inner }
    }

    /// Namespace name.
    pub fn name(&self) -> &str {
        self.inner.name()
    }

    /// Exact-URL lookup. A miss is `Ok(None)`.
    pub async fn match_url(&self, url: &str) -> Result<Option<CachedResponse>, CacheError> {
        self.inner.get(url).await
    }

    /// Store or overwrite the entry for `url`.
    pub async fn put(&self, url: &str, response: CachedResponse) -> Result<(), CacheError> {
        self.inner.put(url, response).await
    }

    /// Remove the entry for `url`.
    pub async fn delete(&self, url: &str) -> Result<bool, CacheError> {
        self.inner.delete(url).await
    }

    /// All stored URLs, sorted.
    pub async fn keys(&self) -> Result<Vec<String>, CacheError> {
        self.inner.keys().await
    }

    pub async fn stats(&self) -> Result<NamespaceStats, CacheError> {
        self.inner.stats().await
    }
}

impl fmt::Debug for CacheHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheHandle")
            .field("name", &self.name())
            .finish()
    }
}
