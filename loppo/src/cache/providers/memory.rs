//! In-memory cache store using moka.
//!
//! Each namespace wraps a `moka::future::Cache` weighted by body size. The
//! namespace registry itself is a `DashMap`, so opening and deleting
//! namespaces never blocks readers of other namespaces.
//!
//! Namespaces are unbounded unless a capacity is configured: the tile
//! namespace is expected to keep everything that was put into it.

use std::sync::Arc;

use dashmap::DashMap;
use moka::future::Cache as MokaCache;

use crate::cache::handle::CacheHandle;
use crate::cache::traits::{
    validate_namespace_name, BoxFuture, CacheError, CacheStore, Namespace,
};
use crate::cache::types::{CachedResponse, NamespaceStats};

/// A single in-memory namespace.
pub struct MemoryNamespace {
    name: String,
    cache: MokaCache<String, CachedResponse>,
}

impl MemoryNamespace {
    fn new(name: &str, capacity_bytes: Option<u64>) -> Self {
        let mut builder = MokaCache::builder()
            // Weight each entry by its body size
            .weigher(|_key: &String, value: &CachedResponse| -> u32 {
                value.len().min(u32::MAX as usize) as u32
            });

        if let Some(capacity) = capacity_bytes {
            builder = builder.max_capacity(capacity);
        }

        Self {
            name: name.to_string(),
            cache: builder.build(),
        }
    }
}

impl Namespace for MemoryNamespace {
    fn name(&self) -> &str {
        &self.name
    }

    fn get(&self, url: &str) -> BoxFuture<'_, Result<Option<CachedResponse>, CacheError>> {
        let url = url.to_string();
        Box::pin(async move { Ok(self.cache.get(&url).await) })
    }

    fn put(&self, url: &str, response: CachedResponse) -> BoxFuture<'_, Result<(), CacheError>> {
        let url = url.to_string();
        Box::pin(async move {
            self.cache.insert(url, response).await;
            Ok(())
        })
    }

    fn delete(&self, url: &str) -> BoxFuture<'_, Result<bool, CacheError>> {
        let url = url.to_string();
        Box::pin(async move { Ok(self.cache.remove(&url).await.is_some()) })
    }

    fn keys(&self) -> BoxFuture<'_, Result<Vec<String>, CacheError>> {
        Box::pin(async move {
            let mut keys: Vec<String> = self
                .cache
                .iter()
                .map(|(key, _)| key.as_ref().clone())
                .collect();
            keys.sort();
            Ok(keys)
        })
    }

    fn stats(&self) -> BoxFuture<'_, Result<NamespaceStats, CacheError>> {
        Box::pin(async move {
            // moka counters are eventually consistent
            self.cache.run_pending_tasks().await;
            Ok(NamespaceStats {
                entries: self.cache.entry_count(),
                bytes: self.cache.weighted_size(),
            })
        })
    }
}

/// In-memory namespace registry.
///
/// Contents do not survive the process. Used by tests and by the
/// `memory` cache backend.
pub struct MemoryCacheStore {
    namespaces: DashMap<String, Arc<MemoryNamespace>>,
    capacity_bytes: Option<u64>,
}

impl MemoryCacheStore {
    /// Create a store whose namespaces are unbounded.
    pub fn new() -> Self {
        Self::with_capacity(None)
    }

    /// Create a store whose namespaces each hold at most `capacity_bytes`.
    pub fn with_capacity(capacity_bytes: Option<u64>) -> Self {
        Self {
            namespaces: DashMap::new(),
            capacity_bytes,
        }
    }
}

impl Default for MemoryCacheStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheStore for MemoryCacheStore {
    fn open(&self, name: &str) -> BoxFuture<'_, Result<CacheHandle, CacheError>> {
        let name = name.to_string();
        Box::pin(async move {
            validate_namespace_name(&name)?;
            let namespace = {
                let entry = self.namespaces.entry(name.clone()).or_insert_with(|| {
                    Arc::new(MemoryNamespace::new(&name, self.capacity_bytes))
                });
                Arc::clone(entry.value())
            };
            Ok(CacheHandle::new(namespace))
        })
    }

    fn list_namespaces(&self) -> BoxFuture<'_, Result<Vec<String>, CacheError>> {
        Box::pin(async move {
            let mut names: Vec<String> = self
                .namespaces
                .iter()
                .map(|entry| entry.key().clone())
                .collect();
            names.sort();
            Ok(names)
        })
    }

    fn delete_namespace(&self, name: &str) -> BoxFuture<'_, Result<bool, CacheError>> {
        let name = name.to_string();
        Box::pin(async move {
            validate_namespace_name(&name)?;
            Ok(self.namespaces.remove(&name).is_some())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tile(body: &[u8]) -> CachedResponse {
        CachedResponse::new(200, Some("image/png".to_string()), body.to_vec())
    }

    #[tokio::test]
    async fn test_open_is_idempotent() {
        let store = MemoryCacheStore::new();

        let first = store.open("loppo-tiles").await.unwrap();
        first.put("https://t/1.png", tile(&[1])).await.unwrap();

        let second = store.open("loppo-tiles").await.unwrap();
        assert_eq!(
            second.match_url("https://t/1.png").await.unwrap(),
            Some(tile(&[1]))
        );
        assert_eq!(store.list_namespaces().await.unwrap(), vec!["loppo-tiles"]);
    }

    #[tokio::test]
    async fn test_match_miss_is_none() {
        let store = MemoryCacheStore::new();
        let handle = store.open("ns").await.unwrap();

        assert!(handle.match_url("https://missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let store = MemoryCacheStore::new();
        let handle = store.open("ns").await.unwrap();

        handle.put("https://t/1.png", tile(&[1, 2])).await.unwrap();
        handle.put("https://t/1.png", tile(&[3])).await.unwrap();

        assert_eq!(
            handle.match_url("https://t/1.png").await.unwrap(),
            Some(tile(&[3]))
        );
        assert_eq!(handle.stats().await.unwrap().entries, 1);
    }

    #[tokio::test]
    async fn test_keys_sorted() {
        let store = MemoryCacheStore::new();
        let handle = store.open("ns").await.unwrap();

        handle.put("https://b", tile(&[1])).await.unwrap();
        handle.put("https://a", tile(&[2])).await.unwrap();

        assert_eq!(handle.keys().await.unwrap(), vec!["https://a", "https://b"]);
    }

    #[tokio::test]
    async fn test_delete_entry() {
        let store = MemoryCacheStore::new();
        let handle = store.open("ns").await.unwrap();

        handle.put("https://a", tile(&[1])).await.unwrap();
        assert!(handle.delete("https://a").await.unwrap());
        assert!(!handle.delete("https://a").await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_namespace() {
        let store = MemoryCacheStore::new();
        let handle = store.open("old").await.unwrap();
        handle.put("https://a", tile(&[1])).await.unwrap();

        assert!(store.delete_namespace("old").await.unwrap());
        assert!(!store.delete_namespace("old").await.unwrap());
        assert!(store.list_namespaces().await.unwrap().is_empty());

        // Re-opening starts empty
        let reopened = store.open("old").await.unwrap();
        assert!(reopened.match_url("https://a").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_invalid_namespace_rejected() {
        let store = MemoryCacheStore::new();
        assert!(matches!(
            store.open("../escape").await,
            Err(CacheError::InvalidNamespace(_))
        ));
    }

    #[tokio::test]
    async fn test_stats_track_body_bytes() {
        let store = MemoryCacheStore::new();
        let handle = store.open("ns").await.unwrap();

        handle.put("https://a", tile(&[0u8; 1000])).await.unwrap();
        handle.put("https://b", tile(&[0u8; 2000])).await.unwrap();

        let stats = handle.stats().await.unwrap();
        assert_eq!(stats.entries, 2);
        assert_eq!(stats.bytes, 3000);
    }

    #[tokio::test]
    async fn test_concurrent_puts_same_url() {
        let store = Arc::new(MemoryCacheStore::new());
        let handle = store.open("ns").await.unwrap();
        let mut tasks = Vec::new();

        for _ in 0..20 {
            let handle = handle.clone();
            tasks.push(tokio::spawn(async move {
                handle.put("https://t/1.png", tile(&[7, 7])).await.unwrap();
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(
            handle.match_url("https://t/1.png").await.unwrap(),
            Some(tile(&[7, 7]))
        );
    }
}
