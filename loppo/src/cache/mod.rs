//! Namespaced response cache.
//!
//! Entries are keyed by exact request URL and hold complete responses.
//! Namespaces are created on first open and live until deleted.
//!
//! # Architecture
//!
//! ```text
//! CacheService ──► Arc<dyn CacheStore> ──open(name)──► CacheHandle
//!                    │                                   │
//!                    ├─ MemoryCacheStore (moka)          ├─ match_url / put
//!                    └─ DiskCacheStore (files)           └─ keys / delete / stats
//! ```

mod handle;
mod providers;
mod service;
mod traits;
mod types;

pub use handle::CacheHandle;
pub use providers::{DiskCacheStore, DiskNamespace, MemoryCacheStore, MemoryNamespace};
pub use service::{CacheService, StoreConfig};
pub use traits::{
    validate_namespace_name, BoxFuture, CacheError, CacheStore, Namespace, MAX_NAMESPACE_LEN,
};
pub use types::{CachedResponse, NamespaceStats};

/// Stats for every namespace in the store, sorted by name.
pub async fn namespace_stats(
    store: &dyn CacheStore,
) -> Result<Vec<(String, NamespaceStats)>, CacheError> {
    let mut result = Vec::new();
    for name in store.list_namespaces().await? {
        let stats = store.open(&name).await?.stats().await?;
        result.push((name, stats));
    }
    Ok(result)
}
