//! Cache service lifecycle management.
//!
//! `CacheService` picks a store implementation from configuration and hands
//! out a shared `Arc<dyn CacheStore>`.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use super::providers::{DiskCacheStore, MemoryCacheStore};
use super::traits::{CacheError, CacheStore};

/// Which store backs the cache namespaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    /// In-process store; contents are lost on exit.
    Memory {
        /// Per-namespace byte limit. `None` keeps every entry.
        capacity_bytes: Option<u64>,
    },
    /// Persistent store rooted at `directory`.
    Disk { directory: PathBuf },
}

impl StoreConfig {
    /// Unbounded memory store.
    pub fn memory() -> Self {
        Self::Memory {
            capacity_bytes: None,
        }
    }

    pub fn disk(directory: impl Into<PathBuf>) -> Self {
        Self::Disk {
            directory: directory.into(),
        }
    }
}

impl fmt::Display for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory { .. } => write!(f, "memory"),
            Self::Disk { directory } => write!(f, "disk ({})", directory.display()),
        }
    }
}

/// A running cache store.
pub struct CacheService {
    store: Arc<dyn CacheStore>,
    config: StoreConfig,
}

impl CacheService {
    /// Start the configured store.
    ///
    /// # Errors
    ///
    /// Returns an error if the disk root cannot be created.
    pub async fn start(config: StoreConfig) -> Result<Self, CacheError> {
        let store: Arc<dyn CacheStore> = match &config {
            StoreConfig::Memory { capacity_bytes } => {
                Arc::new(MemoryCacheStore::with_capacity(*capacity_bytes))
            }
            StoreConfig::Disk { directory } => {
                Arc::new(DiskCacheStore::start(directory.clone()).await?)
            }
        };

        info!(backend = %config, "Cache service started");

        Ok(Self { store, config })
    }

    /// Shared handle to the store.
    pub fn store(&self) -> Arc<dyn CacheStore> {
        Arc::clone(&self.store)
    }

    pub fn is_disk(&self) -> bool {
        matches!(self.config, StoreConfig::Disk { .. })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Stop the service. Stores hold no background tasks; outstanding
    /// `Arc` handles stay usable until dropped.
    pub async fn shutdown(self) {
        info!(backend = %self.config, "Cache service stopped");
    }
}
