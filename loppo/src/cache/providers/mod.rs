//! Cache store implementations.
//!
//! # Available Providers
//!
//! - [`MemoryCacheStore`]: in-process namespaces backed by moka
//! - [`DiskCacheStore`]: one directory per namespace, one file per entry
//!
//! Application code normally obtains a store through `CacheService::start()`:
//!
//! ```ignore
//! use loppo::cache::{CacheService, StoreConfig};
//!
//! let service = CacheService::start(StoreConfig::disk("/var/cache/loppo")).await?;
//! let tiles = service.store().open("loppo-tiles").await?;
//! ```

mod disk;
mod memory;

pub use disk::{DiskCacheStore, DiskNamespace};
pub use memory::{MemoryCacheStore, MemoryNamespace};
