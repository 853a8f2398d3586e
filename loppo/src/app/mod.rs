//! Application bootstrap and lifecycle management.
//!
//! `LoppoApp` wires the cache store, lifecycle manager, interceptor, area
//! downloader and client state from a single [`AppConfig`], and shuts them
//! down in reverse order.
//!
//! ```text
//! ConfigFile ──► AppConfig ──► LoppoApp
//!                               ├── CacheService (memory | disk)
//!                               ├── CacheManager ──► shell@<version>, tiles
//!                               ├── FetchInterceptor ◄── FetchHost ◄── FetchHandle
//!                               ├── AreaDownloader
//!                               └── ClientStateStore
//! ```

mod bootstrap;
mod config;
mod error;

pub use bootstrap::LoppoApp;
pub use config::AppConfig;
pub use error::AppError;
