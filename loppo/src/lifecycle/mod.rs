//! Cache lifecycle management.
//!
//! A client version goes through two transitions:
//!
//! ```text
//! Parsed ──install──► Installed ──activate──► Activated
//!    │
//!    └── install fails ──► Redundant
//! ```
//!
//! Install populates the versioned shell namespace; activate deletes every
//! namespace except the current shell and the tile namespace.

mod error;
mod manager;
mod names;

pub use error::{LifecycleError, LifecycleResult};
pub use manager::{ActivationReport, CacheManager, InstallReport, LifecycleState};
pub use names::{
    CacheNames, ShellManifest, DEFAULT_CACHE_PREFIX, DEFAULT_ORIGIN, DEFAULT_SHELL_RESOURCES,
    DEFAULT_SHELL_VERSION,
};
