//! Error types for the cache lifecycle.

use thiserror::Error;

use crate::cache::CacheError;

/// Result type for lifecycle operations.
pub type LifecycleResult<T> = Result<T, LifecycleError>;

/// Errors that can occur during install or activation.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// A shell manifest resource could not be fetched or was not 2xx.
    #[error("Shell resource {url} failed: {reason}")]
    ShellResourceFailed { url: String, reason: String },

    /// Activation was requested before a successful install.
    #[error("Cannot activate: shell cache '{namespace}' is not installed")]
    NotInstalled { namespace: String },

    /// The cache store failed.
    #[error("Cache store error: {0}")]
    Cache(#[from] CacheError),
}
