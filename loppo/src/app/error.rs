//! Application error types.

use std::fmt;

use crate::cache::CacheError;
use crate::provider::NetworkError;

/// Errors that can occur during application startup.
#[derive(Debug)]
pub enum AppError {
    /// Failed to start the cache store.
    CacheStart(CacheError),

    /// Failed to build the HTTP client.
    HttpClient(NetworkError),

    /// Configuration error.
    Config(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::CacheStart(e) => write!(f, "Failed to start cache store: {}", e),
            AppError::HttpClient(e) => write!(f, "Failed to create HTTP client: {}", e),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::CacheStart(e) => Some(e),
            AppError::HttpClient(e) => Some(e),
            AppError::Config(_) => None,
        }
    }
}

impl From<CacheError> for AppError {
    fn from(e: CacheError) -> Self {
        AppError::CacheStart(e)
    }
}

impl From<NetworkError> for AppError {
    fn from(e: NetworkError) -> Self {
        AppError::HttpClient(e)
    }
}
