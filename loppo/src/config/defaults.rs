//! Default configuration values.

use std::path::PathBuf;

use super::file::config_directory;

/// Default tile-download request timeout in seconds.
pub const DEFAULT_DOWNLOAD_TIMEOUT_SECS: u64 = 30;

/// Default number of tile requests in flight during an area download.
pub const DEFAULT_DOWNLOAD_CONCURRENCY: usize = 1;

/// Upper bound for the download concurrency setting.
pub const MAX_DOWNLOAD_CONCURRENCY: usize = 32;

/// Default cache directory (~/.loppo/cache).
pub fn default_cache_directory() -> PathBuf {
    config_directory().join("cache")
}

/// Default client state file (~/.loppo/state.json).
pub fn default_state_file() -> PathBuf {
    config_directory().join("state.json")
}

/// Default log file (~/.loppo/loppo.log).
pub fn default_log_file() -> PathBuf {
    config_directory().join("loppo.log")
}
