//! User configuration loaded from `~/.loppo/config.ini`.
//!
//! ```ini
//! [cache]
//! backend = disk
//! directory = ~/.loppo/cache
//!
//! [download]
//! max_tiles = 200
//! concurrency = 4
//! ```
//!
//! Every value is reachable by a dotted key (`download.max_tiles`) through
//! [`ConfigKey`], which the CLI uses for `config get` and `config set`.

mod defaults;
mod file;
mod keys;
mod parser;
mod settings;
mod writer;

pub use file::{config_directory, config_file_path, ConfigFileError};
pub use defaults::{
    default_cache_directory, default_log_file, default_state_file,
    DEFAULT_DOWNLOAD_CONCURRENCY, DEFAULT_DOWNLOAD_TIMEOUT_SECS, MAX_DOWNLOAD_CONCURRENCY,
};
pub use keys::{ConfigKey, ConfigKeyError};
pub use settings::{
    AppSettings, CacheBackend, CacheSettings, ConfigFile, DownloadSettings, LoggingSettings,
    StateSettings, TileSettings,
};
