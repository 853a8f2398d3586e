//! Configuration settings structs.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use super::defaults::*;
use crate::download::{DEFAULT_MAX_TILES, DEFAULT_MAX_ZOOM, DEFAULT_ZOOM_SPAN};
use crate::lifecycle::{DEFAULT_CACHE_PREFIX, DEFAULT_ORIGIN, DEFAULT_SHELL_VERSION};
use crate::provider::{
    DEFAULT_DARK_STYLE, DEFAULT_LIGHT_STYLE, DEFAULT_TILE_HOSTS, DEFAULT_URL_TEMPLATE,
};

/// Full configuration file contents.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConfigFile {
    pub app: AppSettings,
    pub cache: CacheSettings,
    pub tiles: TileSettings,
    pub download: DownloadSettings,
    pub state: StateSettings,
    pub logging: LoggingSettings,
}

/// `[app]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppSettings {
    /// Shell cache version; bump to rotate the shell namespace.
    pub version: String,
    /// Origin serving the shell resources.
    pub origin: String,
    /// Prefix of every cache namespace name.
    pub cache_prefix: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            version: DEFAULT_SHELL_VERSION.to_string(),
            origin: DEFAULT_ORIGIN.to_string(),
            cache_prefix: DEFAULT_CACHE_PREFIX.to_string(),
        }
    }
}

/// Which cache store backs the namespaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheBackend {
    #[default]
    Disk,
    Memory,
}

impl CacheBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheBackend::Disk => "disk",
            CacheBackend::Memory => "memory",
        }
    }
}

impl fmt::Display for CacheBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CacheBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "disk" => Ok(CacheBackend::Disk),
            "memory" => Ok(CacheBackend::Memory),
            _ => Err("must be one of: disk, memory".to_string()),
        }
    }
}

/// `[cache]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheSettings {
    pub backend: CacheBackend,
    pub directory: PathBuf,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            backend: CacheBackend::Disk,
            directory: default_cache_directory(),
        }
    }
}

/// `[tiles]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileSettings {
    pub url_template: String,
    pub hosts: Vec<String>,
    pub light_style: String,
    pub dark_style: String,
}

impl Default for TileSettings {
    fn default() -> Self {
        Self {
            url_template: DEFAULT_URL_TEMPLATE.to_string(),
            hosts: DEFAULT_TILE_HOSTS.iter().map(|h| h.to_string()).collect(),
            light_style: DEFAULT_LIGHT_STYLE.to_string(),
            dark_style: DEFAULT_DARK_STYLE.to_string(),
        }
    }
}

/// `[download]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadSettings {
    pub max_tiles: usize,
    pub zoom_span: u8,
    pub max_zoom: u8,
    /// Request timeout in seconds.
    pub timeout: u64,
    /// Tile requests in flight; 1 is sequential.
    pub concurrency: usize,
}

impl Default for DownloadSettings {
    fn default() -> Self {
        Self {
            max_tiles: DEFAULT_MAX_TILES,
            zoom_span: DEFAULT_ZOOM_SPAN,
            max_zoom: DEFAULT_MAX_ZOOM,
            timeout: DEFAULT_DOWNLOAD_TIMEOUT_SECS,
            concurrency: DEFAULT_DOWNLOAD_CONCURRENCY,
        }
    }
}

/// `[state]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateSettings {
    pub file: PathBuf,
}

impl Default for StateSettings {
    fn default() -> Self {
        Self {
            file: default_state_file(),
        }
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    pub file: PathBuf,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            file: default_log_file(),
        }
    }
}
