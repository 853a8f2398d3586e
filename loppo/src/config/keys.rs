//! Configuration key access and validation.
//!
//! Every key knows its section, how to render its value and how to parse
//! and validate a new one. The INI parser goes through the same setters, so
//! a value accepted by `config set` is exactly a value accepted on load.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;

use super::settings::{CacheBackend, ConfigFile};
use super::defaults::MAX_DOWNLOAD_CONCURRENCY;
use crate::cache::validate_namespace_name;
use crate::coord::MAX_ZOOM;

/// Errors that can occur when getting or setting configuration values.
#[derive(Debug, Error)]
pub enum ConfigKeyError {
    /// Unknown configuration key.
    #[error("Unknown configuration key '{0}'")]
    UnknownKey(String),

    /// Validation failed for the value.
    #[error("Invalid value for {key}: {reason}")]
    ValidationFailed { key: String, reason: String },
}

/// Supported configuration keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    AppVersion,
    AppOrigin,
    AppCachePrefix,

    CacheBackend,
    CacheDirectory,

    TilesUrlTemplate,
    TilesHosts,
    TilesLightStyle,
    TilesDarkStyle,

    DownloadMaxTiles,
    DownloadZoomSpan,
    DownloadMaxZoom,
    DownloadTimeout,
    DownloadConcurrency,

    StateFile,

    LoggingFile,
}

impl FromStr for ConfigKey {
    type Err = ConfigKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        ConfigKey::all()
            .iter()
            .copied()
            .find(|key| key.name() == lower)
            .ok_or_else(|| ConfigKeyError::UnknownKey(s.to_string()))
    }
}

impl ConfigKey {
    /// Canonical key name (e.g., "download.max_tiles").
    pub fn name(&self) -> &'static str {
        match self {
            ConfigKey::AppVersion => "app.version",
            ConfigKey::AppOrigin => "app.origin",
            ConfigKey::AppCachePrefix => "app.cache_prefix",
            ConfigKey::CacheBackend => "cache.backend",
            ConfigKey::CacheDirectory => "cache.directory",
            ConfigKey::TilesUrlTemplate => "tiles.url_template",
            ConfigKey::TilesHosts => "tiles.hosts",
            ConfigKey::TilesLightStyle => "tiles.light_style",
            ConfigKey::TilesDarkStyle => "tiles.dark_style",
            ConfigKey::DownloadMaxTiles => "download.max_tiles",
            ConfigKey::DownloadZoomSpan => "download.zoom_span",
            ConfigKey::DownloadMaxZoom => "download.max_zoom",
            ConfigKey::DownloadTimeout => "download.timeout",
            ConfigKey::DownloadConcurrency => "download.concurrency",
            ConfigKey::StateFile => "state.file",
            ConfigKey::LoggingFile => "logging.file",
        }
    }

    /// Section name (e.g., "download").
    pub fn section(&self) -> &'static str {
        self.name().split('.').next().unwrap_or("")
    }

    /// Key name within the section (e.g., "max_tiles").
    pub fn key_name(&self) -> &'static str {
        self.name().split('.').nth(1).unwrap_or(self.name())
    }

    /// Current value rendered as a string.
    pub fn get(&self, config: &ConfigFile) -> String {
        match self {
            ConfigKey::AppVersion => config.app.version.clone(),
            ConfigKey::AppOrigin => config.app.origin.clone(),
            ConfigKey::AppCachePrefix => config.app.cache_prefix.clone(),
            ConfigKey::CacheBackend => config.cache.backend.to_string(),
            ConfigKey::CacheDirectory => path_to_display(&config.cache.directory),
            ConfigKey::TilesUrlTemplate => config.tiles.url_template.clone(),
            ConfigKey::TilesHosts => config.tiles.hosts.join(", "),
            ConfigKey::TilesLightStyle => config.tiles.light_style.clone(),
            ConfigKey::TilesDarkStyle => config.tiles.dark_style.clone(),
            ConfigKey::DownloadMaxTiles => config.download.max_tiles.to_string(),
            ConfigKey::DownloadZoomSpan => config.download.zoom_span.to_string(),
            ConfigKey::DownloadMaxZoom => config.download.max_zoom.to_string(),
            ConfigKey::DownloadTimeout => config.download.timeout.to_string(),
            ConfigKey::DownloadConcurrency => config.download.concurrency.to_string(),
            ConfigKey::StateFile => path_to_display(&config.state.file),
            ConfigKey::LoggingFile => path_to_display(&config.logging.file),
        }
    }

    /// Validates `value` and stores it.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigKeyError> {
        let value = value.trim();
        match self {
            ConfigKey::AppVersion => {
                self.check_namespace_part(value)?;
                config.app.version = value.to_string();
            }
            ConfigKey::AppOrigin => {
                if !(value.starts_with("http://") || value.starts_with("https://")) {
                    return Err(self.invalid("must start with http:// or https://"));
                }
                config.app.origin = value.trim_end_matches('/').to_string();
            }
            ConfigKey::AppCachePrefix => {
                self.check_namespace_part(value)?;
                config.app.cache_prefix = value.to_string();
            }
            ConfigKey::CacheBackend => {
                config.cache.backend = value
                    .parse::<CacheBackend>()
                    .map_err(|reason| self.invalid(&reason))?;
            }
            ConfigKey::CacheDirectory => {
                config.cache.directory = self.parse_path(value)?;
            }
            ConfigKey::TilesUrlTemplate => {
                for placeholder in ["{z}", "{x}", "{y}"] {
                    if !value.contains(placeholder) {
                        return Err(self.invalid(&format!("must contain {}", placeholder)));
                    }
                }
                config.tiles.url_template = value.to_string();
            }
            ConfigKey::TilesHosts => {
                let hosts: Vec<String> = value
                    .split(',')
                    .map(|h| h.trim().to_lowercase())
                    .filter(|h| !h.is_empty())
                    .collect();
                if hosts.is_empty() {
                    return Err(self.invalid("at least one host is required"));
                }
                config.tiles.hosts = hosts;
            }
            ConfigKey::TilesLightStyle => {
                config.tiles.light_style = self.parse_style(value)?;
            }
            ConfigKey::TilesDarkStyle => {
                config.tiles.dark_style = self.parse_style(value)?;
            }
            ConfigKey::DownloadMaxTiles => {
                config.download.max_tiles = self.parse_in_range(value, 1, 100_000)?;
            }
            ConfigKey::DownloadZoomSpan => {
                config.download.zoom_span = self.parse_in_range(value, 0, MAX_ZOOM as usize)? as u8;
            }
            ConfigKey::DownloadMaxZoom => {
                config.download.max_zoom = self.parse_in_range(value, 0, MAX_ZOOM as usize)? as u8;
            }
            ConfigKey::DownloadTimeout => {
                config.download.timeout = self.parse_in_range(value, 1, 3600)? as u64;
            }
            ConfigKey::DownloadConcurrency => {
                config.download.concurrency =
                    self.parse_in_range(value, 1, MAX_DOWNLOAD_CONCURRENCY)?;
            }
            ConfigKey::StateFile => {
                config.state.file = self.parse_path(value)?;
            }
            ConfigKey::LoggingFile => {
                config.logging.file = self.parse_path(value)?;
            }
        }
        Ok(())
    }

    /// All supported keys, in file order.
    pub fn all() -> &'static [ConfigKey] {
        &[
            ConfigKey::AppVersion,
            ConfigKey::AppOrigin,
            ConfigKey::AppCachePrefix,
            ConfigKey::CacheBackend,
            ConfigKey::CacheDirectory,
            ConfigKey::TilesUrlTemplate,
            ConfigKey::TilesHosts,
            ConfigKey::TilesLightStyle,
            ConfigKey::TilesDarkStyle,
            ConfigKey::DownloadMaxTiles,
            ConfigKey::DownloadZoomSpan,
            ConfigKey::DownloadMaxZoom,
            ConfigKey::DownloadTimeout,
            ConfigKey::DownloadConcurrency,
            ConfigKey::StateFile,
            ConfigKey::LoggingFile,
        ]
    }

    fn invalid(&self, reason: &str) -> ConfigKeyError {
        ConfigKeyError::ValidationFailed {
            key: self.name().to_string(),
            reason: reason.to_string(),
        }
    }

    fn parse_in_range(&self, value: &str, min: usize, max: usize) -> Result<usize, ConfigKeyError> {
        let parsed: usize = value
            .parse()
            .map_err(|_| self.invalid("must be a non-negative integer"))?;
        if parsed < min || parsed > max {
            return Err(self.invalid(&format!("must be between {} and {}", min, max)));
        }
        Ok(parsed)
    }

    fn parse_path(&self, value: &str) -> Result<PathBuf, ConfigKeyError> {
        if value.is_empty() {
            return Err(self.invalid("path cannot be empty"));
        }
        Ok(expand_tilde(value))
    }

    fn parse_style(&self, value: &str) -> Result<String, ConfigKeyError> {
        if value.is_empty() || value.contains('/') || value.contains(char::is_whitespace) {
            return Err(self.invalid("must be a single path segment"));
        }
        Ok(value.to_string())
    }

    fn check_namespace_part(&self, value: &str) -> Result<(), ConfigKeyError> {
        // Ends up inside namespace names such as "<prefix>-shell@<version>"
        validate_namespace_name(value)
            .map_err(|_| self.invalid("may only contain letters, digits, '.', '_', '@' and '-'"))
    }
}

/// Expand `~/` to the home directory.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

/// Convert path to display string, collapsing home dir to ~.
pub(super) fn path_to_display(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}
