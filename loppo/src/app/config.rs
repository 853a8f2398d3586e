//! Application configuration for LoppoApp.
//!
//! `AppConfig` combines everything needed to bootstrap the application:
//! which store backs the caches, how namespaces are named, where the shell
//! comes from, which hosts serve tiles and how area downloads behave.

use std::path::PathBuf;

use crate::cache::StoreConfig;
use crate::config::{CacheBackend, ConfigFile};
use crate::download::{DownloadConfig, FetchMode, PlanConfig};
use crate::lifecycle::{CacheNames, ShellManifest};
use crate::provider::{TileSource, DEFAULT_TIMEOUT_SECS};

/// Application configuration combining all component configs.
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Store backing every cache namespace.
    pub store: StoreConfig,

    /// Shell and tile namespace names.
    pub names: CacheNames,

    /// Resources installed into the shell namespace.
    pub manifest: ShellManifest,

    /// Tile URL template and hosts.
    pub tiles: TileSource,

    /// Area download limits and fetch mode.
    pub download: DownloadConfig,

    /// HTTP request timeout in seconds.
    pub timeout_secs: u64,

    /// Client state file. `None` keeps state in memory.
    pub state_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig::memory(),
            names: CacheNames::default(),
            manifest: ShellManifest::default(),
            tiles: TileSource::default(),
            download: DownloadConfig::default(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            state_file: None,
        }
    }
}

impl AppConfig {
    /// Create application config from the configuration file.
    pub fn from_config_file(config: &ConfigFile) -> Self {
        let store = match config.cache.backend {
            CacheBackend::Disk => StoreConfig::disk(config.cache.directory.clone()),
            CacheBackend::Memory => StoreConfig::memory(),
        };

        let tiles = TileSource::new(config.tiles.url_template.clone(), config.tiles.hosts.clone())
            .with_styles(
                config.tiles.light_style.clone(),
                config.tiles.dark_style.clone(),
            );

        Self {
            store,
            names: CacheNames::new(config.app.cache_prefix.clone(), config.app.version.clone()),
            manifest: ShellManifest::with_origin(config.app.origin.clone()),
            tiles,
            download: DownloadConfig {
                plan: PlanConfig {
                    max_tiles: config.download.max_tiles,
                    zoom_span: config.download.zoom_span,
                    max_zoom: config.download.max_zoom,
                },
                mode: FetchMode::from_concurrency(config.download.concurrency),
            },
            timeout_secs: config.download.timeout,
            state_file: Some(config.state.file.clone()),
        }
    }

    /// Use a different store.
    pub fn with_store(mut self, store: StoreConfig) -> Self {
        self.store = store;
        self
    }

    /// Persist client state at `path`.
    pub fn with_state_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.state_file = Some(path.into());
        self
    }
}
