//! Loppo - offline map tile caching
//!
//! Keeps a map client usable without a network: the application shell is
//! cached at install time, map tiles are cached as they are viewed, and a
//! user can download the tiles for the visible area ahead of time.
//!
//! # High-Level API
//!
//! The [`app`] module wires every component from one configuration:
//!
//! ```ignore
//! use loppo::app::{AppConfig, LoppoApp};
//! use loppo::config::ConfigFile;
//! use loppo::fetch::Request;
//!
//! let config = AppConfig::from_config_file(&ConfigFile::load()?);
//! let app = LoppoApp::start(config).await?;
//!
//! app.manager().install(app.client().as_ref()).await?;
//! app.manager().activate().await?;
//!
//! let response = app.fetch_handle().fetch(Request::get(url)).await?;
//! ```

pub mod app;
pub mod cache;
pub mod config;
pub mod coord;
pub mod download;
pub mod fetch;
pub mod lifecycle;
pub mod logging;
pub mod map;
pub mod provider;
pub mod state;

/// Version of the Loppo library and CLI.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
