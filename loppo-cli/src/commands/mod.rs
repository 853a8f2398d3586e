//! CLI command implementations.
//!
//! # Command Modules
//!
//! - [`tile`] - Tile for a point, with its URL
//! - [`lifecycle`] - Shell install and cache activation
//! - [`fetch`] - Route one request through the caches
//! - [`download`] - Cache the tiles for a map area
//! - [`cache`] - Namespace management (list, keys, stats, delete)
//! - [`config`] - Configuration management (get, set, list, path, init)
//! - [`state`] - Client state (show, reset, view, theme, language)

pub mod cache;
pub mod common;
pub mod config;
pub mod download;
pub mod fetch;
pub mod lifecycle;
pub mod state;
pub mod tile;
