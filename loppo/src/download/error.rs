//! Error types for area downloads.

use thiserror::Error;

use crate::coord::CoordError;
use crate::lifecycle::LifecycleError;

/// Reasons an area download does not run.
///
/// Per-tile failures are never errors; they are counted as skipped.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// Another download is in flight.
    #[error("A download is already in progress")]
    Busy,

    /// The map view has no bounds or zoom yet.
    #[error("Map view is not available")]
    MapViewUnavailable,

    /// Zoom is negative or not a number.
    #[error("Invalid zoom level: {0}")]
    InvalidZoom(f64),

    /// The visible area is not a usable bounding box.
    #[error("Invalid map bounds: {0}")]
    InvalidBounds(#[from] CoordError),

    /// The tile cache could not be opened.
    #[error("Tile cache unavailable: {0}")]
    Cache(#[from] LifecycleError),
}
