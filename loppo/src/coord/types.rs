//! Coordinate type definitions

use std::fmt;

use serde::{Deserialize, Serialize};

/// Web Mercator valid latitude range
pub const MIN_LAT: f64 = -85.05112878;
pub const MAX_LAT: f64 = 85.05112878;

/// Valid longitude range
pub const MIN_LON: f64 = -180.0;
pub const MAX_LON: f64 = 180.0;

/// Zoom levels accepted by the mapper. Raster basemaps stop well below this.
pub const MIN_ZOOM: u8 = 0;
pub const MAX_ZOOM: u8 = 22;

/// Tile coordinates in the Web Mercator / slippy map grid.
///
/// At zoom `z` the world is split into `2^z × 2^z` tiles; `x` grows eastward
/// from the antimeridian and `y` grows southward from the north edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoord {
    /// Zoom level
    pub zoom: u8,
    /// X coordinate (east-west), 0 at west
    pub x: u32,
    /// Y coordinate (north-south), 0 at north
    pub y: u32,
}

impl TileCoord {
    /// Creates a tile coordinate, rejecting positions outside the zoom grid.
    pub fn new(zoom: u8, x: u32, y: u32) -> Result<Self, CoordError> {
        if zoom > MAX_ZOOM {
            return Err(CoordError::InvalidZoom(zoom));
        }
        let size = grid_size(zoom);
        if x >= size || y >= size {
            return Err(CoordError::OutOfGrid { zoom, x, y });
        }
        Ok(Self { zoom, x, y })
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.zoom, self.x, self.y)
    }
}

/// Number of tiles along one axis at the given zoom.
#[inline]
pub fn grid_size(zoom: u8) -> u32 {
    1u32 << zoom
}

/// A latitude/longitude rectangle, typically the visible map area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl BoundingBox {
    pub fn new(north: f64, south: f64, east: f64, west: f64) -> Self {
        Self {
            north,
            south,
            east,
            west,
        }
    }

    /// Checks that every edge is finite and the box is not inverted.
    pub fn validate(&self) -> Result<(), CoordError> {
        let edges = [self.north, self.south, self.east, self.west];
        if edges.iter().any(|v| !v.is_finite()) {
            return Err(CoordError::InvalidBounds(*self));
        }
        if self.north < self.south || self.east < self.west {
            return Err(CoordError::InvalidBounds(*self));
        }
        Ok(())
    }

    /// Returns true when the point lies inside the box (edges inclusive).
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat >= self.south && lat <= self.north && lon >= self.west && lon <= self.east
    }
}

/// Errors that can occur during coordinate conversion.
#[derive(Debug, Clone, PartialEq)]
pub enum CoordError {
    /// Latitude is outside the Web Mercator range
    InvalidLatitude(f64),
    /// Longitude is outside valid range (-180.0 to 180.0)
    InvalidLongitude(f64),
    /// Zoom level is outside valid range
    InvalidZoom(u8),
    /// Tile position does not exist at this zoom
    OutOfGrid { zoom: u8, x: u32, y: u32 },
    /// Bounding box has non-finite or inverted edges
    InvalidBounds(BoundingBox),
}

impl fmt::Display for CoordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordError::InvalidLatitude(lat) => {
                write!(
                    f,
                    "Invalid latitude: {} (must be between {} and {})",
                    lat, MIN_LAT, MAX_LAT
                )
            }
            CoordError::InvalidLongitude(lon) => {
                write!(
                    f,
                    "Invalid longitude: {} (must be between {} and {})",
                    lon, MIN_LON, MAX_LON
                )
            }
            CoordError::InvalidZoom(zoom) => {
                write!(
                    f,
                    "Invalid zoom level: {} (must be between {} and {})",
                    zoom, MIN_ZOOM, MAX_ZOOM
                )
            }
            CoordError::OutOfGrid { zoom, x, y } => {
                write!(
                    f,
                    "Tile {}/{}/{} is outside the {}x{} grid",
                    zoom,
                    x,
                    y,
                    grid_size(*zoom),
                    grid_size(*zoom)
                )
            }
            CoordError::InvalidBounds(b) => {
                write!(
                    f,
                    "Invalid bounding box: north={} south={} east={} west={}",
                    b.north, b.south, b.east, b.west
                )
            }
        }
    }
}

impl std::error::Error for CoordError {}
