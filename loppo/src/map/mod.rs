//! Collaborator interfaces for the map view and theme.
//!
//! The renderer itself lives outside this crate. The downloader only needs
//! to ask it what is visible.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::coord::{clamp_latitude, BoundingBox, MAX_LON, MIN_LON};

/// Edge length of a raster tile in pixels.
pub const TILE_SIZE_PX: f64 = 256.0;

/// Active color theme; selects the tile style variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme '{}', expected light or dark", other)),
        }
    }
}

/// The current map view as reported by the renderer.
///
/// Both accessors return `None` while the view is not initialized.
pub trait MapView: Send + Sync {
    /// Visible area.
    fn bounds(&self) -> Option<BoundingBox>;

    /// Current (fractional) zoom.
    fn zoom(&self) -> Option<f64>;
}

/// A fixed map view, used by the CLI and tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticMapView {
    bounds: Option<BoundingBox>,
    zoom: Option<f64>,
}

impl StaticMapView {
    pub fn new(bounds: BoundingBox, zoom: f64) -> Self {
        Self {
            bounds: Some(bounds),
            zoom: Some(zoom),
        }
    }

    /// The view a `width_px` x `height_px` viewport shows when centered on
    /// (`lat`, `lon`) at `zoom`.
    pub fn around(lat: f64, lon: f64, zoom: f64, width_px: u32, height_px: u32) -> Self {
        let world = TILE_SIZE_PX * 2.0_f64.powf(zoom);
        let lat_rad = clamp_latitude(lat).to_radians();
        let cx = (lon + 180.0) / 360.0 * world;
        let cy = (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0 * world;

        let half_w = width_px as f64 / 2.0;
        let half_h = height_px as f64 / 2.0;

        let to_lon = |px: f64| (px / world * 360.0 - 180.0).clamp(MIN_LON, MAX_LON);
        let to_lat = |py: f64| {
            let py = py.clamp(0.0, world);
            clamp_latitude((PI * (1.0 - 2.0 * py / world)).sinh().atan().to_degrees())
        };

        let bounds = BoundingBox::new(
            to_lat(cy - half_h),
            to_lat(cy + half_h),
            to_lon(cx + half_w),
            to_lon(cx - half_w),
        );
        Self::new(bounds, zoom)
    }

    /// A view that has not been initialized yet.
    pub fn uninitialized() -> Self {
        Self {
            bounds: None,
            zoom: None,
        }
    }
}

impl MapView for StaticMapView {
    fn bounds(&self) -> Option<BoundingBox> {
        self.bounds
    }

    fn zoom(&self) -> Option<f64> {
        self.zoom
    }
}
