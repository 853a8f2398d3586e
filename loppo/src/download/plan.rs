//! Tile enumeration for a bounding box across zoom levels.

use std::ops::RangeInclusive;

use crate::coord::{clamp_latitude, to_tile_coords, BoundingBox, TileCoord, MAX_LON, MIN_LON};

use super::error::DownloadError;

/// Default hard cap on tiles per download.
pub const DEFAULT_MAX_TILES: usize = 200;

/// Default number of zoom levels below the current one.
pub const DEFAULT_ZOOM_SPAN: u8 = 3;

/// Default deepest zoom level fetched.
pub const DEFAULT_MAX_ZOOM: u8 = 17;

/// Bounds on how much a single download may enumerate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanConfig {
    pub max_tiles: usize,
    pub zoom_span: u8,
    pub max_zoom: u8,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            max_tiles: DEFAULT_MAX_TILES,
            zoom_span: DEFAULT_ZOOM_SPAN,
            max_zoom: DEFAULT_MAX_ZOOM,
        }
    }
}

/// The bounded list of tiles a download will attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TilePlan {
    /// Tiles in attempt order: zoom, then x, then y (north to south).
    pub tiles: Vec<TileCoord>,
    /// Tile count before the cap.
    pub total_raw: u64,
    /// True when tiles were dropped by the cap.
    pub capped: bool,
    pub zooms: RangeInclusive<u8>,
}

impl TilePlan {
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

/// Zoom levels to fetch: `[floor(z), min(floor(z) + span, max_zoom)]`.
///
/// Empty when the current zoom is already deeper than `max_zoom`.
pub fn zoom_range(current_zoom: f64, config: &PlanConfig) -> Result<RangeInclusive<u8>, DownloadError> {
    if !current_zoom.is_finite() || current_zoom < 0.0 {
        return Err(DownloadError::InvalidZoom(current_zoom));
    }

    let start = current_zoom.floor().min(u8::MAX as f64) as u8;
    let end = start.saturating_add(config.zoom_span).min(config.max_zoom);
    Ok(start..=end)
}

/// Enumerates the tiles covering `bbox` for every level in the zoom range.
///
/// Latitudes are clamped into the Mercator range and longitudes into
/// ±180° before projection. Tile y grows southward, so each level runs
/// from the north edge's row down to the south edge's row.
pub fn plan_area(
    bbox: &BoundingBox,
    current_zoom: f64,
    config: &PlanConfig,
) -> Result<TilePlan, DownloadError> {
    let bbox = BoundingBox::new(
        clamp_latitude(bbox.north),
        clamp_latitude(bbox.south),
        bbox.east.clamp(MIN_LON, MAX_LON),
        bbox.west.clamp(MIN_LON, MAX_LON),
    );
    bbox.validate()?;

    let zooms = zoom_range(current_zoom, config)?;
    let mut tiles = Vec::new();
    let mut total_raw = 0u64;

    for zoom in zooms.clone() {
        let south_west = to_tile_coords(bbox.south, bbox.west, zoom)?;
        let north_east = to_tile_coords(bbox.north, bbox.east, zoom)?;

        let columns = (north_east.x - south_west.x) as u64 + 1;
        let rows = (south_west.y - north_east.y) as u64 + 1;
        total_raw += columns * rows;

        if tiles.len() >= config.max_tiles {
            continue;
        }

        'level: for x in south_west.x..=north_east.x {
            for y in north_east.y..=south_west.y {
                if tiles.len() >= config.max_tiles {
                    break 'level;
                }
                tiles.push(TileCoord::new(zoom, x, y)?);
            }
        }
    }

    Ok(TilePlan {
        capped: total_raw > tiles.len() as u64,
        tiles,
        total_raw,
        zooms,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_moscow() -> BoundingBox {
        BoundingBox::new(55.76, 55.75, 37.62, 37.61)
    }

    #[test]
    fn test_zoom_range() {
        let config = PlanConfig::default();
        assert_eq!(zoom_range(12.0, &config).unwrap(), 12..=15);
        assert_eq!(zoom_range(12.9, &config).unwrap(), 12..=15);
        assert_eq!(zoom_range(15.2, &config).unwrap(), 15..=17);
        assert_eq!(zoom_range(17.0, &config).unwrap(), 17..=17);
        assert_eq!(zoom_range(0.0, &config).unwrap(), 0..=3);
    }

    #[test]
    fn test_zoom_range_past_max_is_empty() {
        let range = zoom_range(18.3, &PlanConfig::default()).unwrap();
        assert!(range.is_empty());
    }

    #[test]
    fn test_zoom_range_rejects_bad_zoom() {
        let config = PlanConfig::default();
        assert!(matches!(zoom_range(-1.0, &config), Err(DownloadError::InvalidZoom(_))));
        assert!(matches!(zoom_range(f64::NAN, &config), Err(DownloadError::InvalidZoom(_))));
    }

    #[test]
    fn test_plan_small_area_uncapped() {
        let plan = plan_area(&tiny_moscow(), 14.0, &PlanConfig::default()).unwrap();

        // 4 + 6 + 12 + 40 tiles over zooms 14..=17
        assert_eq!(plan.total_raw, 62);
        assert_eq!(plan.len(), 62);
        assert!(!plan.capped);
        assert_eq!(plan.zooms, 14..=17);
    }

    #[test]
    fn test_plan_respects_max_zoom() {
        let plan = plan_area(&tiny_moscow(), 16.0, &PlanConfig::default()).unwrap();

        assert_eq!(plan.total_raw, 52);
        assert!(plan.tiles.iter().all(|t| t.zoom <= 17));
    }

    #[test]
    fn test_plan_order_zoom_then_x_then_y() {
        let plan = plan_area(&tiny_moscow(), 14.0, &PlanConfig::default()).unwrap();

        assert_eq!(
            &plan.tiles[..4],
            &[
                TileCoord::new(14, 9903, 5121).unwrap(),
                TileCoord::new(14, 9903, 5122).unwrap(),
                TileCoord::new(14, 9904, 5121).unwrap(),
                TileCoord::new(14, 9904, 5122).unwrap(),
            ]
        );
        let mut sorted = plan.tiles.clone();
        sorted.sort();
        assert_eq!(sorted, plan.tiles);
    }

    #[test]
    fn test_plan_y_runs_north_to_south() {
        let bbox = BoundingBox::new(20.0, 10.0, 1.0, 0.0);
        let plan = plan_area(&bbox, 6.0, &PlanConfig::default()).unwrap();

        let level6: Vec<u32> = plan.tiles.iter().filter(|t| t.zoom == 6).map(|t| t.y).collect();
        assert_eq!(level6, vec![28, 29, 30]);
        assert_eq!(plan.total_raw, 48);
    }

    #[test]
    fn test_plan_capped() {
        let bbox = BoundingBox::new(60.0, 50.0, 40.0, 30.0);
        let plan = plan_area(&bbox, 8.0, &PlanConfig::default()).unwrap();

        assert_eq!(plan.total_raw, 7831);
        assert_eq!(plan.len(), 200);
        assert!(plan.capped);
        // The cap keeps the shallowest levels first
        assert_eq!(plan.tiles[0].zoom, 8);
    }

    #[test]
    fn test_plan_custom_cap() {
        let config = PlanConfig {
            max_tiles: 10,
            ..PlanConfig::default()
        };
        let plan = plan_area(&tiny_moscow(), 14.0, &config).unwrap();

        assert_eq!(plan.len(), 10);
        assert!(plan.capped);
    }

    #[test]
    fn test_plan_clamps_polar_bounds() {
        let bbox = BoundingBox::new(90.0, -90.0, 180.0, -180.0);
        let plan = plan_area(&bbox, 0.0, &PlanConfig::default()).unwrap();

        // Whole world at zooms 0..=3: 1 + 4 + 16 + 64
        assert_eq!(plan.total_raw, 85);
        assert!(!plan.capped);
        assert_eq!(plan.tiles[0], TileCoord::new(0, 0, 0).unwrap());
    }

    #[test]
    fn test_plan_past_max_zoom_is_empty() {
        let plan = plan_area(&tiny_moscow(), 18.0, &PlanConfig::default()).unwrap();
        assert!(plan.is_empty());
        assert_eq!(plan.total_raw, 0);
        assert!(!plan.capped);
    }

    #[test]
    fn test_plan_rejects_inverted_bounds() {
        let bbox = BoundingBox::new(10.0, 20.0, 1.0, 0.0);
        assert!(matches!(
            plan_area(&bbox, 6.0, &PlanConfig::default()),
            Err(DownloadError::InvalidBounds(_))
        ));
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_plan_never_exceeds_cap(
                south in -80.0..80.0_f64,
                height in 0.0..5.0_f64,
                west in -179.0..170.0_f64,
                width in 0.0..5.0_f64,
                zoom in 0.0..17.0_f64,
                cap in 1usize..300
            ) {
                let bbox = BoundingBox::new((south + height).min(85.0), south, west + width, west);
                let config = PlanConfig { max_tiles: cap, ..PlanConfig::default() };
                let plan = plan_area(&bbox, zoom, &config).unwrap();

                prop_assert!(plan.len() <= cap);
                prop_assert_eq!(plan.capped, plan.total_raw > plan.len() as u64);
                prop_assert!(!plan.is_empty());
            }
        }
    }
}
