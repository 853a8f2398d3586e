//! Coordinate conversion module
//!
//! Provides conversions between geographic coordinates (latitude/longitude)
//! and Web Mercator slippy-map tile coordinates used by basemap providers.

mod types;

pub use types::{
    grid_size, BoundingBox, CoordError, TileCoord, MAX_LAT, MAX_LON, MAX_ZOOM, MIN_LAT, MIN_LON,
    MIN_ZOOM,
};

use std::f64::consts::PI;

/// Converts geographic coordinates to tile coordinates.
///
/// Uses the standard Web Mercator forward projection:
/// `x = floor((lon + 180) / 360 * 2^z)` and
/// `y = floor((1 - ln(tan(φ) + sec(φ)) / π) / 2 * 2^z)`.
///
/// The latitude must already be inside the Mercator range; callers working
/// with raw map bounds should pass it through [`clamp_latitude`] first.
/// Results on the east edge or at the Mercator limit are clamped onto the
/// last row/column so the tile always exists.
///
/// # Arguments
///
/// * `lat` - Latitude in degrees (-85.05112878 to 85.05112878)
/// * `lon` - Longitude in degrees (-180.0 to 180.0)
/// * `zoom` - Zoom level (0 to 22)
///
/// # Returns
///
/// A `Result` containing the tile coordinates or an error if inputs are invalid.
#[inline]
pub fn to_tile_coords(lat: f64, lon: f64, zoom: u8) -> Result<TileCoord, CoordError> {
    // NaN fails both range checks
    if !(MIN_LAT..=MAX_LAT).contains(&lat) {
        return Err(CoordError::InvalidLatitude(lat));
    }
    if !(MIN_LON..=MAX_LON).contains(&lon) {
        return Err(CoordError::InvalidLongitude(lon));
    }
    if zoom > MAX_ZOOM {
        return Err(CoordError::InvalidZoom(zoom));
    }

    let n = 2.0_f64.powi(zoom as i32);
    let last = n - 1.0;

    let x = ((lon + 180.0) / 360.0 * n).floor();

    let lat_rad = lat * PI / 180.0;
    let y = ((1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0 * n).floor();

    Ok(TileCoord {
        zoom,
        x: x.clamp(0.0, last) as u32,
        y: y.clamp(0.0, last) as u32,
    })
}

/// Clamps a latitude into the range the Mercator projection can represent.
///
/// Map views can report bounds past ±85.05° when zoomed far out; `tan` and
/// `sec` diverge toward the poles.
#[inline]
pub fn clamp_latitude(lat: f64) -> f64 {
    lat.clamp(MIN_LAT, MAX_LAT)
}

/// Converts tile coordinates back to geographic coordinates.
///
/// Returns the latitude/longitude of the tile's northwest corner.
#[inline]
pub fn tile_to_lat_lon(tile: &TileCoord) -> (f64, f64) {
    let n = 2.0_f64.powi(tile.zoom as i32);

    let lon = tile.x as f64 / n * 360.0 - 180.0;

    // Inverse Web Mercator
    let y = tile.y as f64 / n;
    let lat_rad = (PI * (1.0 - 2.0 * y)).sinh().atan();
    let lat = lat_rad * 180.0 / PI;

    (lat, lon)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moscow_at_zoom_12() {
        // Moscow: 55.7558°N, 37.6173°E
        let tile = to_tile_coords(55.7558, 37.6173, 12).unwrap();
        assert_eq!(tile.x, 2476);
        assert_eq!(tile.y, 1280);
        assert_eq!(tile.zoom, 12);
    }

    #[test]
    fn test_new_york_city_at_zoom_16() {
        let tile = to_tile_coords(40.7128, -74.0060, 16).unwrap();
        assert_eq!(tile.x, 19295);
        assert_eq!(tile.y, 24640);
    }

    #[test]
    fn test_origin_maps_to_center_tile() {
        assert_eq!(
            to_tile_coords(0.0, 0.0, 0).unwrap(),
            TileCoord { zoom: 0, x: 0, y: 0 }
        );
        for zoom in 1..=MAX_ZOOM {
            let tile = to_tile_coords(0.0, 0.0, zoom).unwrap();
            let half = grid_size(zoom) / 2;
            assert_eq!((tile.x, tile.y), (half, half), "zoom {}", zoom);
        }
    }

    #[test]
    fn test_east_edge_clamps_to_last_column() {
        let tile = to_tile_coords(0.0, 180.0, 3).unwrap();
        assert_eq!(tile.x, 7);
    }

    #[test]
    fn test_mercator_limit_clamps_to_first_row() {
        let tile = to_tile_coords(MAX_LAT, -180.0, 3).unwrap();
        assert_eq!((tile.x, tile.y), (0, 0));

        let tile = to_tile_coords(MIN_LAT, 0.0, 3).unwrap();
        assert_eq!(tile.y, 7);
    }

    #[test]
    fn test_y_grows_southward() {
        let north = to_tile_coords(20.0, 0.0, 8).unwrap();
        let south = to_tile_coords(10.0, 0.0, 8).unwrap();
        assert_eq!(north.y, 113);
        assert_eq!(south.y, 120);
    }

    #[test]
    fn test_invalid_latitude() {
        let result = to_tile_coords(90.0, 0.0, 10);
        assert!(matches!(result, Err(CoordError::InvalidLatitude(_))));
    }

    #[test]
    fn test_nan_latitude_rejected() {
        let result = to_tile_coords(f64::NAN, 0.0, 10);
        assert!(matches!(result, Err(CoordError::InvalidLatitude(_))));
    }

    #[test]
    fn test_invalid_zoom() {
        let result = to_tile_coords(0.0, 0.0, MAX_ZOOM + 1);
        assert_eq!(result, Err(CoordError::InvalidZoom(MAX_ZOOM + 1)));
    }

    #[test]
    fn test_clamp_latitude() {
        assert_eq!(clamp_latitude(90.0), MAX_LAT);
        assert_eq!(clamp_latitude(-90.0), MIN_LAT);
        assert_eq!(clamp_latitude(45.0), 45.0);
    }

    #[test]
    fn test_tile_coord_new_rejects_out_of_grid() {
        assert!(TileCoord::new(2, 3, 3).is_ok());
        assert_eq!(
            TileCoord::new(2, 4, 0),
            Err(CoordError::OutOfGrid { zoom: 2, x: 4, y: 0 })
        );
    }

    #[test]
    fn test_tile_display() {
        let tile = TileCoord { zoom: 12, x: 2476, y: 1280 };
        assert_eq!(tile.to_string(), "12/2476/1280");
    }

    #[test]
    fn test_bounding_box_validate() {
        assert!(BoundingBox::new(20.0, 10.0, 1.0, 0.0).validate().is_ok());
        assert!(BoundingBox::new(10.0, 20.0, 1.0, 0.0).validate().is_err());
        assert!(BoundingBox::new(20.0, 10.0, 0.0, 1.0).validate().is_err());
        assert!(BoundingBox::new(f64::NAN, 10.0, 1.0, 0.0).validate().is_err());
    }

    #[test]
    fn test_bounding_box_contains() {
        let bbox = BoundingBox::new(20.0, 10.0, 1.0, 0.0);
        assert!(bbox.contains(15.0, 0.5));
        assert!(bbox.contains(20.0, 1.0));
        assert!(!bbox.contains(21.0, 0.5));
    }

    #[test]
    fn test_tile_to_lat_lon_northwest_corner() {
        let tile = TileCoord { zoom: 16, x: 19295, y: 24640 };
        let (lat, lon) = tile_to_lat_lon(&tile);
        assert!((lat - 40.713).abs() < 0.01);
        assert!((lon - (-74.007)).abs() < 0.01);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_tile_coords_in_bounds(
                lat in MIN_LAT..=MAX_LAT,
                lon in -180.0..=180.0_f64,
                zoom in 0u8..=MAX_ZOOM
            ) {
                let tile = to_tile_coords(lat, lon, zoom)?;
                let size = grid_size(zoom);
                prop_assert!(tile.x < size, "x {} >= {} at zoom {}", tile.x, size, zoom);
                prop_assert!(tile.y < size, "y {} >= {} at zoom {}", tile.y, size, zoom);
                prop_assert_eq!(tile.zoom, zoom);
            }

            #[test]
            fn test_roundtrip_within_one_tile(
                lat in -85.0..85.0_f64,
                lon in -180.0..180.0_f64,
                zoom in 0u8..=18
            ) {
                let tile = to_tile_coords(lat, lon, zoom)?;
                let (nw_lat, nw_lon) = tile_to_lat_lon(&tile);
                let tile_size = 360.0 / 2.0_f64.powi(zoom as i32);
                prop_assert!((nw_lat - lat).abs() < tile_size);
                prop_assert!((nw_lon - lon).abs() < tile_size);
            }

            #[test]
            fn test_y_not_increasing_with_latitude(
                lat1 in -85.0..0.0_f64,
                lat2 in 0.0..85.0_f64,
                zoom in 0u8..=18
            ) {
                let south = to_tile_coords(lat1, 0.0, zoom)?;
                let north = to_tile_coords(lat2, 0.0, zoom)?;
                prop_assert!(north.y <= south.y);
            }

            #[test]
            fn test_reject_invalid_longitude(
                lat in -85.0..85.0_f64,
                lon in 180.01..360.0_f64,
                zoom in 0u8..=18
            ) {
                let result = to_tile_coords(lat, lon, zoom);
                prop_assert!(matches!(result, Err(CoordError::InvalidLongitude(_))));
            }
        }
    }
}
