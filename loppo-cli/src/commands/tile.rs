//! Tile command - show the tile containing a point.

use loppo::config::ConfigFile;
use loppo::coord::{tile_to_lat_lon, to_tile_coords};
use loppo::provider::TileSource;

use super::common::{resolve_theme, ThemeArg};
use crate::error::CliError;

/// Run the tile command.
pub fn run(lat: f64, lon: f64, zoom: u8, theme: Option<ThemeArg>) -> Result<(), CliError> {
    let config = ConfigFile::load().unwrap_or_default();

    let tile = to_tile_coords(lat, lon, zoom)
        .map_err(|e| CliError::InvalidArgument(e.to_string()))?;
    let (north, west) = tile_to_lat_lon(&tile);

    let source = TileSource::new(config.tiles.url_template.clone(), config.tiles.hosts.clone())
        .with_styles(config.tiles.light_style.clone(), config.tiles.dark_style.clone());
    let style = source.style_for(resolve_theme(theme, Default::default()));

    println!("Location: {}, {}", lat, lon);
    println!("Tile:     z={} x={} y={}", tile.zoom, tile.x, tile.y);
    println!("NW edge:  {:.6}, {:.6}", north, west);
    println!("URL:      {}", source.url_for(style, &tile));

    Ok(())
}
