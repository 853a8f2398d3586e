//! Client state CLI commands.

use clap::Subcommand;
use loppo::config::ConfigFile;
use loppo::state::{ClientStateStore, MapCenter};

use super::common::ThemeArg;
use crate::error::CliError;

/// State action subcommands.
#[derive(Debug, Subcommand)]
pub enum StateAction {
    /// Show the saved client state
    Show,
    /// Restore defaults
    Reset,
    /// Save a map position, used by `download` when no area is given
    View {
        /// Latitude of the map center
        #[arg(allow_hyphen_values = true)]
        lat: f64,
        /// Longitude of the map center
        #[arg(allow_hyphen_values = true)]
        lon: f64,
        /// Map zoom level
        zoom: f64,
    },
    /// Save the theme preference
    Theme {
        #[arg(value_enum)]
        mode: ThemeArg,
    },
    /// Save the interface language (ru, en, uk, de, fr)
    Language { language: String },
}

/// Run a state subcommand.
pub fn run(action: StateAction) -> Result<(), CliError> {
    let config = ConfigFile::load()?;
    let store = ClientStateStore::load(config.state.file.clone());

    match action {
        StateAction::Show => {}
        StateAction::Reset => store.reset()?,
        StateAction::View { lat, lon, zoom } => {
            if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
                return Err(CliError::InvalidArgument(format!(
                    "Position {}, {} is outside the map",
                    lat, lon
                )));
            }
            store.set_map_view(MapCenter { lat, lon }, zoom)?;
        }
        StateAction::Theme { mode } => store.set_theme_mode(mode.into())?,
        StateAction::Language { language } => store.set_language(&language)?,
    }

    print_state(&store);
    Ok(())
}

fn print_state(store: &ClientStateStore) {
    let state = store.snapshot();
    let center = state.center_or_default();

    if let Some(path) = store.path() {
        println!("State file: {}", path.display());
    }
    println!(
        "Map view:   {:.4}, {:.4} zoom {}{}",
        center.lat,
        center.lon,
        state.zoom_or_default(),
        if state.map_center.is_none() { " (default)" } else { "" }
    );
    println!("Theme:      {}", state.theme_mode);
    println!("Language:   {}", state.language);
    match state.area_downloaded_at {
        Some(at) if state.area_downloaded => {
            println!("Downloaded: yes ({})", at.format("%Y-%m-%d %H:%M UTC"))
        }
        _ if state.area_downloaded => println!("Downloaded: yes"),
        _ => println!("Downloaded: no"),
    }
}
