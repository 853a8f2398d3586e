//! Loppo CLI - Command-line interface
//!
//! Hosts the Loppo library the way a map client would: installs and
//! activates the caches, routes requests through the interceptor and
//! downloads map areas for offline use.

mod commands;
mod error;
mod runner;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::cache::CacheAction;
use commands::common::ThemeArg;
use commands::config::ConfigCommands;
use commands::download::DownloadArgs;
use commands::fetch::FetchArgs;
use commands::state::StateAction;
use error::CliError;

#[derive(Parser)]
#[command(name = "loppo")]
#[command(version = loppo::VERSION)]
#[command(about = "Offline map tile caching", long_about = None)]
struct Cli {
    /// Enable debug logging (also echoed to stdout)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the tile containing a point and its URL
    Tile {
        /// Latitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        /// Longitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,

        /// Zoom level (0-22)
        #[arg(long, default_value = "12")]
        zoom: u8,

        /// Map style to build the URL for
        #[arg(long, value_enum)]
        theme: Option<ThemeArg>,
    },

    /// Fetch the application shell into a new shell cache
    Install {
        /// Activate right after a successful install
        #[arg(long)]
        activate: bool,
    },

    /// Delete every cache except the current shell and tile caches
    Activate,

    /// Route a request through the caches and show where the response came from
    Fetch {
        /// Request URL
        url: String,

        /// HTTP method
        #[arg(long, short = 'X', default_value = "GET")]
        method: String,

        /// Fail every network request
        #[arg(long)]
        offline: bool,

        /// Write the response body to a file
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Cache the tiles for a map area
    ///
    /// Without an area, downloads around the saved map position.
    Download {
        /// North edge latitude
        #[arg(long, allow_hyphen_values = true)]
        north: Option<f64>,

        /// South edge latitude
        #[arg(long, allow_hyphen_values = true)]
        south: Option<f64>,

        /// East edge longitude
        #[arg(long, allow_hyphen_values = true)]
        east: Option<f64>,

        /// West edge longitude
        #[arg(long, allow_hyphen_values = true)]
        west: Option<f64>,

        /// Current map zoom (defaults to the saved zoom)
        #[arg(long)]
        zoom: Option<f64>,

        /// Map style to download
        #[arg(long, value_enum)]
        theme: Option<ThemeArg>,

        /// Fail every network request
        #[arg(long)]
        offline: bool,
    },

    /// Manage cache namespaces
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },

    /// View or change configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// View or change saved client state
    State {
        #[command(subcommand)]
        action: StateAction,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        e.exit();
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let debug = cli.debug;

    match cli.command {
        Commands::Tile {
            lat,
            lon,
            zoom,
            theme,
        } => commands::tile::run(lat, lon, zoom, theme),
        Commands::Install { activate } => commands::lifecycle::run_install(debug, activate),
        Commands::Activate => commands::lifecycle::run_activate(debug),
        Commands::Fetch {
            url,
            method,
            offline,
            output,
        } => commands::fetch::run(
            FetchArgs {
                url,
                method,
                offline,
                output,
            },
            debug,
        ),
        Commands::Download {
            north,
            south,
            east,
            west,
            zoom,
            theme,
            offline,
        } => commands::download::run(
            DownloadArgs {
                north,
                south,
                east,
                west,
                zoom,
                theme,
                offline,
            },
            debug,
        ),
        Commands::Cache { action } => commands::cache::run(action, debug),
        Commands::Config { command } => commands::config::run(command),
        Commands::State { action } => commands::state::run(action),
    }
}
