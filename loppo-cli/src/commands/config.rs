//! Configuration management CLI commands.
//!
//! `config get`, `config set`, `config list`, `config path` and `config init`
//! read and write `~/.loppo/config.ini`.

use std::path::Path;

use clap::Subcommand;
use loppo::config::{config_file_path, ConfigFile, ConfigKey};

use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Get a configuration value
    Get {
        /// Configuration key in format section.key (e.g., download.max_tiles)
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key in format section.key (e.g., download.max_tiles)
        key: String,

        /// Value to set
        value: String,
    },

    /// List all configuration settings
    List,

    /// Show the configuration file path
    Path,

    /// Write a commented config file with defaults, if none exists
    Init,
}

/// Run a config subcommand.
pub fn run(command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Get { key } => {
            let key = parse_key(&key)?;
            println!("{}", key.get(&ConfigFile::load()?));
            Ok(())
        }
        ConfigCommands::Set { key, value } => {
            let key = parse_key(&key)?;
            let config = set_value(&config_file_path(), key, &value)?;
            println!("Set {} = {}", key.name(), key.get(&config));
            Ok(())
        }
        ConfigCommands::List => {
            print_settings(&ConfigFile::load()?);
            Ok(())
        }
        ConfigCommands::Path => {
            println!("{}", config_file_path().display());
            Ok(())
        }
        ConfigCommands::Init => {
            let path = ConfigFile::ensure_exists()?;
            println!("Config file: {}", path.display());
            Ok(())
        }
    }
}

fn parse_key(key: &str) -> Result<ConfigKey, CliError> {
    key.parse().map_err(|_| {
        CliError::Config(format!(
            "Unknown configuration key '{}'. Use 'loppo config list' to see available keys.",
            key
        ))
    })
}

/// Validates and writes one key into the config file at `path`.
///
/// Nothing is written when the value is rejected.
fn set_value(path: &Path, key: ConfigKey, value: &str) -> Result<ConfigFile, CliError> {
    let mut config = ConfigFile::load_from(path)?;
    key.set(&mut config, value)
        .map_err(|e| CliError::Config(e.to_string()))?;
    config.save_to(path)?;
    Ok(config)
}

fn print_settings(config: &ConfigFile) {
    let mut current_section = "";

    for key in ConfigKey::all() {
        let section = key.section();
        if section != current_section {
            if !current_section.is_empty() {
                println!();
            }
            println!("[{}]", section);
            current_section = section;
        }
        println!("  {} = {}", key.key_name(), key.get(config));
    }
}
