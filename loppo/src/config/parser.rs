//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! Values go through [`ConfigKey::set`], so the file and `config set`
//! accept exactly the same inputs.

use ini::Ini;

use super::file::ConfigFileError;
use super::keys::{ConfigKey, ConfigKeyError};
use super::settings::ConfigFile;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
/// Empty values keep the default. Unknown sections and keys are ignored.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    for key in ConfigKey::all() {
        let Some(section) = ini.section(Some(key.section())) else {
            continue;
        };
        let Some(value) = section.get(key.key_name()) else {
            continue;
        };
        if value.trim().is_empty() {
            continue;
        }

        key.set(&mut config, value).map_err(|e| {
            let reason = match e {
                ConfigKeyError::ValidationFailed { reason, .. } => reason,
                ConfigKeyError::UnknownKey(k) => format!("unknown key {}", k),
            };
            ConfigFileError::InvalidValue {
                section: key.section().to_string(),
                key: key.key_name().to_string(),
                value: value.to_string(),
                reason,
            }
        })?;
    }

    Ok(config)
}
