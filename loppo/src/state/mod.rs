//! Persisted client state.
//!
//! Last map position, theme, language and whether an area has been
//! downloaded. Stored as JSON; a missing or unreadable file loads as
//! defaults so a bad file never keeps the client from starting.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::map::Theme;

/// Default map center (Moscow).
pub const DEFAULT_CENTER: MapCenter = MapCenter {
    lat: 55.7558,
    lon: 37.6173,
};

/// Default map zoom.
pub const DEFAULT_ZOOM: f64 = 12.0;

/// Default interface language.
pub const DEFAULT_LANGUAGE: &str = "ru";

/// Interface languages the client ships strings for.
pub const SUPPORTED_LANGUAGES: &[&str] = &["ru", "en", "uk", "de", "fr"];

/// Errors from loading or saving client state.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("Failed to write state file {path}: {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("Failed to encode state: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Unsupported language '{0}'")]
    UnsupportedLanguage(String),
}

/// User's theme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    /// Follow the system theme.
    #[default]
    Auto,
    Light,
    Dark,
}

impl ThemeMode {
    /// Active theme given the system's current preference.
    pub fn resolve(self, system: Theme) -> Theme {
        match self {
            ThemeMode::Auto => system,
            ThemeMode::Light => Theme::Light,
            ThemeMode::Dark => Theme::Dark,
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThemeMode::Auto => write!(f, "auto"),
            ThemeMode::Light => write!(f, "light"),
            ThemeMode::Dark => write!(f, "dark"),
        }
    }
}

impl FromStr for ThemeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(ThemeMode::Auto),
            "light" => Ok(ThemeMode::Light),
            "dark" => Ok(ThemeMode::Dark),
            other => Err(format!(
                "unknown theme mode '{}', expected auto, light or dark",
                other
            )),
        }
    }
}

/// A map center in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapCenter {
    pub lat: f64,
    pub lon: f64,
}

/// Everything the client remembers between runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientState {
    pub map_center: Option<MapCenter>,
    pub map_zoom: Option<f64>,
    pub theme_mode: ThemeMode,
    pub language: String,
    pub area_downloaded: bool,
    pub area_downloaded_at: Option<DateTime<Utc>>,
}

impl Default for ClientState {
    fn default() -> Self {
        Self {
            map_center: None,
            map_zoom: None,
            theme_mode: ThemeMode::Auto,
            language: DEFAULT_LANGUAGE.to_string(),
            area_downloaded: false,
            area_downloaded_at: None,
        }
    }
}

impl ClientState {
    /// Saved center, or the default.
    pub fn center_or_default(&self) -> MapCenter {
        self.map_center.unwrap_or(DEFAULT_CENTER)
    }

    /// Saved zoom, or the default.
    pub fn zoom_or_default(&self) -> f64 {
        self.map_zoom.filter(|z| z.is_finite()).unwrap_or(DEFAULT_ZOOM)
    }
}

/// Thread-safe holder of [`ClientState`], optionally backed by a file.
pub struct ClientStateStore {
    path: Option<PathBuf>,
    state: Mutex<ClientState>,
}

impl ClientStateStore {
    /// Loads state from `path`, falling back to defaults.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let state = Self::read(&path);
        Self {
            path: Some(path),
            state: Mutex::new(state),
        }
    }

    /// State that is never written anywhere.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            state: Mutex::new(ClientState::default()),
        }
    }

    fn read(path: &Path) -> ClientState {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No state file, using defaults");
                return ClientState::default();
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Cannot read state file, using defaults");
                return ClientState::default();
            }
        };

        match serde_json::from_str(&content) {
            Ok(state) => state,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Corrupt state file, using defaults");
                ClientState::default()
            }
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> ClientState {
        self.state.lock().clone()
    }

    /// Applies `f` to the state and persists the result.
    pub fn update<F>(&self, f: F) -> Result<ClientState, StateError>
    where
        F: FnOnce(&mut ClientState),
    {
        let mut state = self.state.lock();
        f(&mut state);
        let snapshot = state.clone();
        self.persist(&snapshot)?;
        Ok(snapshot)
    }

    pub fn set_map_view(&self, center: MapCenter, zoom: f64) -> Result<(), StateError> {
        self.update(|s| {
            s.map_center = Some(center);
            s.map_zoom = Some(zoom);
        })
        .map(|_| ())
    }

    pub fn set_theme_mode(&self, mode: ThemeMode) -> Result<(), StateError> {
        self.update(|s| s.theme_mode = mode).map(|_| ())
    }

    pub fn set_language(&self, language: &str) -> Result<(), StateError> {
        if !SUPPORTED_LANGUAGES.contains(&language) {
            return Err(StateError::UnsupportedLanguage(language.to_string()));
        }
        self.update(|s| s.language = language.to_string()).map(|_| ())
    }

    /// Records that an area download finished.
    pub fn mark_area_downloaded(&self) -> Result<(), StateError> {
        self.update(|s| {
            s.area_downloaded = true;
            s.area_downloaded_at = Some(Utc::now());
        })
        .map(|_| ())
    }

    pub fn is_area_downloaded(&self) -> bool {
        self.state.lock().area_downloaded
    }

    /// Restores defaults and persists them.
    pub fn reset(&self) -> Result<(), StateError> {
        self.update(|s| *s = ClientState::default()).map(|_| ())
    }

    fn persist(&self, state: &ClientState) -> Result<(), StateError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let json = serde_json::to_string_pretty(state)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| StateError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let temp = path.with_extension("json.tmp");
        fs::write(&temp, json)
            .and_then(|_| fs::rename(&temp, path))
            .map_err(|source| StateError::Write {
                path: path.clone(),
                source,
            })
    }
}
