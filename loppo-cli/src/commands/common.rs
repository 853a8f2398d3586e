//! Common types and utilities shared across CLI commands.

use clap::ValueEnum;
use loppo::map::Theme;
use loppo::state::ThemeMode;

/// Theme selection for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ThemeArg {
    /// Use the theme saved in client state
    Auto,
    /// Light map style
    Light,
    /// Dark map style
    Dark,
}

impl From<ThemeArg> for ThemeMode {
    fn from(theme: ThemeArg) -> Self {
        match theme {
            ThemeArg::Auto => ThemeMode::Auto,
            ThemeArg::Light => ThemeMode::Light,
            ThemeArg::Dark => ThemeMode::Dark,
        }
    }
}

/// Theme to fetch tiles for: the CLI flag wins, then the saved mode.
///
/// A terminal has no system theme, so `auto` resolves to light.
pub fn resolve_theme(cli: Option<ThemeArg>, saved: ThemeMode) -> Theme {
    match cli.map(ThemeMode::from) {
        Some(ThemeMode::Auto) | None => saved.resolve(Theme::default()),
        Some(mode) => mode.resolve(Theme::default()),
    }
}

/// Human-readable byte count.
pub fn format_bytes(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    const GB: f64 = MB * 1024.0;

    let b = bytes as f64;
    if b >= GB {
        format!("{:.2} GB", b / GB)
    } else if b >= MB {
        format!("{:.2} MB", b / MB)
    } else if b >= KB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_theme() {
        assert_eq!(resolve_theme(None, ThemeMode::Dark), Theme::Dark);
        assert_eq!(resolve_theme(Some(ThemeArg::Auto), ThemeMode::Dark), Theme::Dark);
        assert_eq!(resolve_theme(Some(ThemeArg::Light), ThemeMode::Dark), Theme::Light);
        assert_eq!(resolve_theme(None, ThemeMode::Auto), Theme::Light);
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.00 MB");
    }
}
