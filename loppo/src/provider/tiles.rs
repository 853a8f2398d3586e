//! Tile provider URL construction and host classification.

use crate::coord::TileCoord;
use crate::map::Theme;

/// Default basemap URL template.
pub const DEFAULT_URL_TEMPLATE: &str = "https://a.basemaps.cartocdn.com/{style}/{z}/{x}/{y}.png";

/// Default style variant for the light theme.
pub const DEFAULT_LIGHT_STYLE: &str = "light_all";

/// Default style variant for the dark theme.
pub const DEFAULT_DARK_STYLE: &str = "dark_all";

/// Domains whose requests are treated as map tiles.
pub const DEFAULT_TILE_HOSTS: &[&str] = &["basemaps.cartocdn.com", "tile.openstreetmap.org"];

/// Where map tiles come from and how to recognize them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileSource {
    url_template: String,
    hosts: Vec<String>,
    light_style: String,
    dark_style: String,
}

impl TileSource {
    /// Creates a source from a URL template with `{style}`, `{z}`, `{x}` and
    /// `{y}` placeholders and a list of tile domains.
    pub fn new(url_template: impl Into<String>, hosts: Vec<String>) -> Self {
        Self {
            url_template: url_template.into(),
            hosts: hosts
                .into_iter()
                .map(|h| h.trim().trim_end_matches('.').to_ascii_lowercase())
                .filter(|h| !h.is_empty())
                .collect(),
            light_style: DEFAULT_LIGHT_STYLE.to_string(),
            dark_style: DEFAULT_DARK_STYLE.to_string(),
        }
    }

    /// Overrides the style variants used for each theme.
    pub fn with_styles(mut self, light: impl Into<String>, dark: impl Into<String>) -> Self {
        self.light_style = light.into();
        self.dark_style = dark.into();
        self
    }

    pub fn url_template(&self) -> &str {
        &self.url_template
    }

    pub fn hosts(&self) -> &[String] {
        &self.hosts
    }

    /// Style variant for a theme.
    pub fn style_for(&self, theme: Theme) -> &str {
        match theme {
            Theme::Light => &self.light_style,
            Theme::Dark => &self.dark_style,
        }
    }

    /// Builds the provider URL for one tile.
    pub fn url_for(&self, style: &str, tile: &TileCoord) -> String {
        self.url_template
            .replace("{style}", style)
            .replace("{z}", &tile.zoom.to_string())
            .replace("{x}", &tile.x.to_string())
            .replace("{y}", &tile.y.to_string())
    }

    /// True when `host` is a tile domain or one of its subdomains.
    pub fn is_tile_host(&self, host: &str) -> bool {
        let host = host.trim_end_matches('.').to_ascii_lowercase();
        self.hosts.iter().any(|domain| {
            host == *domain
                || (host.len() > domain.len()
                    && host.ends_with(domain.as_str())
                    && host.as_bytes()[host.len() - domain.len() - 1] == b'.')
        })
    }

    /// True when `url` parses and its host is a tile domain.
    pub fn is_tile_url(&self, url: &str) -> bool {
        reqwest::Url::parse(url)
            .ok()
            .and_then(|parsed| parsed.host_str().map(|h| self.is_tile_host(h)))
            .unwrap_or(false)
    }
}

impl Default for TileSource {
    fn default() -> Self {
        Self::new(
            DEFAULT_URL_TEMPLATE,
            DEFAULT_TILE_HOSTS.iter().map(|h| h.to_string()).collect(),
        )
    }
}
