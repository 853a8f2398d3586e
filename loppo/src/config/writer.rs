//! INI serialization logic for converting `ConfigFile` → INI string.

use super::keys::ConfigKey;
use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let value = |key: ConfigKey| key.get(config);

    format!(
        r#"[app]
; Shell cache version. Changing it moves the shell to a new cache namespace;
; the old one is deleted the next time the cache is activated.
version = {}
; Origin serving the application shell
origin = {}
; Prefix for every cache namespace name
cache_prefix = {}

[cache]
; Cache backend:
;   disk   - persists across runs under the cache directory (default)
;   memory - lives for the current process only
backend = {}
; Directory for the disk backend. One sub-directory per namespace.
directory = {}

[tiles]
; Tile URL template. {{style}}, {{z}}, {{x}} and {{y}} are substituted.
url_template = {}
; Comma-separated hosts whose GET requests are served cache-first.
; Subdomains match too (a.example.com matches example.com).
hosts = {}
; Map styles used for the light and dark themes
light_style = {}
dark_style = {}

[download]
; Most tiles fetched by one area download (default: 200)
max_tiles = {}
; Zoom levels fetched below the current one (default: 3)
zoom_span = {}
; Deepest zoom level fetched (default: 17)
max_zoom = {}
; Timeout in seconds for HTTP requests (default: 30)
timeout = {}
; Tile requests in flight during a download; 1 fetches one at a time (default: 1)
concurrency = {}

[state]
; Client state file (map position, theme, language, download flag)
file = {}

[logging]
; Log file location
file = {}
"#,
        value(ConfigKey::AppVersion),
        value(ConfigKey::AppOrigin),
        value(ConfigKey::AppCachePrefix),
        value(ConfigKey::CacheBackend),
        value(ConfigKey::CacheDirectory),
        value(ConfigKey::TilesUrlTemplate),
        value(ConfigKey::TilesHosts),
        value(ConfigKey::TilesLightStyle),
        value(ConfigKey::TilesDarkStyle),
        value(ConfigKey::DownloadMaxTiles),
        value(ConfigKey::DownloadZoomSpan),
        value(ConfigKey::DownloadMaxZoom),
        value(ConfigKey::DownloadTimeout),
        value(ConfigKey::DownloadConcurrency),
        value(ConfigKey::StateFile),
        value(ConfigKey::LoggingFile),
    )
}
