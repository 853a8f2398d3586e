//! Cache namespace naming and the shell resource manifest.

use std::fmt;

/// Default namespace prefix.
pub const DEFAULT_CACHE_PREFIX: &str = "loppo";

/// Default shell version.
pub const DEFAULT_SHELL_VERSION: &str = "1";

/// Default origin serving the shell resources.
pub const DEFAULT_ORIGIN: &str = "http://localhost:5173";

/// Resources needed to boot the client offline.
pub const DEFAULT_SHELL_RESOURCES: &[&str] = &[
    "/",
    "/index.html",
    "/src/main.jsx",
    "/src/App.jsx",
    "/src/index.css",
];

/// Names of the two live cache namespaces.
///
/// The shell namespace carries the version so each deploy gets a fresh
/// generation; the tile namespace has no version and is never rotated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheNames {
    prefix: String,
    version: String,
}

impl CacheNames {
    pub fn new(prefix: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            version: version.into(),
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// `<prefix>-shell@<version>`
    pub fn shell(&self) -> String {
        format!("{}-shell@{}", self.prefix, self.version)
    }

    /// `<prefix>-tiles`
    pub fn tiles(&self) -> String {
        format!("{}-tiles", self.prefix)
    }

    /// True for namespaces that survive activation.
    pub fn is_current(&self, name: &str) -> bool {
        name == self.shell() || name == self.tiles()
    }
}

impl Default for CacheNames {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_PREFIX, DEFAULT_SHELL_VERSION)
    }
}

impl fmt::Display for CacheNames {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} + {}", self.shell(), self.tiles())
    }
}

/// Fixed list of shell resources, resolved against an origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellManifest {
    origin: String,
    paths: Vec<String>,
}

impl ShellManifest {
    pub fn new(origin: impl Into<String>, paths: Vec<String>) -> Self {
        let origin = origin.into().trim_end_matches('/').to_string();
        let paths = paths
            .into_iter()
            .map(|p| {
                if p.starts_with('/') {
                    p
                } else {
                    format!("/{}", p)
                }
            })
            .collect();
        Self { origin, paths }
    }

    /// The default resources served from `origin`.
    pub fn with_origin(origin: impl Into<String>) -> Self {
        Self::new(
            origin,
            DEFAULT_SHELL_RESOURCES.iter().map(|p| p.to_string()).collect(),
        )
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Absolute URLs of every resource, in manifest order.
    pub fn urls(&self) -> Vec<String> {
        self.paths.iter().map(|p| self.resolve(p)).collect()
    }

    /// Absolute URL of the root document.
    pub fn root_url(&self) -> String {
        self.resolve("/")
    }

    fn resolve(&self, path: &str) -> String {
        format!("{}{}", self.origin, path)
    }
}

impl Default for ShellManifest {
    fn default() -> Self {
        Self::with_origin(DEFAULT_ORIGIN)
    }
}
