//! Tile fetch strategies.

use std::fmt;
use std::num::NonZeroUsize;

/// How many tile requests a download keeps in flight.
///
/// Sequential is the default and bounds load on the tile provider to one
/// request at a time. Concurrent must be chosen explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchMode {
    #[default]
    Sequential,
    Concurrent { limit: NonZeroUsize },
}

impl FetchMode {
    /// Mode for a configured concurrency; 0 and 1 mean sequential.
    pub fn from_concurrency(concurrency: usize) -> Self {
        match NonZeroUsize::new(concurrency) {
            Some(limit) if limit.get() > 1 => FetchMode::Concurrent { limit },
            _ => FetchMode::Sequential,
        }
    }

    /// Maximum requests in flight.
    pub fn limit(&self) -> usize {
        match self {
            FetchMode::Sequential => 1,
            FetchMode::Concurrent { limit } => limit.get(),
        }
    }
}

impl fmt::Display for FetchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchMode::Sequential => write!(f, "sequential"),
            FetchMode::Concurrent { limit } => write!(f, "concurrent ({})", limit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_concurrency() {
        assert_eq!(FetchMode::from_concurrency(0), FetchMode::Sequential);
        assert_eq!(FetchMode::from_concurrency(1), FetchMode::Sequential);
        assert_eq!(FetchMode::from_concurrency(4).limit(), 4);
        assert_eq!(FetchMode::default().limit(), 1);
    }

    #[test]
    fn test_display() {
        assert_eq!(FetchMode::Sequential.to_string(), "sequential");
        assert_eq!(FetchMode::from_concurrency(8).to_string(), "concurrent (8)");
    }
}
