//! Progress reporting for area downloads.

use std::fmt;

/// One progress emission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownloadProgress {
    /// Tiles attempted so far.
    pub downloaded: usize,
    /// Tiles in the (capped) plan.
    pub total: usize,
    /// `round(downloaded / total * 100)`; 100 for an empty plan.
    pub percent: u8,
}

impl DownloadProgress {
    pub fn new(downloaded: usize, total: usize) -> Self {
        Self {
            downloaded,
            total,
            percent: percent(downloaded, total),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.downloaded >= self.total
    }
}

impl fmt::Display for DownloadProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} ({}%)", self.downloaded, self.total, self.percent)
    }
}

/// Progress callback invoked after every tile attempt.
pub type ProgressCallback = Box<dyn Fn(DownloadProgress) + Send + Sync>;

/// Rounded completion percentage.
pub fn percent(downloaded: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    let downloaded = downloaded.min(total);
    ((downloaded as f64 / total as f64) * 100.0).round() as u8
}
