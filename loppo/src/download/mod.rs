//! Area download orchestration.
//!
//! ```text
//! MapView ──bounds, zoom──► plan_area ──TilePlan (≤ max_tiles)──► AreaDownloader
//!                                                                   │
//!                                  HttpClient ◄──── fetch ──────────┤
//!                                  tile cache ◄──── put (2xx) ──────┤
//!                                  progress   ◄──── after each tile ┘
//! ```

mod error;
mod orchestrator;
mod plan;
mod progress;
mod strategy;

pub use error::DownloadError;
pub use orchestrator::{AreaDownloader, DownloadConfig, DownloadReport};
pub use plan::{
    plan_area, zoom_range, PlanConfig, TilePlan, DEFAULT_MAX_TILES, DEFAULT_MAX_ZOOM,
    DEFAULT_ZOOM_SPAN,
};
pub use progress::{percent, DownloadProgress, ProgressCallback};
pub use strategy::FetchMode;
