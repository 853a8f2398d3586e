//! Area download orchestration.
//!
//! Turns the visible map area into a bounded tile plan, fetches each tile
//! and stores successful responses in the tile cache. Per-tile failures are
//! skipped, never retried, and never fail the job.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use super::error::DownloadError;
use super::plan::{plan_area, PlanConfig};
use super::progress::{DownloadProgress, ProgressCallback};
use super::strategy::FetchMode;
use crate::cache::{CacheHandle, CachedResponse};
use crate::coord::TileCoord;
use crate::lifecycle::CacheManager;
use crate::map::{MapView, Theme};
use crate::provider::{HttpClient, TileSource};
use crate::state::ClientStateStore;

/// Download settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DownloadConfig {
    pub plan: PlanConfig,
    pub mode: FetchMode,
}

/// Final state of a finished download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadReport {
    /// Tiles attempted (the capped plan size).
    pub attempted: usize,
    /// Tiles fetched and stored.
    pub stored: usize,
    /// Tiles that failed to fetch or store.
    pub skipped: usize,
    /// Tile count before the cap.
    pub total_raw: u64,
    pub capped: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TileOutcome {
    Stored,
    Skipped,
}

/// Releases the busy flag when the job ends, however it ends.
struct JobGuard<'a> {
    busy: &'a AtomicBool,
}

impl<'a> JobGuard<'a> {
    fn acquire(busy: &'a AtomicBool) -> Option<Self> {
        busy.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { busy })
    }
}

impl Drop for JobGuard<'_> {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

/// Runs user-initiated area downloads, one at a time.
pub struct AreaDownloader {
    manager: Arc<CacheManager>,
    client: Arc<dyn HttpClient>,
    tiles: TileSource,
    state: Arc<ClientStateStore>,
    config: DownloadConfig,
    busy: AtomicBool,
}

impl AreaDownloader {
    pub fn new(
        manager: Arc<CacheManager>,
        client: Arc<dyn HttpClient>,
        tiles: TileSource,
        state: Arc<ClientStateStore>,
        config: DownloadConfig,
    ) -> Self {
        Self {
            manager,
            client,
            tiles,
            state,
            config,
            busy: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &DownloadConfig {
        &self.config
    }

    /// True while a download is running.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Downloads the tiles for the view's visible area.
    ///
    /// Rejects without side effects when another download is running or
    /// the view has no bounds yet. On completion the "area downloaded" flag
    /// is persisted, even if every tile was skipped.
    pub async fn download_area(
        &self,
        view: &dyn MapView,
        theme: Theme,
        on_progress: Option<ProgressCallback>,
    ) -> Result<DownloadReport, DownloadError> {
        let (bounds, zoom) = match (view.bounds(), view.zoom()) {
            (Some(bounds), Some(zoom)) => (bounds, zoom),
            _ => return Err(DownloadError::MapViewUnavailable),
        };

        let _guard = JobGuard::acquire(&self.busy).ok_or(DownloadError::Busy)?;

        let plan = plan_area(&bounds, zoom, &self.config.plan)?;
        let cache = self.manager.tile_cache().await?;
        let style = self.tiles.style_for(theme).to_string();
        let total = plan.len();
        let start = Instant::now();

        info!(
            tiles = total,
            total_raw = plan.total_raw,
            capped = plan.capped,
            zooms = ?plan.zooms,
            style = %style,
            mode = %self.config.mode,
            "Starting area download"
        );

        let mut stored = 0usize;
        let mut skipped = 0usize;

        if total == 0 {
            Self::emit(&on_progress, DownloadProgress::new(0, 0));
        }

        let cache = &cache;
        let style = style.as_str();

        // Outcomes arrive in plan order and are counted here only
        let mut outcomes = stream::iter(plan.tiles.iter().copied())
            .map(move |tile| self.fetch_tile(cache, style, tile))
            .buffered(self.config.mode.limit());

        let mut downloaded = 0usize;
        while let Some(outcome) = outcomes.next().await {
            match outcome {
                TileOutcome::Stored => stored += 1,
                TileOutcome::Skipped => skipped += 1,
            }
            downloaded += 1;
            Self::emit(&on_progress, DownloadProgress::new(downloaded, total));
        }

        if let Err(e) = self.state.mark_area_downloaded() {
            warn!(error = %e, "Failed to persist downloaded-area flag");
        }

        info!(
            stored,
            skipped,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Area download finished"
        );

        Ok(DownloadReport {
            attempted: total,
            stored,
            skipped,
            total_raw: plan.total_raw,
            capped: plan.capped,
        })
    }

    async fn fetch_tile(&self, cache: &CacheHandle, style: &str, tile: TileCoord) -> TileOutcome {
        let url = self.tiles.url_for(style, &tile);

        let response = match self.client.get(&url).await {
            Ok(response) if response.is_success() => response,
            Ok(response) => {
                debug!(tile = %tile, status = response.status, "Tile not available");
                return TileOutcome::Skipped;
            }
            Err(e) => {
                debug!(tile = %tile, error = %e, "Tile fetch failed");
                return TileOutcome::Skipped;
            }
        };

        let cached: CachedResponse = response.into();
        match cache.put(&url, cached).await {
            Ok(()) => TileOutcome::Stored,
            Err(e) => {
                warn!(tile = %tile, error = %e, "Failed to store tile");
                TileOutcome::Skipped
            }
        }
    }

    fn emit(on_progress: &Option<ProgressCallback>, progress: DownloadProgress) {
        if let Some(callback) = on_progress {
            callback(progress);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheStore, MemoryCacheStore};
    use crate::coord::BoundingBox;
    use crate::lifecycle::{CacheNames, ShellManifest};
    use crate::map::StaticMapView;
    use crate::provider::{HttpResponse, MockHttpClient};
    use parking_lot::Mutex;

    struct Fixture {
        manager: Arc<CacheManager>,
        client: Arc<MockHttpClient>,
        state: Arc<ClientStateStore>,
        downloader: Arc<AreaDownloader>,
    }

    fn fixture(config: DownloadConfig) -> Fixture {
        let store: Arc<dyn CacheStore> = Arc::new(MemoryCacheStore::new());
        let manager = Arc::new(CacheManager::new(
            store,
            CacheNames::default(),
            ShellManifest::default(),
        ));
        let client = Arc::new(MockHttpClient::new());
        let state = Arc::new(ClientStateStore::in_memory());
        let downloader = Arc::new(AreaDownloader::new(
            Arc::clone(&manager),
            Arc::clone(&client) as Arc<dyn HttpClient>,
            TileSource::default(),
            Arc::clone(&state),
            config,
        ));
        Fixture {
            manager,
            client,
            state,
            downloader,
        }
    }

    /// South 10°, north 20°, west 0°, east 1°: 48 tiles from zoom 6.
    fn strip_view(zoom: f64) -> StaticMapView {
        StaticMapView::new(BoundingBox::new(20.0, 10.0, 1.0, 0.0), zoom)
    }

    fn serve_all(f: &Fixture, theme: Theme, view: &StaticMapView) {
        let plan = plan_area(&view.bounds().unwrap(), view.zoom().unwrap(), &PlanConfig::default())
            .unwrap();
        let source = TileSource::default();
        for tile in plan.tiles {
            f.client.respond(
                &source.url_for(source.style_for(theme), &tile),
                HttpResponse::new(200, Some("image/png".to_string()), tile.to_string().into_bytes()),
            );
        }
    }

    fn recorder() -> (Arc<Mutex<Vec<DownloadProgress>>>, ProgressCallback) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        (seen, Box::new(move |p| sink.lock().push(p)))
    }

    #[tokio::test]
    async fn test_download_stores_every_tile() {
        let f = fixture(DownloadConfig::default());
        let view = strip_view(6.0);
        serve_all(&f, Theme::Dark, &view);

        let report = f.downloader.download_area(&view, Theme::Dark, None).await.unwrap();

        assert_eq!(report.attempted, 48);
        assert_eq!(report.stored, 48);
        assert_eq!(report.skipped, 0);
        assert!(!report.capped);
        assert!(f.state.is_area_downloaded());

        let keys = f.manager.tile_cache().await.unwrap().keys().await.unwrap();
        assert_eq!(keys.len(), 48);
        assert!(keys.iter().all(|k| k.contains("/dark_all/")));
    }

    #[tokio::test]
    async fn test_download_is_sequential_in_plan_order() {
        let f = fixture(DownloadConfig::default());
        let view = strip_view(6.0);

        f.downloader.download_area(&view, Theme::Light, None).await.unwrap();

        let urls = f.client.requested_urls();
        assert_eq!(urls.len(), 48);
        assert_eq!(urls[0], "https://a.basemaps.cartocdn.com/light_all/6/32/28.png");
        assert_eq!(urls[1], "https://a.basemaps.cartocdn.com/light_all/6/32/29.png");
        assert_eq!(urls[2], "https://a.basemaps.cartocdn.com/light_all/6/32/30.png");
    }

    #[tokio::test]
    async fn test_failures_are_skipped_not_fatal() {
        let f = fixture(DownloadConfig::default());
        let view = strip_view(6.0);
        serve_all(&f, Theme::Light, &view);
        f.client.fail("https://a.basemaps.cartocdn.com/light_all/6/32/28.png");
        f.client.respond(
            "https://a.basemaps.cartocdn.com/light_all/6/32/29.png",
            HttpResponse::new(404, None, Vec::new()),
        );

        let report = f.downloader.download_area(&view, Theme::Light, None).await.unwrap();

        assert_eq!(report.attempted, 48);
        assert_eq!(report.stored, 46);
        assert_eq!(report.skipped, 2);
        assert!(f.state.is_area_downloaded());
    }

    #[tokio::test]
    async fn test_progress_monotonic_and_complete() {
        let f = fixture(DownloadConfig::default());
        let view = strip_view(6.0);
        let (seen, callback) = recorder();

        f.downloader
            .download_area(&view, Theme::Light, Some(callback))
            .await
            .unwrap();

        let seen = seen.lock();
        assert_eq!(seen.len(), 48);
        assert!(seen.windows(2).all(|w| w[0].percent <= w[1].percent));
        assert_eq!(seen[0].percent, 2);
        assert_eq!(seen.last().unwrap().percent, 100);
        assert_eq!(seen.last().unwrap().downloaded, 48);
    }

    #[tokio::test]
    async fn test_capped_download() {
        let f = fixture(DownloadConfig::default());
        let view = StaticMapView::new(BoundingBox::new(60.0, 50.0, 40.0, 30.0), 8.0);
        let (seen, callback) = recorder();

        let report = f
            .downloader
            .download_area(&view, Theme::Light, Some(callback))
            .await
            .unwrap();

        assert_eq!(report.attempted, 200);
        assert_eq!(f.client.request_count(), 200);
        assert_eq!(report.total_raw, 7831);
        assert!(report.capped);
        assert_eq!(seen.lock().last().unwrap().percent, 100);
    }

    #[tokio::test]
    async fn test_unavailable_view_is_rejected() {
        let f = fixture(DownloadConfig::default());

        let result = f
            .downloader
            .download_area(&StaticMapView::uninitialized(), Theme::Light, None)
            .await;

        assert!(matches!(result, Err(DownloadError::MapViewUnavailable)));
        assert_eq!(f.client.request_count(), 0);
        assert!(!f.state.is_area_downloaded());
        assert!(!f.downloader.is_busy());
    }

    #[tokio::test]
    async fn test_empty_plan_completes_at_100() {
        let f = fixture(DownloadConfig::default());
        let view = strip_view(18.0);
        let (seen, callback) = recorder();

        let report = f
            .downloader
            .download_area(&view, Theme::Light, Some(callback))
            .await
            .unwrap();

        assert_eq!(report.attempted, 0);
        assert_eq!(*seen.lock(), vec![DownloadProgress::new(0, 0)]);
        assert!(f.state.is_area_downloaded());
    }

    #[tokio::test]
    async fn test_concurrent_start_is_rejected() {
        let f = fixture(DownloadConfig::default());
        let view = strip_view(6.0);

        let busy_guard = JobGuard::acquire(&f.downloader.busy).unwrap();
        let result = f.downloader.download_area(&view, Theme::Light, None).await;
        assert!(matches!(result, Err(DownloadError::Busy)));
        assert_eq!(f.client.request_count(), 0);
        drop(busy_guard);

        assert!(f.downloader.download_area(&view, Theme::Light, None).await.is_ok());
        assert!(!f.downloader.is_busy());
    }

    #[tokio::test]
    async fn test_concurrent_mode_keeps_progress_ordered() {
        let f = fixture(DownloadConfig {
            mode: FetchMode::from_concurrency(8),
            ..DownloadConfig::default()
        });
        let view = strip_view(6.0);
        serve_all(&f, Theme::Light, &view);
        let (seen, callback) = recorder();

        let report = f
            .downloader
            .download_area(&view, Theme::Light, Some(callback))
            .await
            .unwrap();

        assert_eq!(report.stored, 48);
        let seen = seen.lock();
        let counts: Vec<usize> = seen.iter().map(|p| p.downloaded).collect();
        assert_eq!(counts, (1..=48).collect::<Vec<_>>());
    }
}
