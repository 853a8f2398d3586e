//! Download command - cache the tiles for a map area ahead of time.

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use loppo::coord::BoundingBox;
use loppo::download::{DownloadProgress, ProgressCallback};
use loppo::map::{MapView, StaticMapView};
use loppo::state::ClientState;

use super::common::{resolve_theme, ThemeArg};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Viewport size assumed when downloading around the saved map center.
pub const DEFAULT_VIEWPORT: (u32, u32) = (1280, 800);

/// Arguments for the download command.
pub struct DownloadArgs {
    pub north: Option<f64>,
    pub south: Option<f64>,
    pub east: Option<f64>,
    pub west: Option<f64>,
    pub zoom: Option<f64>,
    pub theme: Option<ThemeArg>,
    pub offline: bool,
}

/// Run the download command.
pub fn run(args: DownloadArgs, debug: bool) -> Result<(), CliError> {
    let runner = CliRunner::new(debug)?;
    runner.log_startup("download");

    let app = runner.start_app(args.offline)?;
    let saved = app.state().snapshot();
    let view = match resolve_view(&args, &saved) {
        Ok(view) => view,
        Err(e) => {
            runner.stop_app(app);
            return Err(e);
        }
    };
    let theme = resolve_theme(args.theme, saved.theme_mode);

    if let Some(bounds) = view.bounds() {
        println!(
            "Downloading {} tiles for N {:.4} S {:.4} E {:.4} W {:.4} from zoom {}",
            theme,
            bounds.north,
            bounds.south,
            bounds.east,
            bounds.west,
            view.zoom().unwrap_or_default().floor()
        );
    }

    let bar = progress_bar();
    let result = runner.block_on(app.downloader().download_area(
        &view,
        theme,
        Some(progress_callback(bar.clone())),
    ));
    runner.stop_app(app);

    let report = match result {
        Ok(report) => report,
        Err(e) => {
            bar.abandon();
            return Err(e.into());
        }
    };
    bar.finish_with_message("done");

    println!(
        "{} {} stored, {} skipped",
        style("✓").green(),
        report.stored,
        report.skipped
    );
    if report.capped {
        println!(
            "{} Area needs {} tiles; only the first {} were fetched. Zoom in for full detail.",
            style("Note:").yellow(),
            report.total_raw,
            report.attempted
        );
    }

    Ok(())
}

/// The view to download: explicit bounds, or the saved map position.
fn resolve_view(args: &DownloadArgs, saved: &ClientState) -> Result<StaticMapView, CliError> {
    let zoom = args.zoom.unwrap_or_else(|| saved.zoom_or_default());

    match (args.north, args.south, args.east, args.west) {
        (Some(north), Some(south), Some(east), Some(west)) => {
            let bounds = BoundingBox::new(north, south, east, west);
            bounds
                .validate()
                .map_err(|e| CliError::InvalidArgument(e.to_string()))?;
            Ok(StaticMapView::new(bounds, zoom))
        }
        (None, None, None, None) => {
            let center = saved.center_or_default();
            let (width, height) = DEFAULT_VIEWPORT;
            Ok(StaticMapView::around(center.lat, center.lon, zoom, width, height))
        }
        _ => Err(CliError::InvalidArgument(
            "--north, --south, --east and --west must be given together".to_string(),
        )),
    }
}

fn progress_bar() -> ProgressBar {
    let bar = ProgressBar::new(0);
    let style = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
    )
    .map(|s| s.progress_chars("=> "))
    .unwrap_or_else(|_| ProgressStyle::default_bar());
    bar.set_style(style);
    bar
}

fn progress_callback(bar: ProgressBar) -> ProgressCallback {
    Box::new(move |progress: DownloadProgress| {
        bar.set_length(progress.total as u64);
        bar.set_position(progress.downloaded as u64);
        bar.set_message(format!("{}%", progress.percent));
    })
}
