//! CLI runner for common setup and operations.
//!
//! Loads the configuration, initializes logging and owns the Tokio runtime
//! the library services run on.

use std::future::Future;
use std::path::Path;
use std::sync::Arc;

use tokio::runtime::Runtime;
use tracing::info;

use loppo::app::{AppConfig, AppError, LoppoApp};
use loppo::config::ConfigFile;
use loppo::logging::{init_logging, LoggingGuard};
use loppo::provider::{HttpClient, OfflineClient, ReqwestClient};

use crate::error::CliError;

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Keeps the log file writer alive while the runner exists
    _logging_guard: LoggingGuard,
    config: ConfigFile,
    runtime: Runtime,
}

impl CliRunner {
    /// Create a runner, loading config and initializing logging.
    ///
    /// Log events go to the configured log file. They are echoed to stdout
    /// only in debug mode, or when stdout is not a terminal.
    pub fn new(debug: bool) -> Result<Self, CliError> {
        let config = ConfigFile::load()?;

        let log_path = &config.logging.file;
        let log_dir = log_path.parent().unwrap_or_else(|| Path::new("."));
        let log_file = log_path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "loppo.log".to_string());

        let stdout_enabled = debug || !atty::is(atty::Stream::Stdout);

        let logging_guard = init_logging(log_dir, &log_file, stdout_enabled, debug)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(CliError::Runtime)?;

        Ok(Self {
            _logging_guard: logging_guard,
            config,
            runtime,
        })
    }

    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("Loppo v{}", loppo::VERSION);
        info!("Loppo CLI: {} command", command);
    }

    /// Run a future to completion on the runner's runtime.
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    /// Start the application from the loaded configuration.
    ///
    /// With `offline`, every network request fails, so only cached content
    /// is served.
    pub fn start_app(&self, offline: bool) -> Result<LoppoApp, CliError> {
        let config = AppConfig::from_config_file(&self.config);

        let client: Arc<dyn HttpClient> = if offline {
            info!("Network disabled for this run");
            Arc::new(OfflineClient)
        } else {
            Arc::new(ReqwestClient::with_timeout(config.timeout_secs).map_err(AppError::from)?)
        };

        self.block_on(LoppoApp::start_with_client(config, client))
            .map_err(CliError::from)
    }

    /// Shut the application down on the runner's runtime.
    pub fn stop_app(&self, app: LoppoApp) {
        self.block_on(app.shutdown());
    }
}
