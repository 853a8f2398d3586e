//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;

use loppo::app::AppError;
use loppo::cache::CacheError;
use loppo::config::ConfigFileError;
use loppo::download::DownloadError;
use loppo::fetch::FetchHostError;
use loppo::lifecycle::LifecycleError;
use loppo::state::StateError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Bad command-line arguments
    InvalidArgument(String),
    /// Failed to create the async runtime
    Runtime(std::io::Error),
    /// Failed to start the application
    Startup(AppError),
    /// Cache store operation failed
    Cache(CacheError),
    /// Install or activation failed
    Lifecycle(LifecycleError),
    /// Area download failed
    Download(DownloadError),
    /// Request routing failed
    Fetch(FetchHostError),
    /// Client state could not be saved
    State(StateError),
    /// Failed to write output file
    FileWrite { path: String, error: std::io::Error },
}

impl CliError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgument(_) | CliError::Config(_) => 2,
            CliError::Download(DownloadError::Busy) => 3,
            _ => 1,
        }
    }

    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Download(DownloadError::MapViewUnavailable) => {
                eprintln!();
                eprintln!("No map view is known yet. Either:");
                eprintln!("  1. Pass the area: --north --south --east --west --zoom");
                eprintln!("  2. Save a view first: loppo state view <lat> <lon> <zoom>");
            }
            CliError::Lifecycle(LifecycleError::ShellResourceFailed { .. }) => {
                eprintln!();
                eprintln!("Check that the shell origin is reachable:");
                eprintln!("  loppo config get app.origin");
            }
            CliError::Lifecycle(LifecycleError::NotInstalled { .. }) => {
                eprintln!();
                eprintln!("Run 'loppo install' before activating.");
            }
            _ => {}
        }

        process::exit(self.exit_code())
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::InvalidArgument(msg) => write!(f, "{}", msg),
            CliError::Runtime(e) => write!(f, "Failed to create async runtime: {}", e),
            CliError::Startup(e) => write!(f, "{}", e),
            CliError::Cache(e) => write!(f, "Cache error: {}", e),
            CliError::Lifecycle(e) => write!(f, "{}", e),
            CliError::Download(e) => write!(f, "Download failed: {}", e),
            CliError::Fetch(e) => write!(f, "Request failed: {}", e),
            CliError::State(e) => write!(f, "{}", e),
            CliError::FileWrite { path, error } => {
                write!(f, "Failed to write file '{}': {}", path, error)
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Runtime(e) => Some(e),
            CliError::Startup(e) => Some(e),
            CliError::Cache(e) => Some(e),
            CliError::Lifecycle(e) => Some(e),
            CliError::Download(e) => Some(e),
            CliError::Fetch(e) => Some(e),
            CliError::State(e) => Some(e),
            CliError::FileWrite { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<AppError> for CliError {
    fn from(e: AppError) -> Self {
        CliError::Startup(e)
    }
}

impl From<CacheError> for CliError {
    fn from(e: CacheError) -> Self {
        CliError::Cache(e)
    }
}

impl From<LifecycleError> for CliError {
    fn from(e: LifecycleError) -> Self {
        CliError::Lifecycle(e)
    }
}

impl From<DownloadError> for CliError {
    fn from(e: DownloadError) -> Self {
        CliError::Download(e)
    }
}

impl From<FetchHostError> for CliError {
    fn from(e: FetchHostError) -> Self {
        CliError::Fetch(e)
    }
}

impl From<StateError> for CliError {
    fn from(e: StateError) -> Self {
        CliError::State(e)
    }
}
