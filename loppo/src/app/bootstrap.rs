//! Application bootstrap implementation.
//!
//! `LoppoApp` starts the cache store first, then builds everything that
//! reads from it, so no component ever sees a store that is not running.

use std::sync::Arc;

use tracing::info;

use super::config::AppConfig;
use super::error::AppError;
use crate::cache::{CacheService, CacheStore};
use crate::download::AreaDownloader;
use crate::fetch::{FetchHandle, FetchHost, FetchInterceptor, DEFAULT_CHANNEL_CAPACITY};
use crate::lifecycle::CacheManager;
use crate::provider::{HttpClient, ReqwestClient};
use crate::state::ClientStateStore;

/// Loppo application with service lifecycle management.
///
/// Services are started in order:
/// 1. Cache store
/// 2. Lifecycle manager over the store
/// 3. Interceptor and its fetch host loop
/// 4. Area downloader
///
/// # Example
///
/// ```ignore
/// use loppo::app::{AppConfig, LoppoApp};
///
/// let app = LoppoApp::start(AppConfig::default()).await?;
/// app.manager().install(app.client().as_ref()).await?;
/// app.manager().activate().await?;
///
/// app.shutdown().await;
/// ```
pub struct LoppoApp {
    cache_service: CacheService,
    manager: Arc<CacheManager>,
    client: Arc<dyn HttpClient>,
    interceptor: Arc<FetchInterceptor>,
    downloader: Arc<AreaDownloader>,
    state: Arc<ClientStateStore>,
    fetch_host: FetchHost,
    fetch_handle: FetchHandle,
    config: AppConfig,
}

impl LoppoApp {
    /// Start the application with a reqwest-backed HTTP client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or the cache
    /// store fails to start.
    pub async fn start(config: AppConfig) -> Result<Self, AppError> {
        let client = ReqwestClient::with_timeout(config.timeout_secs)?;
        Self::start_with_client(config, Arc::new(client)).await
    }

    /// Start the application with the given HTTP client.
    pub async fn start_with_client(
        config: AppConfig,
        client: Arc<dyn HttpClient>,
    ) -> Result<Self, AppError> {
        info!(
            store = %config.store,
            namespaces = %config.names,
            "Starting Loppo"
        );

        let cache_service = CacheService::start(config.store.clone()).await?;

        let manager = Arc::new(CacheManager::new(
            cache_service.store(),
            config.names.clone(),
            config.manifest.clone(),
        ));

        let state = Arc::new(match &config.state_file {
            Some(path) => ClientStateStore::load(path.clone()),
            None => ClientStateStore::in_memory(),
        });

        let interceptor = Arc::new(FetchInterceptor::new(
            Arc::clone(&manager),
            Arc::clone(&client),
            config.tiles.clone(),
        ));
        let (fetch_host, fetch_handle) =
            FetchHost::spawn(Arc::clone(&interceptor), DEFAULT_CHANNEL_CAPACITY);

        let downloader = Arc::new(AreaDownloader::new(
            Arc::clone(&manager),
            Arc::clone(&client),
            config.tiles.clone(),
            Arc::clone(&state),
            config.download,
        ));

        info!(
            mode = %config.download.mode,
            max_tiles = config.download.plan.max_tiles,
            "Loppo started"
        );

        Ok(Self {
            cache_service,
            manager,
            client,
            interceptor,
            downloader,
            state,
            fetch_host,
            fetch_handle,
            config,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Store backing every namespace.
    pub fn store(&self) -> Arc<dyn CacheStore> {
        self.cache_service.store()
    }

    pub fn manager(&self) -> Arc<CacheManager> {
        Arc::clone(&self.manager)
    }

    pub fn client(&self) -> Arc<dyn HttpClient> {
        Arc::clone(&self.client)
    }

    pub fn interceptor(&self) -> Arc<FetchInterceptor> {
        Arc::clone(&self.interceptor)
    }

    pub fn downloader(&self) -> Arc<AreaDownloader> {
        Arc::clone(&self.downloader)
    }

    pub fn state(&self) -> Arc<ClientStateStore> {
        Arc::clone(&self.state)
    }

    /// Handle for routing requests through the fetch host.
    pub fn fetch_handle(&self) -> FetchHandle {
        self.fetch_handle.clone()
    }

    /// Shutdown the application gracefully, in reverse order of startup.
    pub async fn shutdown(self) {
        info!("Shutting down Loppo");

        self.fetch_host.shutdown().await;
        self.cache_service.shutdown().await;

        info!("Loppo shutdown complete");
    }
}
