//! Routing of outbound requests through the caches.
//!
//! # Routes
//!
//! | Request | Policy |
//! |---|---|
//! | GET to a tile host | cache-first; network on miss, stored if 2xx; empty 404 when offline |
//! | other GET | network-first; shell cache, then root document, then 503 |
//! | non-GET | network only; 503 when offline |
//!
//! Only the tile route writes to a cache. The shell cache is written at
//! install time and nowhere else.

use std::sync::Arc;

use tracing::{debug, warn};

use super::request::{Request, Response};
use crate::cache::CachedResponse;
use crate::lifecycle::CacheManager;
use crate::provider::{HttpClient, TileSource};

/// Which policy a request is handled with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Tile,
    Shell,
    Passthrough,
}

/// Sits between the application and the network.
pub struct FetchInterceptor {
    manager: Arc<CacheManager>,
    client: Arc<dyn HttpClient>,
    tiles: TileSource,
}

impl FetchInterceptor {
    pub fn new(manager: Arc<CacheManager>, client: Arc<dyn HttpClient>, tiles: TileSource) -> Self {
        Self {
            manager,
            client,
            tiles,
        }
    }

    pub fn tile_source(&self) -> &TileSource {
        &self.tiles
    }

    /// Classifies a request.
    pub fn route(&self, request: &Request) -> Route {
        if !request.is_get() {
            Route::Passthrough
        } else if self.tiles.is_tile_url(&request.url) {
            Route::Tile
        } else {
            Route::Shell
        }
    }

    /// Produces a response for one request. Never fails.
    pub async fn handle(&self, request: Request) -> Response {
        let route = self.route(&request);
        let response = match route {
            Route::Tile => self.handle_tile(&request.url).await,
            Route::Shell => self.handle_shell(&request.url).await,
            Route::Passthrough => self.handle_passthrough(&request).await,
        };

        debug!(
            request = %request,
            route = ?route,
            status = response.status,
            source = %response.source,
            "Handled request"
        );
        response
    }

    async fn handle_tile(&self, url: &str) -> Response {
        let cache = match self.manager.tile_cache().await {
            Ok(cache) => Some(cache),
            Err(e) => {
                warn!(error = %e, "Tile cache unavailable");
                None
            }
        };

        if let Some(cache) = &cache {
            match cache.match_url(url).await {
                Ok(Some(hit)) => return hit.into(),
                Ok(None) => {}
                Err(e) => warn!(url = %url, error = %e, "Tile cache lookup failed"),
            }
        }

        let response = match self.client.get(url).await {
            Ok(response) => response,
            Err(e) => {
                debug!(url = %url, error = %e, "Tile unreachable, returning empty 404");
                return Response::missing_tile();
            }
        };

        if response.is_success() {
            if let Some(cache) = &cache {
                let cached: CachedResponse = response.clone().into();
                if let Err(e) = cache.put(url, cached).await {
                    warn!(url = %url, error = %e, "Failed to store tile");
                }
            }
        }

        response.into()
    }

    async fn handle_shell(&self, url: &str) -> Response {
        let error = match self.client.get(url).await {
            Ok(response) => return response.into(),
            Err(e) => e,
        };

        debug!(url = %url, error = %error, "Network failed, falling back to shell cache");

        let shell = match self.manager.existing_shell_cache().await {
            Ok(Some(shell)) => shell,
            Ok(None) => {
                debug!(url = %url, "No shell cache installed");
                return Response::unavailable();
            }
            Err(e) => {
                warn!(error = %e, "Shell cache unavailable");
                return Response::unavailable();
            }
        };

        let root = self.manager.manifest().root_url();
        for key in [url, root.as_str()] {
            match shell.match_url(key).await {
                Ok(Some(hit)) => return hit.into(),
                Ok(None) => {}
                Err(e) => warn!(url = %key, error = %e, "Shell cache lookup failed"),
            }
        }

        Response::unavailable()
    }

    async fn handle_passthrough(&self, request: &Request) -> Response {
        match self.client.send(&request.method, &request.url).await {
            Ok(response) => response.into(),
            Err(e) => {
                debug!(request = %request, error = %e, "Request failed");
                Response::unavailable()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheStore, MemoryCacheStore};
    use crate::fetch::ResponseSource;
    use crate::lifecycle::{CacheNames, LifecycleError, ShellManifest};
    use crate::provider::{HttpResponse, MockHttpClient};

    const TILE_URL: &str = "https://a.basemaps.cartocdn.com/dark_all/12/2476/1280.png";

    struct Fixture {
        store: Arc<dyn CacheStore>,
        manager: Arc<CacheManager>,
        client: Arc<MockHttpClient>,
        interceptor: FetchInterceptor,
    }

    fn fixture() -> Fixture {
        let store: Arc<dyn CacheStore> = Arc::new(MemoryCacheStore::new());
        let manager = Arc::new(CacheManager::new(
            Arc::clone(&store),
            CacheNames::new("loppo", "1"),
            ShellManifest::with_origin("http://app.test"),
        ));
        let client = Arc::new(MockHttpClient::new());
        let interceptor = FetchInterceptor::new(
            Arc::clone(&manager),
            Arc::clone(&client) as Arc<dyn HttpClient>,
            TileSource::default(),
        );
        Fixture {
            store,
            manager,
            client,
            interceptor,
        }
    }

    fn png(bytes: &[u8]) -> HttpResponse {
        HttpResponse::new(200, Some("image/png".to_string()), bytes.to_vec())
    }

    #[test]
    fn test_route_classification() {
        let f = fixture();
        assert_eq!(f.interceptor.route(&Request::get(TILE_URL)), Route::Tile);
        assert_eq!(
            f.interceptor.route(&Request::get("https://b.tile.openstreetmap.org/1/0/0.png")),
            Route::Tile
        );
        assert_eq!(
            f.interceptor.route(&Request::get("http://app.test/index.html")),
            Route::Shell
        );
        assert_eq!(
            f.interceptor.route(&Request::new("POST", TILE_URL)),
            Route::Passthrough
        );
    }

    #[tokio::test]
    async fn test_tile_miss_fetches_and_stores() {
        let f = fixture();
        f.client.respond(TILE_URL, png(&[1, 2, 3]));

        let response = f.interceptor.handle(Request::get(TILE_URL)).await;

        assert_eq!(response.status, 200);
        assert_eq!(response.source, ResponseSource::Network);
        let cached = f.manager.tile_cache().await.unwrap().match_url(TILE_URL).await.unwrap();
        assert_eq!(cached.unwrap().body.as_ref(), &[1, 2, 3]);
    }

    #[tokio::test]
    async fn test_tile_hit_skips_network() {
        let f = fixture();
        f.manager
            .tile_cache()
            .await
            .unwrap()
            .put(TILE_URL, png(&[9]).into())
            .await
            .unwrap();

        let response = f.interceptor.handle(Request::get(TILE_URL)).await;

        assert_eq!(response.source, ResponseSource::Cache);
        assert_eq!(response.body.as_ref(), &[9]);
        assert_eq!(f.client.request_count(), 0);
    }

    #[tokio::test]
    async fn test_tile_offline_returns_empty_404() {
        let f = fixture();

        let response = f.interceptor.handle(Request::get(TILE_URL)).await;

        assert_eq!(response, Response::missing_tile());
        assert!(f.manager.tile_cache().await.unwrap().keys().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_tile_error_status_not_stored() {
        let f = fixture();
        f.client.respond(TILE_URL, HttpResponse::new(500, None, Vec::new()));

        let response = f.interceptor.handle(Request::get(TILE_URL)).await;

        assert_eq!(response.status, 500);
        assert_eq!(response.source, ResponseSource::Network);
        assert!(f.manager.tile_cache().await.unwrap().keys().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_shell_prefers_network() {
        let f = fixture();
        f.manager
            .shell_cache()
            .await
            .unwrap()
            .put("http://app.test/index.html", CachedResponse::new(200, None, b"old".to_vec()))
            .await
            .unwrap();
        f.client.respond(
            "http://app.test/index.html",
            HttpResponse::new(200, None, b"new".to_vec()),
        );

        let response = f.interceptor.handle(Request::get("http://app.test/index.html")).await;

        assert_eq!(response.body.as_ref(), b"new");
        assert_eq!(response.source, ResponseSource::Network);
    }

    #[tokio::test]
    async fn test_shell_falls_back_to_cache_then_root() {
        let f = fixture();
        let shell = f.manager.shell_cache().await.unwrap();
        shell
            .put("http://app.test/src/main.jsx", CachedResponse::new(200, None, b"main".to_vec()))
            .await
            .unwrap();
        shell
            .put("http://app.test/", CachedResponse::new(200, None, b"root".to_vec()))
            .await
            .unwrap();

        let exact = f.interceptor.handle(Request::get("http://app.test/src/main.jsx")).await;
        assert_eq!(exact.body.as_ref(), b"main");
        assert_eq!(exact.source, ResponseSource::Cache);

        let navigation = f.interceptor.handle(Request::get("http://app.test/settings")).await;
        assert_eq!(navigation.body.as_ref(), b"root");
        assert_eq!(navigation.source, ResponseSource::Cache);
    }

    #[tokio::test]
    async fn test_shell_everything_missing_is_503() {
        let f = fixture();

        let response = f.interceptor.handle(Request::get("http://app.test/")).await;

        assert_eq!(response, Response::unavailable());
    }

    #[tokio::test]
    async fn test_offline_navigation_leaves_activation_blocked() {
        let f = fixture();
        let old = f.store.open("loppo-shell@0").await.unwrap();
        old.put("http://app.test/", CachedResponse::new(200, None, b"old".to_vec()))
            .await
            .unwrap();

        let response = f.interceptor.handle(Request::get("http://app.test/")).await;
        assert_eq!(response, Response::unavailable());
        assert_eq!(f.store.list_namespaces().await.unwrap(), vec!["loppo-shell@0"]);

        let err = f.manager.activate().await.unwrap_err();
        assert!(matches!(err, LifecycleError::NotInstalled { .. }));
        assert_eq!(f.store.list_namespaces().await.unwrap(), vec!["loppo-shell@0"]);
    }

    #[tokio::test]
    async fn test_shell_response_never_cached() {
        let f = fixture();
        f.client.respond(
            "http://app.test/api/weather",
            HttpResponse::new(200, None, b"sunny".to_vec()),
        );

        f.interceptor.handle(Request::get("http://app.test/api/weather")).await;

        assert!(f.store.list_namespaces().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_non_get_bypasses_cache() {
        let f = fixture();
        f.manager
            .tile_cache()
            .await
            .unwrap()
            .put(TILE_URL, png(&[1]).into())
            .await
            .unwrap();

        let response = f.interceptor.handle(Request::new("POST", TILE_URL)).await;

        assert_eq!(response, Response::unavailable());
        assert_eq!(f.client.requests(), vec![("POST".to_string(), TILE_URL.to_string())]);
    }
}
