//! Install/activate lifecycle over the cache namespaces.

use std::fmt;
use std::sync::Arc;

use futures::future::join_all;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use super::error::{LifecycleError, LifecycleResult};
use super::names::{CacheNames, ShellManifest};
use crate::cache::{CacheHandle, CacheStore, CachedResponse};
use crate::provider::HttpClient;

/// Where this client version is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Constructed; nothing installed in this process.
    Parsed,
    Installing,
    /// Shell cache populated; ready to take over.
    Installed,
    Activating,
    /// Stale namespaces removed; this version is in control.
    Activated,
    /// Install failed; the previous version keeps serving.
    Redundant,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LifecycleState::Parsed => "parsed",
            LifecycleState::Installing => "installing",
            LifecycleState::Installed => "installed",
            LifecycleState::Activating => "activating",
            LifecycleState::Activated => "activated",
            LifecycleState::Redundant => "redundant",
        };
        write!(f, "{}", s)
    }
}

/// Outcome of a successful install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    /// Shell namespace that was populated.
    pub namespace: String,
    /// Number of resources stored.
    pub resources: usize,
    /// Total body bytes stored.
    pub bytes: u64,
    /// Supersede the previous version without waiting for its clients.
    pub skip_waiting: bool,
}

/// Outcome of a successful activation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationReport {
    /// Namespaces that were deleted, sorted.
    pub deleted: Vec<String>,
    /// Namespaces that remain, sorted.
    pub kept: Vec<String>,
    /// Take control of already-open clients immediately.
    pub claim_clients: bool,
}

/// Owns cache names and decides which namespaces are current.
///
/// Constructed once at startup and shared by `Arc` with the interceptor and
/// the downloader.
pub struct CacheManager {
    store: Arc<dyn CacheStore>,
    names: CacheNames,
    manifest: ShellManifest,
    state: Mutex<LifecycleState>,
}

impl CacheManager {
    pub fn new(store: Arc<dyn CacheStore>, names: CacheNames, manifest: ShellManifest) -> Self {
        Self {
            store,
            names,
            manifest,
            state: Mutex::new(LifecycleState::Parsed),
        }
    }

    pub fn names(&self) -> &CacheNames {
        &self.names
    }

    pub fn manifest(&self) -> &ShellManifest {
        &self.manifest
    }

    pub fn store(&self) -> Arc<dyn CacheStore> {
        Arc::clone(&self.store)
    }

    pub fn state(&self) -> LifecycleState {
        *self.state.lock()
    }

    fn set_state(&self, state: LifecycleState) {
        let mut current = self.state.lock();
        debug!(from = %*current, to = %state, "Lifecycle transition");
        *current = state;
    }

    /// Handle to the tile namespace.
    pub async fn tile_cache(&self) -> LifecycleResult<CacheHandle> {
        Ok(self.store.open(&self.names.tiles()).await?)
    }

    /// Handle to the current shell namespace.
    pub async fn shell_cache(&self) -> LifecycleResult<CacheHandle> {
        Ok(self.store.open(&self.names.shell()).await?)
    }

    /// Handle to the current shell namespace, if an earlier install created it.
    ///
    /// Unlike [`shell_cache`](Self::shell_cache) this never creates the
    /// namespace.
    pub async fn existing_shell_cache(&self) -> LifecycleResult<Option<CacheHandle>> {
        let shell = self.names.shell();
        if !self.store.list_namespaces().await?.contains(&shell) {
            return Ok(None);
        }
        Ok(Some(self.store.open(&shell).await?))
    }

    /// True when the current shell namespace holds every manifest resource.
    async fn shell_complete(&self) -> LifecycleResult<bool> {
        let Some(shell) = self.existing_shell_cache().await? else {
            return Ok(false);
        };
        let keys = shell.keys().await?;
        Ok(self.manifest.urls().iter().all(|url| keys.contains(url)))
    }

    /// Populates the current shell namespace with every manifest resource.
    ///
    /// All resources are fetched before anything is stored. If any fetch
    /// fails or returns a non-2xx status, nothing is stored and the state
    /// becomes [`LifecycleState::Redundant`].
    pub async fn install(&self, client: &dyn HttpClient) -> LifecycleResult<InstallReport> {
        self.set_state(LifecycleState::Installing);
        let namespace = self.names.shell();

        info!(namespace = %namespace, "Installing shell cache");

        match self.install_inner(client, &namespace).await {
            Ok(report) => {
                self.set_state(LifecycleState::Installed);
                info!(
                    namespace = %namespace,
                    resources = report.resources,
                    bytes = report.bytes,
                    "Shell cache installed"
                );
                Ok(report)
            }
            Err(e) => {
                self.set_state(LifecycleState::Redundant);
                warn!(namespace = %namespace, error = %e, "Shell cache install failed");
                Err(e)
            }
        }
    }

    async fn install_inner(
        &self,
        client: &dyn HttpClient,
        namespace: &str,
    ) -> LifecycleResult<InstallReport> {
        let urls = self.manifest.urls();
        let results = join_all(urls.iter().map(|url| client.get(url))).await;

        let mut responses = Vec::with_capacity(urls.len());
        for (url, result) in urls.iter().zip(results) {
            match result {
                Ok(response) if response.is_success() => responses.push((url, response)),
                Ok(response) => {
                    return Err(LifecycleError::ShellResourceFailed {
                        url: url.clone(),
                        reason: format!("HTTP {}", response.status),
                    })
                }
                Err(e) => {
                    return Err(LifecycleError::ShellResourceFailed {
                        url: url.clone(),
                        reason: e.to_string(),
                    })
                }
            }
        }

        let existed = self
            .store
            .list_namespaces()
            .await?
            .iter()
            .any(|n| n == namespace);
        let handle = self.store.open(namespace).await?;

        let mut bytes = 0u64;
        for (url, response) in &responses {
            bytes += response.body.len() as u64;
            let cached: CachedResponse = response.clone().into();
            if let Err(e) = handle.put(url, cached).await {
                // Leave no half-populated generation behind
                if !existed {
                    if let Err(cleanup) = self.store.delete_namespace(namespace).await {
                        warn!(namespace = %namespace, error = %cleanup, "Failed to remove partial shell cache");
                    }
                }
                return Err(e.into());
            }
        }

        Ok(InstallReport {
            namespace: namespace.to_string(),
            resources: responses.len(),
            bytes,
            skip_waiting: true,
        })
    }

    /// Deletes every namespace other than the current shell and tile
    /// namespaces.
    ///
    /// Requires a successful install in this process, or a complete shell
    /// namespace (every manifest resource stored) left by an earlier run.
    pub async fn activate(&self) -> LifecycleResult<ActivationReport> {
        let shell = self.names.shell();
        let ready = match self.state() {
            LifecycleState::Installed | LifecycleState::Activated => true,
            LifecycleState::Parsed => self.shell_complete().await?,
            _ => false,
        };
        if !ready {
            return Err(LifecycleError::NotInstalled { namespace: shell });
        }

        let previous = self.state();
        self.set_state(LifecycleState::Activating);

        match self.cleanup().await {
            Ok(report) => {
                self.set_state(LifecycleState::Activated);
                info!(
                    deleted = report.deleted.len(),
                    kept = ?report.kept,
                    "Activated"
                );
                Ok(report)
            }
            Err(e) => {
                self.set_state(previous);
                Err(e)
            }
        }
    }

    async fn cleanup(&self) -> LifecycleResult<ActivationReport> {
        let mut deleted = Vec::new();
        let mut kept = Vec::new();

        for name in self.store.list_namespaces().await? {
            if self.names.is_current(&name) {
                kept.push(name);
                continue;
            }
            if self.store.delete_namespace(&name).await? {
                info!(namespace = %name, "Deleted stale cache");
            }
            deleted.push(name);
        }

        Ok(ActivationReport {
            deleted,
            kept,
            claim_clients: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCacheStore;
    use crate::provider::{HttpResponse, MockHttpClient};

    const ORIGIN: &str = "http://app.test";

    fn manager(store: Arc<dyn CacheStore>, version: &str) -> CacheManager {
        CacheManager::new(
            store,
            CacheNames::new("loppo", version),
            ShellManifest::with_origin(ORIGIN),
        )
    }

    fn serve_manifest(client: &MockHttpClient, manifest: &ShellManifest) {
        for url in manifest.urls() {
            client.respond(
                &url,
                HttpResponse::new(200, Some("text/html".to_string()), url.clone().into_bytes()),
            );
        }
    }

    #[tokio::test]
    async fn test_install_stores_every_resource() {
        let store: Arc<dyn CacheStore> = Arc::new(MemoryCacheStore::new());
        let manager = manager(Arc::clone(&store), "1");
        let client = MockHttpClient::new();
        serve_manifest(&client, manager.manifest());

        let report = manager.install(&client).await.unwrap();

        assert_eq!(report.namespace, "loppo-shell@1");
        assert_eq!(report.resources, 5);
        assert!(report.skip_waiting);
        assert_eq!(manager.state(), LifecycleState::Installed);

        let shell = manager.shell_cache().await.unwrap();
        let root = shell.match_url("http://app.test/").await.unwrap().unwrap();
        assert_eq!(root.body.as_ref(), b"http://app.test/");
        assert_eq!(shell.keys().await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_install_is_all_or_nothing() {
        let store: Arc<dyn CacheStore> = Arc::new(MemoryCacheStore::new());
        let manager = manager(Arc::clone(&store), "1");
        let client = MockHttpClient::new();
        serve_manifest(&client, manager.manifest());
        client.respond(
            "http://app.test/src/index.css",
            HttpResponse::new(404, None, Vec::new()),
        );

        let err = manager.install(&client).await.unwrap_err();

        assert!(matches!(err, LifecycleError::ShellResourceFailed { ref url, .. } if url.ends_with("index.css")));
        assert_eq!(manager.state(), LifecycleState::Redundant);
        assert!(store.list_namespaces().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_install_fails_offline() {
        let store: Arc<dyn CacheStore> = Arc::new(MemoryCacheStore::new());
        let manager = manager(store, "1");

        let result = manager.install(&crate::provider::OfflineClient).await;
        assert!(result.is_err());
        assert!(manager.activate().await.is_err());
    }

    #[tokio::test]
    async fn test_activate_requires_install() {
        let store: Arc<dyn CacheStore> = Arc::new(MemoryCacheStore::new());
        let manager = manager(store, "1");

        let err = manager.activate().await.unwrap_err();
        assert!(matches!(err, LifecycleError::NotInstalled { .. }));
        assert_eq!(manager.state(), LifecycleState::Parsed);
    }

    #[tokio::test]
    async fn test_activate_deletes_stale_namespaces() {
        let store: Arc<dyn CacheStore> = Arc::new(MemoryCacheStore::new());
        for name in ["loppo-shell@1", "loppo-tiles", "orphan"] {
            store.open(name).await.unwrap();
        }
        let manager = manager(Arc::clone(&store), "2");
        let client = MockHttpClient::new();
        serve_manifest(&client, manager.manifest());

        manager.install(&client).await.unwrap();
        let report = manager.activate().await.unwrap();

        assert_eq!(report.deleted, vec!["loppo-shell@1", "orphan"]);
        assert_eq!(report.kept, vec!["loppo-shell@2", "loppo-tiles"]);
        assert!(report.claim_clients);
        assert_eq!(manager.state(), LifecycleState::Activated);
        assert_eq!(
            store.list_namespaces().await.unwrap(),
            vec!["loppo-shell@2", "loppo-tiles"]
        );
    }

    #[tokio::test]
    async fn test_activate_keeps_tiles() {
        let store: Arc<dyn CacheStore> = Arc::new(MemoryCacheStore::new());
        let manager = manager(Arc::clone(&store), "2");
        let tiles = manager.tile_cache().await.unwrap();
        tiles
            .put("https://t/1.png", CachedResponse::new(200, None, vec![1]))
            .await
            .unwrap();

        let client = MockHttpClient::new();
        serve_manifest(&client, manager.manifest());
        manager.install(&client).await.unwrap();
        manager.activate().await.unwrap();

        let tiles = manager.tile_cache().await.unwrap();
        assert!(tiles.match_url("https://t/1.png").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_activate_with_shell_from_earlier_run() {
        let store: Arc<dyn CacheStore> = Arc::new(MemoryCacheStore::new());
        store.open("loppo-shell@1").await.unwrap();

        // First run installs, second run only activates
        let client = MockHttpClient::new();
        let installer = manager(Arc::clone(&store), "2");
        serve_manifest(&client, installer.manifest());
        installer.install(&client).await.unwrap();

        let manager = manager(Arc::clone(&store), "2");
        let report = manager.activate().await.unwrap();

        assert_eq!(report.deleted, vec!["loppo-shell@1"]);
    }

    #[tokio::test]
    async fn test_activate_rejects_incomplete_shell_from_earlier_run() {
        let store: Arc<dyn CacheStore> = Arc::new(MemoryCacheStore::new());
        let old = store.open("loppo-shell@1").await.unwrap();
        old.put("http://app.test/", CachedResponse::new(200, None, b"old".to_vec()))
            .await
            .unwrap();
        let partial = store.open("loppo-shell@2").await.unwrap();
        partial
            .put("http://app.test/", CachedResponse::new(200, None, b"new".to_vec()))
            .await
            .unwrap();

        let manager = manager(Arc::clone(&store), "2");
        let err = manager.activate().await.unwrap_err();

        assert!(matches!(err, LifecycleError::NotInstalled { .. }));
        assert_eq!(manager.state(), LifecycleState::Parsed);
        assert_eq!(
            store.list_namespaces().await.unwrap(),
            vec!["loppo-shell@1", "loppo-shell@2"]
        );
    }

    #[tokio::test]
    async fn test_existing_shell_cache_does_not_create() {
        let store: Arc<dyn CacheStore> = Arc::new(MemoryCacheStore::new());
        let manager = manager(Arc::clone(&store), "1");

        assert!(manager.existing_shell_cache().await.unwrap().is_none());
        assert!(store.list_namespaces().await.unwrap().is_empty());

        manager.shell_cache().await.unwrap();
        assert!(manager.existing_shell_cache().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_activate_twice_is_idempotent() {
        let store: Arc<dyn CacheStore> = Arc::new(MemoryCacheStore::new());
        let manager = manager(Arc::clone(&store), "1");
        let client = MockHttpClient::new();
        serve_manifest(&client, manager.manifest());

        manager.install(&client).await.unwrap();
        manager.activate().await.unwrap();
        let second = manager.activate().await.unwrap();

        assert!(second.deleted.is_empty());
        assert_eq!(second.kept, vec!["loppo-shell@1"]);
    }
}
