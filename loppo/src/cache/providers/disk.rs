//! On-disk cache store.
//!
//! Namespaces persist across process restarts until explicitly deleted.
//!
//! # File Layout
//!
//! ```text
//! {root}/{namespace}/{sha256(url)}.entry
//! ```
//!
//! Each entry file is a bincode record of `{url, status, content_type, body}`.
//! The URL is stored first so key enumeration only decodes the prefix of
//! each file. Writes go to a temporary file that is renamed into place, so a
//! reader never sees a partially stored response.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::cache::handle::CacheHandle;
use crate::cache::traits::{
    validate_namespace_name, BoxFuture, CacheError, CacheStore, Namespace,
};
use crate::cache::types::{CachedResponse, NamespaceStats};

const ENTRY_EXTENSION: &str = "entry";
const TEMP_EXTENSION: &str = "tmp";

/// Serialized form of a cache entry.
#[derive(Serialize, Deserialize)]
struct StoredEntry {
    url: String,
    status: u16,
    content_type: Option<String>,
    body: Vec<u8>,
}

/// Leading field of a [`StoredEntry`]; bincode stops reading after it.
#[derive(Deserialize)]
struct StoredKey {
    url: String,
}

/// Runs blocking filesystem work off the async runtime.
async fn blocking<T, F>(f: F) -> Result<T, CacheError>
where
    F: FnOnce() -> Result<T, CacheError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| CacheError::SpawnError(e.to_string()))?
}

fn entry_filename(url: &str) -> String {
    let digest = Sha256::digest(url.as_bytes());
    let mut name = String::with_capacity(64 + 1 + ENTRY_EXTENSION.len());
    for byte in digest {
        name.push_str(&format!("{:02x}", byte));
    }
    name.push('.');
    name.push_str(ENTRY_EXTENSION);
    name
}

fn is_entry_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == ENTRY_EXTENSION)
}

fn entry_files(dir: &Path) -> Result<Vec<PathBuf>, CacheError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut files = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if is_entry_file(&path) {
            files.push(path);
        }
    }
    Ok(files)
}

/// A namespace backed by one directory.
pub struct DiskNamespace {
    name: String,
    directory: PathBuf,
    temp_counter: Arc<AtomicU64>,
}

impl DiskNamespace {
    fn entry_path(&self, url: &str) -> PathBuf {
        self.directory.join(entry_filename(url))
    }

    fn read_entry(path: &Path, url: &str) -> Result<Option<CachedResponse>, CacheError> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let stored: StoredEntry = bincode::deserialize_from(BufReader::new(file))?;
        if stored.url != url {
            // Digest collision; treat as a miss rather than serve another URL
            warn!(expected = %url, found = %stored.url, "Cache entry URL mismatch");
            return Ok(None);
        }

        Ok(Some(CachedResponse::new(
            stored.status,
            stored.content_type,
            stored.body,
        )))
    }

    fn write_entry(
        directory: &Path,
        path: &Path,
        temp_id: u64,
        stored: &StoredEntry,
    ) -> Result<(), CacheError> {
        // A deleted namespace is not silently recreated by a stale handle
        if !directory.is_dir() {
            return Err(CacheError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("namespace directory {} does not exist", directory.display()),
            )));
        }

        let temp_path = path.with_extension(format!("{}.{}", temp_id, TEMP_EXTENSION));
        let result = (|| -> Result<(), CacheError> {
            let mut writer = BufWriter::new(File::create(&temp_path)?);
            bincode::serialize_into(&mut writer, stored)?;
            writer.flush()?;
            fs::rename(&temp_path, path)?;
            Ok(())
        })();

        if result.is_err() {
            let _ = fs::remove_file(&temp_path);
        }
        result
    }
}

impl Namespace for DiskNamespace {
    fn name(&self) -> &str {
        &self.name
    }

    fn get(&self, url: &str) -> BoxFuture<'_, Result<Option<CachedResponse>, CacheError>> {
        let path = self.entry_path(url);
        let url = url.to_string();
        Box::pin(async move { blocking(move || Self::read_entry(&path, &url)).await })
    }

    fn put(&self, url: &str, response: CachedResponse) -> BoxFuture<'_, Result<(), CacheError>> {
        let directory = self.directory.clone();
        let path = self.entry_path(url);
        let temp_id = self.temp_counter.fetch_add(1, Ordering::Relaxed);
        let stored = StoredEntry {
            url: url.to_string(),
            status: response.status,
            content_type: response.content_type,
            body: response.body.to_vec(),
        };

        Box::pin(async move {
            blocking(move || Self::write_entry(&directory, &path, temp_id, &stored)).await
        })
    }

    fn delete(&self, url: &str) -> BoxFuture<'_, Result<bool, CacheError>> {
        let path = self.entry_path(url);
        Box::pin(async move {
            blocking(move || match fs::remove_file(&path) {
                Ok(()) => Ok(true),
                Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
                Err(e) => Err(e.into()),
            })
            .await
        })
    }

    fn keys(&self) -> BoxFuture<'_, Result<Vec<String>, CacheError>> {
        let directory = self.directory.clone();
        Box::pin(async move {
            blocking(move || {
                let mut keys = Vec::new();
                for path in entry_files(&directory)? {
                    let file = match File::open(&path) {
                        Ok(file) => file,
                        // Removed between listing and opening
                        Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                        Err(e) => return Err(e.into()),
                    };
                    match bincode::deserialize_from::<_, StoredKey>(BufReader::new(file)) {
                        Ok(key) => keys.push(key.url),
                        Err(e) => warn!(path = %path.display(), error = %e, "Skipping unreadable cache entry"),
                    }
                }
                keys.sort();
                Ok(keys)
            })
            .await
        })
    }

    fn stats(&self) -> BoxFuture<'_, Result<NamespaceStats, CacheError>> {
        let directory = self.directory.clone();
        Box::pin(async move {
            blocking(move || {
                let mut stats = NamespaceStats::default();
                for path in entry_files(&directory)? {
                    match fs::metadata(&path) {
                        Ok(meta) => {
                            stats.entries += 1;
                            stats.bytes += meta.len();
                        }
                        Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                        Err(e) => return Err(e.into()),
                    }
                }
                Ok(stats)
            })
            .await
        })
    }
}

/// Persistent namespace registry rooted at a directory.
pub struct DiskCacheStore {
    root: PathBuf,
    temp_counter: Arc<AtomicU64>,
}

impl DiskCacheStore {
    /// Create the root directory if needed and return the store.
    pub async fn start(root: impl Into<PathBuf>) -> Result<Self, CacheError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;

        info!(root = %root.display(), "Disk cache store started");

        Ok(Self {
            root,
            temp_counter: Arc::new(AtomicU64::new(0)),
        })
    }

    /// Root directory holding one subdirectory per namespace.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl CacheStore for DiskCacheStore {
    fn open(&self, name: &str) -> BoxFuture<'_, Result<CacheHandle, CacheError>> {
        let name = name.to_string();
        Box::pin(async move {
            validate_namespace_name(&name)?;
            let directory = self.root.join(&name);
            tokio::fs::create_dir_all(&directory).await?;

            debug!(namespace = %name, "Opened disk namespace");

            Ok(CacheHandle::new(Arc::new(DiskNamespace {
                name,
                directory,
                temp_counter: Arc::clone(&self.temp_counter),
            })))
        })
    }

    fn list_namespaces(&self) -> BoxFuture<'_, Result<Vec<String>, CacheError>> {
        let root = self.root.clone();
        Box::pin(async move {
            blocking(move || {
                let mut names = Vec::new();
                for entry in fs::read_dir(&root)? {
                    let entry = entry?;
                    if !entry.file_type()?.is_dir() {
                        continue;
                    }
                    if let Some(name) = entry.file_name().to_str() {
                        if validate_namespace_name(name).is_ok() {
                            names.push(name.to_string());
                        }
                    }
                }
                names.sort();
                Ok(names)
            })
            .await
        })
    }

    fn delete_namespace(&self, name: &str) -> BoxFuture<'_, Result<bool, CacheError>> {
        let name = name.to_string();
        let root = self.root.clone();
        Box::pin(async move {
            validate_namespace_name(&name)?;
            let directory = root.join(&name);
            match tokio::fs::remove_dir_all(&directory).await {
                Ok(()) => {
                    debug!(namespace = %name, "Deleted disk namespace");
                    Ok(true)
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
                Err(e) => Err(e.into()),
            }
        })
    }
}
