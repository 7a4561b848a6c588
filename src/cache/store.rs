//! On-disk cache of downloaded modules

use crate::cache::database::{new_id, CacheDatabase};
use crate::config::{Config, ConfigManager};
use crate::error::{GistupError, GistupResult};
use crate::transport::{HttpTransport, Transport};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Database file name inside the cache root
pub const DATABASE_FILE: &str = "files.json";

/// Blob directory name inside the cache root
pub const FILES_DIR: &str = "files";

/// Extension of every cached blob
///
/// Fixed so that existing records keep resolving whatever the content is;
/// wasmtime tells text from binary by the bytes.
pub const BLOB_EXTENSION: &str = "wat";

/// One cache record with what is known about its blob
#[derive(Debug, Clone, Serialize)]
pub struct CacheEntry {
    pub url: String,
    pub id: String,
    pub path: PathBuf,
    /// Blob size in bytes, `None` when the blob is missing
    pub size: Option<u64>,
    pub modified: Option<DateTime<Utc>>,
}

/// Cache store: URL bookkeeping plus the blob directory
pub struct CacheStore {
    root: PathBuf,
    transport: Box<dyn Transport>,
}

impl CacheStore {
    /// Create a store rooted at `root` that downloads through `transport`
    pub fn new(root: impl Into<PathBuf>, transport: Box<dyn Transport>) -> Self {
        Self {
            root: root.into(),
            transport,
        }
    }

    /// Create a store from configuration, using the HTTP transport
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            ConfigManager::cache_dir(config),
            Box::new(HttpTransport::new(&config.http)),
        )
    }

    /// Cache root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn database_path(&self) -> PathBuf {
        self.root.join(DATABASE_FILE)
    }

    pub fn files_dir(&self) -> PathBuf {
        self.root.join(FILES_DIR)
    }

    /// Path of the blob stored under `id`
    pub fn blob_path(&self, id: &str) -> PathBuf {
        self.files_dir().join(format!("{}.{}", id, BLOB_EXTENSION))
    }

    pub fn load_database(&self) -> GistupResult<CacheDatabase> {
        CacheDatabase::load(&self.database_path())
    }

    pub fn save_database(&self, db: &CacheDatabase) -> GistupResult<()> {
        db.save(&self.database_path())
    }

    /// Cached path for `url`, without touching the network
    pub fn lookup(&self, url: &str) -> GistupResult<Option<PathBuf>> {
        let db = self.load_database()?;
        Ok(db.get(url).map(|id| self.blob_path(id)))
    }

    /// Resolve `url` to a local file, downloading on a miss or when forced
    ///
    /// A forced refresh always allocates a new identifier; the blob of the
    /// previous identifier is left on disk (see [`CacheStore::prune_orphans`]).
    pub fn resolve(&self, url: &str, force: bool) -> GistupResult<PathBuf> {
        let mut db = self.load_database()?;

        if !force {
            if let Some(id) = db.get(url) {
                let path = self.blob_path(id);
                debug!("Cache hit for {}: {}", url, path.display());
                return Ok(path);
            }
        }

        let id = new_id();
        let path = self.blob_path(&id);
        self.download(url, &path)?;

        if let Some(old) = db.insert(url, id) {
            debug!("Replaced cache id {} for {}", old, url);
        }
        self.save_database(&db)?;

        Ok(path)
    }

    fn download(&self, url: &str, path: &Path) -> GistupResult<()> {
        info!("Downloading {}", url);
        let bytes = self.transport.fetch(url)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                GistupError::io(format!("creating directory {}", parent.display()), e)
            })?;
        }
        fs::write(path, &bytes)
            .map_err(|e| GistupError::io(format!("writing {}", path.display()), e))?;

        debug!("Stored {} bytes at {}", bytes.len(), path.display());
        Ok(())
    }

    /// Delete the whole cache directory: database and every blob
    pub fn purge_all(&self) -> GistupResult<()> {
        if !self.root.exists() {
            debug!("Cache directory {} does not exist", self.root.display());
            return Ok(());
        }

        fs::remove_dir_all(&self.root).map_err(|e| {
            GistupError::io(format!("removing cache directory {}", self.root.display()), e)
        })?;

        info!("Removed cache directory {}", self.root.display());
        Ok(())
    }

    /// All records in the database with their blob metadata
    pub fn entries(&self) -> GistupResult<Vec<CacheEntry>> {
        let db = self.load_database()?;

        Ok(db
            .iter()
            .map(|(url, id)| {
                let path = self.blob_path(id);
                let meta = fs::metadata(&path).ok();
                CacheEntry {
                    url: url.to_string(),
                    id: id.to_string(),
                    size: meta.as_ref().map(|m| m.len()),
                    modified: meta
                        .and_then(|m| m.modified().ok())
                        .map(DateTime::<Utc>::from),
                    path,
                }
            })
            .collect())
    }

    /// Blobs on disk that no database record points at
    pub fn orphans(&self) -> GistupResult<Vec<PathBuf>> {
        let files_dir = self.files_dir();
        if !files_dir.exists() {
            return Ok(vec![]);
        }

        let db = self.load_database()?;
        let live: HashSet<PathBuf> = db.iter().map(|(_, id)| self.blob_path(id)).collect();

        let entries = fs::read_dir(&files_dir)
            .map_err(|e| GistupError::io(format!("reading {}", files_dir.display()), e))?;

        let mut orphans = vec![];
        for entry in entries {
            let path = entry
                .map_err(|e| GistupError::io("reading cache entry", e))?
                .path();
            if path.is_file() && !live.contains(&path) {
                orphans.push(path);
            }
        }
        orphans.sort();

        Ok(orphans)
    }

    /// Delete orphaned blobs, returning how many were removed
    pub fn prune_orphans(&self) -> GistupResult<usize> {
        let mut removed = 0;
        for path in self.orphans()? {
            match fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(e) => warn!("Failed to remove orphaned blob {}: {}", path.display(), e),
            }
        }

        if removed > 0 {
            info!("Pruned {} orphaned blob(s)", removed);
        }
        Ok(removed)
    }
}
