//! URL to identifier database persisted as a single JSON object

use crate::error::{GistupError, GistupResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::debug;
use uuid::Uuid;

/// Generate a fresh opaque identifier for a cached blob
pub fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Full `remote_url -> opaque_id` mapping
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheDatabase {
    entries: BTreeMap<String, String>,
}

impl CacheDatabase {
    /// Read the database, returning an empty mapping if the file is missing
    pub fn load(path: &Path) -> GistupResult<Self> {
        if !path.exists() {
            debug!("No cache database at {}, starting empty", path.display());
            return Ok(Self::default());
        }

        let content = fs::read(path)
            .map_err(|e| GistupError::io(format!("reading cache database {}", path.display()), e))?;

        serde_json::from_slice(&content).map_err(|source| GistupError::DatabaseCorrupt {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Serialize the full mapping and replace the database file
    ///
    /// The content goes to a sibling temp file first and is renamed over
    /// `path`, so readers see either the old or the new database.
    pub fn save(&self, path: &Path) -> GistupResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                GistupError::io(format!("creating cache directory {}", parent.display()), e)
            })?;
        }

        let content = serde_json::to_string(self)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, content)
            .map_err(|e| GistupError::io(format!("writing {}", tmp.display()), e))?;
        fs::rename(&tmp, path).map_err(|e| {
            GistupError::io(format!("replacing cache database {}", path.display()), e)
        })?;

        debug!("Saved cache database with {} entries", self.entries.len());
        Ok(())
    }

    /// Identifier recorded for `url`
    pub fn get(&self, url: &str) -> Option<&str> {
        self.entries.get(url).map(String::as_str)
    }

    /// Record `url -> id`, returning the identifier it replaces
    pub fn insert(&mut self, url: impl Into<String>, id: impl Into<String>) -> Option<String> {
        self.entries.insert(url.into(), id.into())
    }

    pub fn contains(&self, url: &str) -> bool {
        self.entries.contains_key(url)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(url, id)` pairs in URL order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(u, i)| (u.as_str(), i.as_str()))
    }
}
