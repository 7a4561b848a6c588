//! Load modules by path, URL or GitHub coordinates

use crate::cache::CacheStore;
use crate::config::{Config, ConfigManager};
use crate::error::{GistupError, GistupResult};
use crate::github::GithubSource;
use crate::loader::{module_name_from_url, LoadedModule, ModuleRegistry};
use std::path::Path;
use tracing::debug;

/// Options for [`Importer::load_from_url`]
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Download even if the URL is cached
    pub force_download: bool,
    /// Registration name (default: URL file name without extension)
    pub name: Option<String>,
}

impl LoadOptions {
    pub fn force_download(mut self, force: bool) -> Self {
        self.force_download = force;
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Cache store and module registry behind one API
pub struct Importer {
    config: Config,
    cache: CacheStore,
    registry: ModuleRegistry,
}

impl Importer {
    /// Create an importer using the HTTP transport and the configured cache
    pub fn new(config: Config) -> GistupResult<Self> {
        let cache = CacheStore::from_config(&config);
        Self::with_cache(config, cache)
    }

    /// Create an importer from `~/.config/gistup/config.toml`, or defaults
    pub fn from_config_file() -> GistupResult<Self> {
        Self::new(ConfigManager::new().load()?)
    }

    /// Create an importer from the config file at `path`, or defaults if absent
    pub fn from_config_path(path: &Path) -> GistupResult<Self> {
        Self::new(ConfigManager::with_path(path.to_path_buf()).load()?)
    }

    /// Create an importer over an existing cache store
    pub fn with_cache(config: Config, cache: CacheStore) -> GistupResult<Self> {
        debug!("Using cache directory {}", cache.root().display());
        Ok(Self {
            config,
            cache,
            registry: ModuleRegistry::new()?,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ModuleRegistry {
        &mut self.registry
    }

    /// Load a module from a local file
    pub fn load_from_file(&mut self, path: &Path, name: Option<&str>) -> GistupResult<LoadedModule> {
        self.registry.load_from_file(path, name)
    }

    /// Load a module from a URL, downloading it on a cache miss
    pub fn load_from_url(&mut self, url: &str, options: &LoadOptions) -> GistupResult<LoadedModule> {
        let name = match &options.name {
            Some(name) => name.clone(),
            None => {
                module_name_from_url(url).ok_or_else(|| GistupError::ModuleName(url.to_string()))?
            }
        };

        let path = self.cache.resolve(url, options.force_download)?;
        self.registry.load_from_file(&path, Some(&name))
    }

    /// Load `<module>` from a GitHub repository's raw content
    pub fn load_from_github(
        &mut self,
        source: &GithubSource,
        force_download: bool,
    ) -> GistupResult<LoadedModule> {
        let url = source.url(&self.config.github);
        let options = LoadOptions::default()
            .force_download(force_download)
            .name(source.module.clone());
        self.load_from_url(&url, &options)
    }

    /// Delete the whole cache directory
    pub fn clean_cache(&self) -> GistupResult<()> {
        self.cache.purge_all()
    }
}
