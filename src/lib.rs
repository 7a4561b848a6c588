//! gistup - load remote WebAssembly modules by URL
//!
//! Downloads a module once, caches it under a generated identifier and
//! instantiates it into a caller-owned registry on every load.
//!
//! ```no_run
//! use gistup::{GithubSource, Importer, LoadOptions};
//!
//! # fn main() -> gistup::GistupResult<()> {
//! let mut importer = Importer::from_config_file()?;
//! importer.load_from_url("https://example.com/utils.wat", &LoadOptions::default())?;
//!
//! let source = GithubSource::new("octocat", "hello-world", "greet").reference("main");
//! importer.load_from_github(&source, false)?;
//! let answer: i32 = importer.registry_mut().call("greet", "answer", ())?;
//! # let _ = answer;
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod github;
pub mod importer;
pub mod loader;
pub mod logging;
pub mod transport;

pub use cache::{CacheDatabase, CacheEntry, CacheStore};
pub use config::{Config, ConfigManager};
pub use error::{GistupError, GistupResult};
pub use github::GithubSource;
pub use importer::{Importer, LoadOptions};
pub use loader::{LoadedModule, ModuleRegistry};
pub use transport::{HttpTransport, Transport};
