//! Module loading
//!
//! Turns a `.wat` or `.wasm` file into a running instance registered by
//! name in a [`ModuleRegistry`]. Loaded modules run with full access to
//! the host functions in [`host`], and nothing more.

pub mod host;
pub mod registry;

pub use host::{HostState, HOST_MODULE};
pub use registry::{LoadedModule, ModuleRegistry};

use std::path::Path;

/// Default module name for a file: its stem
pub fn module_name_from_path(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .map(str::to_string)
}

/// Default module name for a URL: the last path segment without extension
///
/// `None` for unparseable URLs and for paths ending in `/`; query string
/// and fragment never count.
pub fn module_name_from_url(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let segment = parsed.path_segments()?.last()?;
    module_name_from_path(Path::new(segment))
}
