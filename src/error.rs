//! Error types for gistup
//!
//! All modules use `GistupResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for gistup operations
pub type GistupResult<T> = Result<T, GistupError>;

/// All errors that can occur in gistup
#[derive(Error, Debug)]
pub enum GistupError {
    // Download errors
    #[error("Could not download {url} (HTTP {status})")]
    Download { url: String, status: u16 },

    #[error("HTTP request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: ureq::Error,
    },

    // Cache errors
    #[error("Cache database {path} is corrupt: {source}")]
    DatabaseCorrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    // Loader errors
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("Failed to compile module {path}: {error:#}")]
    Compile {
        path: PathBuf,
        error: wasmtime::Error,
    },

    #[error("Module {name} failed during instantiation: {error:#}")]
    Execution {
        name: String,
        error: wasmtime::Error,
    },

    #[error("Cannot derive a module name from {0}")]
    ModuleName(String),

    #[error("Module name {0} is reserved for host functions")]
    ReservedName(String),

    #[error("Module not loaded: {0}")]
    ModuleNotFound(String),

    #[error("Call to {module}.{export} failed: {error:#}")]
    ExportCall {
        module: String,
        export: String,
        error: wasmtime::Error,
    },

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GistupError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// The wasm trap behind an execution or call failure, if any
    pub fn trap(&self) -> Option<wasmtime::Trap> {
        match self {
            Self::Execution { error, .. } | Self::ExportCall { error, .. } => {
                error.downcast_ref::<wasmtime::Trap>().copied()
            }
            _ => None,
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Download { status: 404, .. } => {
                Some("Check the URL, or the user/repo/ref/module coordinates")
            }
            Self::DatabaseCorrupt { .. } => Some("Delete the cache with Importer::clean_cache"),
            Self::ModuleName(_) => Some("Pass an explicit module name in LoadOptions"),
            _ => None,
        }
    }
}
