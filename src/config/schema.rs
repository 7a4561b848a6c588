//! Configuration schema for gistup
//!
//! Configuration is stored at `~/.config/gistup/config.toml`

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Cache location
    pub cache: CacheConfig,

    /// GitHub raw-content settings
    pub github: GithubConfig,

    /// HTTP transport settings
    pub http: HttpConfig,
}

/// Cache configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Cache directory override (default: the per-user cache dir)
    pub dir: Option<PathBuf>,
}

/// GitHub settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GithubConfig {
    /// Host serving raw repository content
    pub raw_host: String,

    /// Branch or commit used when none is given
    pub default_ref: String,

    /// Extension of module files in the repository
    pub extension: String,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            raw_host: "raw.githubusercontent.com".to_string(),
            default_ref: "master".to_string(),
            extension: "wat".to_string(),
        }
    }
}

/// HTTP transport settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// User-Agent header sent with every download
    pub user_agent: String,

    /// Largest response body accepted, in bytes
    pub max_body_bytes: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: concat!("gistup/", env!("CARGO_PKG_VERSION")).to_string(),
            max_body_bytes: 10 * 1024 * 1024,
        }
    }
}
