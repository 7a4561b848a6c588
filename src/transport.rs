//! Download transport
//!
//! One blocking HTTP GET per call. No retries and no timeout beyond the
//! agent defaults; the full body is buffered before it is handed back.

use crate::config::schema::HttpConfig;
use crate::error::{GistupError, GistupResult};
use tracing::debug;
use ureq::http::StatusCode;

/// Fetches the raw bytes behind a URL
///
/// The cache store only depends on this trait, so tests can substitute an
/// in-memory transport and count requests.
pub trait Transport {
    /// Fetch `url`, failing with [`GistupError::Download`] on any status but 200
    fn fetch(&self, url: &str) -> GistupResult<Vec<u8>>;
}

/// `ureq`-backed transport
pub struct HttpTransport {
    agent: ureq::Agent,
    max_body_bytes: u64,
}

impl HttpTransport {
    /// Build a transport from the HTTP settings
    pub fn new(config: &HttpConfig) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .user_agent(config.user_agent.as_str())
            .build()
            .into();

        Self {
            agent,
            max_body_bytes: config.max_body_bytes,
        }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new(&HttpConfig::default())
    }
}

impl Transport for HttpTransport {
    fn fetch(&self, url: &str) -> GistupResult<Vec<u8>> {
        let http_err = |source| GistupError::Http {
            url: url.to_string(),
            source,
        };

        let mut response = self.agent.get(url).call().map_err(http_err)?;
        let status = response.status();
        debug!("GET {} -> {}", url, status);

        if status != StatusCode::OK {
            return Err(GistupError::Download {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .body_mut()
            .with_config()
            .limit(self.max_body_bytes)
            .read_to_vec()
            .map_err(http_err)
    }
}
