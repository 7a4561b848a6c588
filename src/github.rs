//! GitHub raw-content coordinates

use crate::config::schema::GithubConfig;

/// A module file in a GitHub repository
///
/// The coordinates are not validated; a bad value produces a URL that
/// fails to download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GithubSource {
    pub user: String,
    pub repo: String,
    /// Module name, the file name without extension
    pub module: String,
    /// Branch or commit; `None` uses the configured default
    pub reference: Option<String>,
}

impl GithubSource {
    pub fn new(user: impl Into<String>, repo: impl Into<String>, module: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            repo: repo.into(),
            module: module.into(),
            reference: None,
        }
    }

    /// Pin a branch or commit
    pub fn reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    /// Raw-content URL: `https://<raw_host>/<user>/<repo>/<ref>/<module>.<ext>`
    pub fn url(&self, config: &GithubConfig) -> String {
        let reference = self.reference.as_deref().unwrap_or(&config.default_ref);
        format!(
            "https://{}/{}/{}/{}/{}.{}",
            config.raw_host, self.user, self.repo, reference, self.module, config.extension
        )
    }
}
