//! Configuration for fetching and rewriting

use crate::DEFAULT_USER_AGENT;
use std::path::{Path, PathBuf};

/// Immutable configuration shared by the fetch and rewrite steps
#[derive(Debug, Clone)]
pub struct Config {
    /// User-Agent header sent with API requests
    pub user_agent: String,
    /// Download embedded images and rewrite their tags to local paths
    pub download_image: bool,
    /// Directory where downloaded images are stored
    pub asset_path: PathBuf,
}

impl Config {
    /// Create a new configuration builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }
}

impl Default for Config {
    fn default() -> Self {
        ConfigBuilder::new().build()
    }
}

/// Builder for [`Config`]
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    user_agent: Option<String>,
    download_image: bool,
    asset_path: Option<PathBuf>,
}

impl ConfigBuilder {
    /// Create a new builder with all defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom User-Agent
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Enable or disable image localization
    pub fn download_image(mut self, enable: bool) -> Self {
        self.download_image = enable;
        self
    }

    /// Set the asset directory (tilde-expanded at build time)
    pub fn asset_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.asset_path = Some(path.into());
        self
    }

    /// Build the configuration
    pub fn build(self) -> Config {
        Config {
            user_agent: self
                .user_agent
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            download_image: self.download_image,
            asset_path: expand_tilde(self.asset_path.unwrap_or_else(|| PathBuf::from("."))),
        }
    }
}

/// Expand a leading `~` or `~/` to the home directory
///
/// `~user` forms and paths without a leading tilde are returned unchanged,
/// as is everything when `HOME` is unset.
fn expand_tilde(path: PathBuf) -> PathBuf {
    let Some(s) = path.to_str() else {
        return path;
    };
    if s == "~" {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home);
        }
    } else if let Some(rest) = s.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return Path::new(&home).join(rest);
        }
    }
    path
}
