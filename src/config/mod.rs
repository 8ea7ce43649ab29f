//! Client configuration

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/api/v1";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Environment variable overriding the configured base URL.
pub const BASE_URL_ENV: &str = "SUNFLOWER_API_URL";

/// API client configuration, loaded from `config.toml` in the platform
/// config directory with an environment override for the base URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Backend base path, e.g. `http://127.0.0.1:8000/api/v1`
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Transport-level request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Get config directory path
pub fn config_dir() -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("com", "sunflower", "sunflower-cli")
        .context("Could not determine config directory")?;
    Ok(proj_dirs.config_dir().to_path_buf())
}

impl ApiConfig {
    fn config_path() -> Result<PathBuf> {
        Ok(config_dir()?.join("config.toml"))
    }

    /// Load configuration from disk, falling back to defaults when the file
    /// is absent. `SUNFLOWER_API_URL` takes precedence over the file.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        let mut config = if path.exists() {
            let content = fs::read_to_string(&path).context("Failed to read config file")?;
            toml::from_str(&content).context("Failed to parse config file")?
        } else {
            Self::default()
        };

        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            if !url.is_empty() {
                config.base_url = url;
            }
        }

        Ok(config)
    }
}
