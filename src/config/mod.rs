//! Configuration management for the Barracks CLI
//!
//! Handles loading and validating CLI configuration: the server to talk
//! to, request timeout and preferred output format.

use crate::error::{CliError, Result};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub mod auth;
pub mod defaults;

pub use auth::Session;
pub use defaults::*;

/// Main CLI configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// API server URL
    #[serde(default = "defaults::default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::default_timeout")]
    pub timeout_secs: u64,

    /// Print JSON instead of plain text
    #[serde(default)]
    pub json_output: bool,
}

/// Values given on the command line or in the environment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    /// `--base-url` / `BARRACKS_BASE_URL`
    pub base_url: Option<String>,
    /// `--timeout` / `BARRACKS_TIMEOUT_SECS`
    pub timeout_secs: Option<u64>,
    /// `--json`
    pub json_output: bool,
}

impl Config {
    /// Load configuration from the default location
    ///
    /// Tries in order:
    /// 1. `XDG_CONFIG_HOME/barracks/config.toml`
    /// 2. `~/.config/barracks/config.toml`
    ///
    /// A missing file yields the defaults.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| CliError::ConfigRead {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        toml::from_str(&contents).map_err(|e| CliError::InvalidConfig(e.to_string()))
    }

    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        xdg_dir("XDG_CONFIG_HOME", ".config").map(|dir| dir.join("barracks").join("config.toml"))
    }

    /// Get the cache directory path (session storage lives here)
    pub fn cache_dir() -> Result<PathBuf> {
        xdg_dir("XDG_CACHE_HOME", ".cache").map(|dir| dir.join("barracks"))
    }

    /// Apply command-line and environment overrides, which take precedence
    pub fn apply(&mut self, overrides: &Overrides) {
        if let Some(base_url) = &overrides.base_url {
            self.base_url.clone_from(base_url);
        }
        if let Some(timeout) = overrides.timeout_secs {
            self.timeout_secs = timeout;
        }
        if overrides.json_output {
            self.json_output = true;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(CliError::InvalidConfig("base_url cannot be empty".to_string()));
        }

        Url::parse(&self.base_url)
            .map_err(|e| CliError::InvalidConfig(format!("base_url '{}': {e}", self.base_url)))?;

        if self.timeout_secs == 0 {
            return Err(CliError::InvalidConfig(
                "timeout_secs must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            json_output: false,
        }
    }
}

fn xdg_dir(variable: &str, home_fallback: &str) -> Result<PathBuf> {
    std::env::var(variable)
        .ok()
        .filter(|path| !path.is_empty())
        .map(PathBuf::from)
        .or_else(|| dirs::home_dir().map(|home| home.join(home_fallback)))
        .ok_or_else(|| {
            CliError::Internal(format!(
                "Could not determine directory: {variable} not set and no home directory found"
            ))
        })
}
