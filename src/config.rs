//! Application configuration file.
//!
//! Loaded from `<config_dir>/iftar-countdown/config.json` unless a path is
//! given. Every field has a default, so a missing default file or a partial
//! file is fine. Command-line flags are applied on top by the CLI.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::countdown::CountdownConfig;
use crate::providers::ProviderConfig;

const APP_DIR: &str = "iftar-countdown";
const CONFIG_FILE: &str = "config.json";

/// Errors that can occur while loading the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

fn default_true() -> bool {
    true
}

/// Notification settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Send reminder and arrival notifications at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Use desktop notifications; falls back to an in-terminal banner
    #[serde(default = "default_true")]
    pub desktop: bool,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            desktop: true,
        }
    }
}

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub countdown: CountdownConfig,

    #[serde(default)]
    pub providers: ProviderConfig,

    #[serde(default)]
    pub notifications: NotificationConfig,
}

impl AppConfig {
    /// Returns the default config file path, if the platform has a config directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Loads the configuration.
    ///
    /// An explicit `path` must exist. Without one, the default path is used
    /// and a missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::read(path)?,
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::read(&path)?,
                _ => {
                    tracing::debug!("No config file found, using defaults");
                    Self::default()
                }
            },
        };

        config.validate()?;
        Ok(config)
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        tracing::debug!("Loading config from {}", path.display());

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Validates every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.countdown
            .validate()
            .map_err(|e| ConfigError::Invalid(format!("countdown: {}", e)))?;
        self.providers
            .validate()
            .map_err(|e| ConfigError::Invalid(format!("providers: {}", e)))?;
        Ok(())
    }
}
