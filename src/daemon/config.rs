//! Configuration management for daemon mode
//!
//! Handles JSON configuration parsing and validation. The configuration is
//! loaded once at startup and never mutated afterwards.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors raised while loading the configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid configuration: {details}")]
    Invalid { details: String },
}

/// Main daemon configuration structure
///
/// Missing fields fall back to zero values, so an empty object parses but
/// fails validation on `checkInterval`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Configuration {
    /// Whether detections are also reported by email
    pub send_email: bool,
    /// Polling interval in seconds (must be at least 1)
    pub check_interval: u64,
    /// SMTP settings used when `send_email` is set
    pub email_config: EmailSettings,
}

/// SMTP submission settings, kept as opaque strings until send time
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmailSettings {
    pub from: String,
    pub password: String,
    pub to: String,
    pub smtp_host: String,
    pub smtp_port: String,
}

impl std::fmt::Debug for EmailSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailSettings")
            .field("from", &self.from)
            .field("password", &"<redacted>")
            .field("to", &self.to)
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .finish()
    }
}

impl Configuration {
    /// Load and validate configuration from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::parse(&content, path)
    }

    /// Parse and validate configuration from JSON text
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        Self::parse(content, Path::new("<inline>"))
    }

    fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Configuration =
            serde_json::from_str(content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.check_interval == 0 {
            return Err(ConfigError::Invalid {
                details: "checkInterval must be at least 1 second".to_string(),
            });
        }

        Ok(())
    }

    /// Get polling interval as Duration
    pub fn polling_duration(&self) -> Duration {
        Duration::from_secs(self.check_interval)
    }
}
