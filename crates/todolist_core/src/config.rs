//! Host-supplied runtime configuration.
//!
//! # Responsibility
//! - Describe where the task database lives and how logging is set up.
//! - Parse the JSON document handed over by the mobile shell.
//!
//! # Invariants
//! - Configuration is passed explicitly; nothing is read from the process
//!   environment.
//! - A file database path is never empty.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Where the task table is stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "path")]
pub enum DatabaseLocation {
    /// Durable SQLite file.
    File(PathBuf),
    /// Throwaway SQLite database living in memory.
    #[default]
    InMemory,
}

/// Core configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub database: DatabaseLocation,
    /// `trace|debug|info|warn|error`; build-mode default when `None`.
    pub log_level: Option<String>,
    /// Absolute directory for rolling log files; logging stays off when
    /// `None`.
    pub log_dir: Option<String>,
}

#[derive(Debug)]
pub enum ConfigError {
    Parse(serde_json::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid config document: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

impl AppConfig {
    /// Config for a durable database file.
    pub fn with_database_file(path: impl Into<PathBuf>) -> Self {
        Self {
            database: DatabaseLocation::File(path.into()),
            ..Self::default()
        }
    }

    /// Parses and validates a JSON config document.
    ///
    /// An empty (or whitespace-only) document yields the default config.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let DatabaseLocation::File(path) = &self.database {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::Invalid(
                    "database file path cannot be empty".to_string(),
                ));
            }
        }
        if let Some(dir) = &self.log_dir {
            if dir.trim().is_empty() {
                return Err(ConfigError::Invalid("log_dir cannot be empty".to_string()));
            }
        }
        Ok(())
    }
}
