//! Configuration file.
//!
//! The service reads one JSON file at startup. Every field has a default, so a
//! partial file is fine. When the file does not exist, `Config::open_file`
//! writes the defaults to that path and uses them:
//!
//! ```json
//! {
//!   "log_level": "WARN",
//!   "log_destination": "STDERR",
//!   "log_file": null,
//!   "check_password_strength": true,
//!   "password_strength": {
//!     "min_lower_case": 1, "min_upper_case": 1, "min_special": 1,
//!     "min_digits": 1, "min_length": 8, "max_length": 50
//!   },
//!   "max_task_seconds": 5,
//!   "server_address": "0.0.0.0:8080"
//! }
//! ```

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::manager::ManagerConfig;
use crate::strength::StrengthRules;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("log_destination is FILE but log_file is not set")]
    MissingLogFile,

    #[error("invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogDestination {
    Stdout,
    Stderr,
    /// Append to `Config::log_file`.
    File,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: LogLevel,
    pub log_destination: LogDestination,
    pub log_file: Option<PathBuf>,

    /// Reject weak passwords before admitting a task.
    pub check_password_strength: bool,
    pub password_strength: StrengthRules,

    /// Artificial delay of every hash task, in seconds.
    pub max_task_seconds: u64,

    /// Address the HTTP server binds to, e.g. `0.0.0.0:8080`.
    pub server_address: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Warn,
            log_destination: LogDestination::Stderr,
            log_file: None,
            check_password_strength: true,
            password_strength: StrengthRules::default(),
            max_task_seconds: 5,
            server_address: "0.0.0.0:8080".to_string(),
        }
    }
}

impl Config {
    /// Load `path`, or create it with the defaults if it does not exist.
    pub fn open_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let config: Config =
                    serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                        path: path.to_path_buf(),
                        source,
                    })?;
                config.validate()?;
                Ok(config)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                let config = Config::default();
                config.save_file(path)?;
                tracing::info!(path = %path.display(), "wrote default configuration");
                Ok(config)
            }
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn save_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, json).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.log_destination == LogDestination::File && self.log_file.is_none() {
            return Err(ConfigError::MissingLogFile);
        }
        let rules = &self.password_strength;
        if rules.min_length > rules.max_length {
            return Err(ConfigError::InvalidValue(
                "password_strength".to_string(),
                format!(
                    "min_length {} exceeds max_length {}",
                    rules.min_length, rules.max_length
                ),
            ));
        }
        Ok(())
    }

    pub fn task_delay(&self) -> Duration {
        Duration::from_secs(self.max_task_seconds)
    }

    pub fn manager_config(&self) -> ManagerConfig {
        ManagerConfig {
            delay: self.task_delay(),
            enforce_strength: self.check_password_strength,
            rules: self.password_strength.clone(),
        }
    }
}
