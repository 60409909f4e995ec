//! Runtime configuration read from the environment.
//!
//! A `.env` file in the working directory is loaded first, so values there
//! act as defaults that real environment variables override.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Base URL used when `TASKBOARD_API_URL` is unset.
pub const DEFAULT_API_URL: &str = "http://localhost:8080/api/v1";
/// Data directory used when `TASKBOARD_DATA_DIR` is unset.
pub const DEFAULT_DATA_DIR: &str = ".taskboard";
/// Request timeout used when `TASKBOARD_TIMEOUT_SECS` is unset.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Invalid configuration value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A variable holds something other than what it should.
    #[error("{name} must be {expected}, got '{value}'")]
    Invalid {
        /// Variable name.
        name: &'static str,
        /// What was expected.
        expected: &'static str,
        /// What was found.
        value: String,
    },
}

/// Settings that select the service endpoints and local storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Base URL of the task API, e.g. `http://localhost:8080/api/v1`.
    pub api_url: String,
    /// Where settings, notification history, and cassettes live.
    pub data_dir: PathBuf,
    /// Per-request timeout for the REST calls.
    pub timeout: Duration,
    /// When set, every port interaction is recorded to cassettes under this directory.
    pub record_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            record_dir: None,
        }
    }
}

impl AppConfig {
    /// Loads `.env` if present, then reads the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set to an unusable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a config from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set to an unusable value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let set = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = Self::default();

        if let Some(url) = set("TASKBOARD_API_URL") {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::Invalid {
                    name: "TASKBOARD_API_URL",
                    expected: "an http(s) URL",
                    value: url,
                });
            }
            config.api_url = url.trim_end_matches('/').to_string();
        }
        if let Some(dir) = set("TASKBOARD_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(secs) = set("TASKBOARD_TIMEOUT_SECS") {
            let parsed = secs.parse::<u64>().ok().filter(|s| *s > 0);
            let Some(parsed) = parsed else {
                return Err(ConfigError::Invalid {
                    name: "TASKBOARD_TIMEOUT_SECS",
                    expected: "a positive number of seconds",
                    value: secs,
                });
            };
            config.timeout = Duration::from_secs(parsed);
        }
        config.record_dir = set("TASKBOARD_RECORD").map(PathBuf::from);
        Ok(config)
    }

    /// Path of the persisted settings document.
    #[must_use]
    pub fn settings_path(&self) -> PathBuf {
        self.data_dir.join("settings.json")
    }

    /// Path of the persisted notification history.
    #[must_use]
    pub fn history_path(&self) -> PathBuf {
        self.data_dir.join("notifications.json")
    }
}
