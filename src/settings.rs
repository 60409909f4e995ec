//! Locally persisted user preferences and the notification history file.
//!
//! Both documents are small JSON files in the data directory, read and
//! written through the [`FileSystem`] port. A missing or corrupt file
//! falls back to defaults; it never stops the board from working.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::AppConfig;
use crate::notify::NotificationHistory;
use crate::ports::FileSystem;
use crate::task::Priority;

/// Settings or history could not be changed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    /// `settings set` named a key that does not exist.
    #[error("unknown setting '{0}' (see `taskboard settings show`)")]
    UnknownKey(String),
    /// The value does not fit the key.
    #[error("invalid value '{value}' for {key}: expected {expected}")]
    InvalidValue {
        /// Setting key.
        key: String,
        /// Offending value.
        value: String,
        /// Accepted values.
        expected: &'static str,
    },
    /// The document could not be written.
    #[error("failed to save {path}: {message}")]
    Write {
        /// Target file.
        path: String,
        /// Underlying error text.
        message: String,
    },
}

/// Which push notifications are shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationSettings {
    /// Master switch.
    pub enabled: bool,
    /// Remind about high-priority tasks.
    pub high_priority: bool,
    /// Remind about medium-priority tasks.
    pub medium_priority: bool,
    /// Remind about low-priority tasks.
    pub low_priority: bool,
    /// Lead time before the deadline, in minutes.
    #[serde(rename = "reminderTime")]
    pub reminder_minutes: u32,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            high_priority: true,
            medium_priority: true,
            low_priority: false,
            reminder_minutes: 60,
        }
    }
}

impl NotificationSettings {
    /// Whether reminders for tasks of `priority` should be shown.
    #[must_use]
    pub fn allows(&self, priority: Priority) -> bool {
        self.enabled
            && match priority {
                Priority::High => self.high_priority,
                Priority::Medium => self.medium_priority,
                Priority::Low => self.low_priority,
            }
    }
}

/// How often the insights service analyses the task list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisFrequency {
    /// On every change.
    Realtime,
    /// Once a day.
    #[default]
    Daily,
    /// Once a week.
    Weekly,
}

impl AnalysisFrequency {
    /// Wire and display name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Realtime => "realtime",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
        }
    }
}

impl fmt::Display for AnalysisFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalysisFrequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "realtime" | "real-time" => Ok(Self::Realtime),
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            other => Err(format!("unknown analysis frequency '{other}'")),
        }
    }
}

/// AI feature toggles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AiSettings {
    /// Show the insights panel.
    #[serde(rename = "enableAIInsights")]
    pub insights_enabled: bool,
    /// Fetch scheduling suggestions alongside insights.
    #[serde(rename = "enableAutoScheduling")]
    pub auto_scheduling: bool,
    /// Analysis cadence.
    pub analysis_frequency: AnalysisFrequency,
    /// Track productivity statistics.
    pub productivity_tracking: bool,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            insights_enabled: true,
            auto_scheduling: true,
            analysis_frequency: AnalysisFrequency::Daily,
            productivity_tracking: true,
        }
    }
}

/// Everything stored in `settings.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Notification preferences.
    pub notifications: NotificationSettings,
    /// AI preferences.
    pub ai: AiSettings,
}

/// Keys accepted by [`Settings::set`], in display order.
pub const SETTING_KEYS: [&str; 9] = [
    "notifications.enabled",
    "notifications.high_priority",
    "notifications.medium_priority",
    "notifications.low_priority",
    "notifications.reminder_minutes",
    "ai.insights_enabled",
    "ai.auto_scheduling",
    "ai.analysis_frequency",
    "ai.productivity_tracking",
];

fn parse_flag(key: &str, value: &str) -> Result<bool, SettingsError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        _ => Err(SettingsError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            expected: "true or false",
        }),
    }
}

impl Settings {
    /// Current value of every key, in [`SETTING_KEYS`] order.
    #[must_use]
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        let n = &self.notifications;
        let ai = &self.ai;
        let values = [
            n.enabled.to_string(),
            n.high_priority.to_string(),
            n.medium_priority.to_string(),
            n.low_priority.to_string(),
            n.reminder_minutes.to_string(),
            ai.insights_enabled.to_string(),
            ai.auto_scheduling.to_string(),
            ai.analysis_frequency.to_string(),
            ai.productivity_tracking.to_string(),
        ];
        SETTING_KEYS.into_iter().zip(values).collect()
    }

    /// Changes one setting from its text form.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown key or a value of the wrong shape.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), SettingsError> {
        let n = &mut self.notifications;
        let ai = &mut self.ai;
        match key {
            "notifications.enabled" => n.enabled = parse_flag(key, value)?,
            "notifications.high_priority" => n.high_priority = parse_flag(key, value)?,
            "notifications.medium_priority" => n.medium_priority = parse_flag(key, value)?,
            "notifications.low_priority" => n.low_priority = parse_flag(key, value)?,
            "notifications.reminder_minutes" => {
                n.reminder_minutes = value.trim().parse().map_err(|_| {
                    SettingsError::InvalidValue {
                        key: key.to_string(),
                        value: value.to_string(),
                        expected: "a whole number of minutes",
                    }
                })?;
            }
            "ai.insights_enabled" => ai.insights_enabled = parse_flag(key, value)?,
            "ai.auto_scheduling" => ai.auto_scheduling = parse_flag(key, value)?,
            "ai.analysis_frequency" => {
                ai.analysis_frequency = value.parse().map_err(|_| SettingsError::InvalidValue {
                    key: key.to_string(),
                    value: value.to_string(),
                    expected: "realtime, daily or weekly",
                })?;
            }
            "ai.productivity_tracking" => ai.productivity_tracking = parse_flag(key, value)?,
            other => return Err(SettingsError::UnknownKey(other.to_string())),
        }
        Ok(())
    }
}

/// Reads and writes the settings and history documents.
pub struct SettingsStore<'a> {
    fs: &'a dyn FileSystem,
    settings_path: PathBuf,
    history_path: PathBuf,
}

impl<'a> SettingsStore<'a> {
    /// A store over the configured data directory.
    pub fn new(fs: &'a dyn FileSystem, config: &AppConfig) -> Self {
        Self {
            fs,
            settings_path: config.settings_path(),
            history_path: config.history_path(),
        }
    }

    /// Saved settings, or defaults if none are saved or the file is unreadable.
    pub fn load(&self) -> Settings {
        self.read_json(&self.settings_path).unwrap_or_default()
    }

    /// Persists `settings`.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Write`] if the file cannot be written.
    pub fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        self.write_json(&self.settings_path, settings)
    }

    /// Saved notification history, or an empty one.
    pub fn load_history(&self) -> NotificationHistory {
        self.read_json(&self.history_path).unwrap_or_default()
    }

    /// Persists the notification history.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Write`] if the file cannot be written.
    pub fn save_history(&self, history: &NotificationHistory) -> Result<(), SettingsError> {
        self.write_json(&self.history_path, history)
    }

    fn read_json<T: serde::de::DeserializeOwned>(&self, path: &Path) -> Option<T> {
        if !self.fs.exists(path) {
            debug!(path = %path.display(), "no saved document; using defaults");
            return None;
        }
        let text = match self.fs.read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "could not read saved document; using defaults"
                );
                return None;
            }
        };
        match serde_json::from_str(&text) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "saved document is corrupt; using defaults"
                );
                None
            }
        }
    }

    fn write_json<T: Serialize>(&self, path: &Path, value: &T) -> Result<(), SettingsError> {
        let write_error = |message: String| SettingsError::Write {
            path: path.display().to_string(),
            message,
        };
        let text = serde_json::to_string_pretty(value).map_err(|e| write_error(e.to_string()))?;
        self.fs.write(path, &text).map_err(|e| write_error(e.to_string()))
    }
}
