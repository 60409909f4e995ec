//! Persisted list of notifications already shown.

use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::task::TaskId;

/// Entries kept; older ones fall off the end.
pub const HISTORY_LIMIT: usize = 50;

/// What produced a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// A task is due soon.
    Reminder,
    /// A task changed on the server.
    Update,
    /// Sent from `settings test`.
    Test,
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Reminder => "reminder",
            Self::Update => "update",
            Self::Test => "test",
        })
    }
}

/// One shown notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationEntry {
    /// Locally generated identifier.
    pub id: String,
    /// Source of the notification.
    pub kind: NotificationKind,
    /// Heading.
    pub title: String,
    /// Body text.
    pub message: String,
    /// Task the notification is about.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<TaskId>,
    /// When it was shown.
    pub timestamp: DateTime<FixedOffset>,
    /// Whether the user has seen it.
    #[serde(default)]
    pub read: bool,
}

/// Newest-first notification list, capped at [`HISTORY_LIMIT`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationHistory {
    entries: Vec<NotificationEntry>,
}

impl NotificationHistory {
    /// Adds an entry at the front, dropping the oldest beyond the cap.
    pub fn push(&mut self, entry: NotificationEntry) {
        self.entries.insert(0, entry);
        self.entries.truncate(HISTORY_LIMIT);
    }

    /// Entries, newest first.
    #[must_use]
    pub fn entries(&self) -> &[NotificationEntry] {
        &self.entries
    }

    /// Number of entries not yet marked read.
    #[must_use]
    pub fn unread_count(&self) -> usize {
        self.entries.iter().filter(|entry| !entry.read).count()
    }

    /// Marks every entry read.
    pub fn mark_all_read(&mut self) {
        for entry in &mut self.entries {
            entry.read = true;
        }
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Age of a timestamp as shown in the history list.
#[must_use]
pub fn format_age(timestamp: &DateTime<FixedOffset>, now: &DateTime<FixedOffset>) -> String {
    let minutes = now.signed_duration_since(*timestamp).num_minutes();
    if minutes < 1 {
        "Just now".to_string()
    } else if minutes < 60 {
        format!("{minutes}m ago")
    } else if minutes < 24 * 60 {
        format!("{}h ago", minutes / 60)
    } else {
        timestamp.format("%Y-%m-%d").to_string()
    }
}
