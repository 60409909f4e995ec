//! Task entity, wire representation, and input validation.

use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::dates::{self, DayStatus};

/// Opaque task identifier assigned by the task store.
///
/// Stores accept either JSON strings or numbers; both are normalised to text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Wraps an identifier string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl<'de> Deserialize<'de> for TaskId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(i64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(text) => Self(text),
            RawId::Number(number) => Self(number.to_string()),
        })
    }
}

/// Task priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Low priority.
    Low,
    /// Medium priority.
    #[default]
    Medium,
    /// High priority.
    High,
}

impl Priority {
    /// Lowercase wire name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(format!("unknown priority '{other}' (expected low, medium or high)")),
        }
    }
}

/// Task completion status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Not yet done.
    #[default]
    Pending,
    /// Done.
    Completed,
}

impl TaskStatus {
    /// Lowercase wire name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            other => Err(format!("unknown status '{other}' (expected pending or completed)")),
        }
    }
}

/// A task as held by the task store.
///
/// `due_date` is kept as the raw wire text. A malformed date on one task
/// must not fail a whole load, so parsing happens on demand via [`Task::due`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Store-assigned identifier.
    #[serde(alias = "_id")]
    pub id: TaskId,
    /// Task title.
    pub title: String,
    /// Optional free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Priority level.
    #[serde(default)]
    pub priority: Priority,
    /// Due timestamp as sent by the store.
    #[serde(default)]
    pub due_date: String,
    /// Completion status.
    #[serde(default)]
    pub status: TaskStatus,
}

impl Task {
    /// Parses the due date into the given zone, or `None` if it is malformed.
    #[must_use]
    pub fn due(&self, zone: &FixedOffset) -> Option<DateTime<FixedOffset>> {
        dates::parse_due(&self.due_date, zone)
    }

    /// Returns `true` when the task is completed.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }
}

/// A reason a task draft or patch was rejected before submission.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Title missing or blank.
    #[error("title is required")]
    MissingTitle,
    /// No due date given.
    #[error("due date is required")]
    MissingDueDate,
    /// Due date text could not be parsed.
    #[error("due date '{0}' is not a valid date/time")]
    InvalidDueDate(String),
    /// Due date lies on a day before today.
    #[error("due date {0} is in the past")]
    DueInPast(String),
    /// No priority chosen.
    #[error("priority is required")]
    MissingPriority,
    /// Patch carries no fields.
    #[error("nothing to update")]
    EmptyPatch,
}

/// Joins validation errors into one line for display.
#[must_use]
pub fn describe_errors(errors: &[ValidationError]) -> String {
    errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}

/// Unvalidated task input as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    /// Title text.
    pub title: String,
    /// Optional description text.
    pub description: Option<String>,
    /// Chosen priority.
    pub priority: Option<Priority>,
    /// Due date text (`YYYY-MM-DD`, `YYYY-MM-DD HH:MM`, or RFC 3339).
    pub due: Option<String>,
}

/// A validated task ready to be sent to the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    /// Non-blank title.
    pub title: String,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Priority level.
    pub priority: Priority,
    /// Due timestamp, never on a day before creation.
    pub due_date: DateTime<FixedOffset>,
}

impl TaskDraft {
    /// Validates the draft against the current instant.
    ///
    /// A date without a time of day is due at noon, matching the form default.
    ///
    /// # Errors
    ///
    /// Returns every problem found, in field order.
    pub fn validate(&self, now: &DateTime<FixedOffset>) -> Result<NewTask, Vec<ValidationError>> {
        let mut errors = Vec::new();

        let title = self.title.trim();
        if title.is_empty() {
            errors.push(ValidationError::MissingTitle);
        }

        let raw_due = self.due.as_deref().map(str::trim);
        let due = match raw_due.filter(|raw| !raw.is_empty()) {
            None => {
                errors.push(ValidationError::MissingDueDate);
                None
            }
            Some(raw) => match dates::parse_input(raw, &now.timezone()) {
                None => {
                    errors.push(ValidationError::InvalidDueDate(raw.to_string()));
                    None
                }
                Some(due) if dates::day_status(&due, now) == DayStatus::Overdue => {
                    errors.push(ValidationError::DueInPast(due.format("%Y-%m-%d").to_string()));
                    None
                }
                Some(due) => Some(due),
            },
        };

        if self.priority.is_none() {
            errors.push(ValidationError::MissingPriority);
        }

        match (due, self.priority) {
            (Some(due_date), Some(priority)) if errors.is_empty() => Ok(NewTask {
                title: title.to_string(),
                description: self
                    .description
                    .as_deref()
                    .map(str::trim)
                    .filter(|text| !text.is_empty())
                    .map(String::from),
                priority,
                due_date,
            }),
            _ => Err(errors),
        }
    }
}

/// Partial update for a full-field edit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    /// Replacement title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Replacement description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Replacement priority.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    /// Replacement due date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<FixedOffset>>,
    /// Replacement status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
}

impl TaskPatch {
    /// Returns `true` when no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
            && self.status.is_none()
    }

    /// Checks the patch before it is sent.
    ///
    /// # Errors
    ///
    /// Returns the problems found.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        if self.is_empty() {
            return Err(vec![ValidationError::EmptyPatch]);
        }
        if self.title.as_deref().is_some_and(|title| title.trim().is_empty()) {
            return Err(vec![ValidationError::MissingTitle]);
        }
        Ok(())
    }
}
