//! Insights port for the AI productivity service.

use std::collections::BTreeMap;
use std::error::Error;
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::task::{Priority, Task, TaskStatus};

/// Boxed future type alias used by [`InsightsClient`] to keep the trait dyn-compatible.
pub type InsightsFuture<'a, T> =
    Pin<Box<dyn Future<Output = Result<T, Box<dyn Error + Send + Sync>>> + Send + 'a>>;

/// The subset of a task shared with the insights service.
///
/// Identifiers stay local; only descriptive fields leave the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSummary {
    /// Task title.
    pub title: String,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Due timestamp as held by the store.
    pub due_date: String,
    /// Priority level.
    pub priority: Priority,
    /// Completion status.
    pub status: TaskStatus,
}

impl From<&Task> for TaskSummary {
    fn from(task: &Task) -> Self {
        Self {
            title: task.title.trim().to_string(),
            description: task.description.as_deref().map(str::trim).map(String::from),
            due_date: task.due_date.clone(),
            priority: task.priority,
            status: task.status,
        }
    }
}

/// Free-form insight payload, rendered as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Insights {
    /// A single block of prose.
    Text(String),
    /// Named sections such as `suggestions` or `productivity`.
    Sections(BTreeMap<String, serde_json::Value>),
}

/// A scheduling suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Short heading.
    pub title: String,
    /// Details.
    #[serde(default)]
    pub description: String,
}

/// Sends task summaries to the insights service.
pub trait InsightsClient: Send + Sync {
    /// `POST /ai/insights`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the payload is unreadable.
    fn insights(&self, tasks: &[TaskSummary]) -> InsightsFuture<'_, Insights>;

    /// `POST /ai/schedule`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the payload is unreadable.
    fn schedule(&self, tasks: &[TaskSummary]) -> InsightsFuture<'_, Vec<Suggestion>>;
}
