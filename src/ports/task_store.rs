//! Task store port: the remote service of record for task CRUD.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::task::{NewTask, Task, TaskId, TaskPatch, TaskStatus};

/// Boxed future type alias used by [`TaskStore`] to keep the trait dyn-compatible.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + Send + 'a>>;

/// Failure reported by a task store call.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StoreError {
    /// The store could not be reached.
    #[error("task store unreachable: {message}")]
    Network {
        /// Transport error text.
        message: String,
    },
    /// The task does not exist on the store.
    #[error("task {id} not found")]
    NotFound {
        /// Identifier that was asked for.
        id: String,
    },
    /// The store refused the payload.
    #[error("task store rejected the request: {message}")]
    Rejected {
        /// Reason given by the store.
        message: String,
    },
    /// Any other unsuccessful HTTP status.
    #[error("task store returned HTTP {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body or reason.
        message: String,
    },
    /// The response body could not be decoded.
    #[error("could not decode task store response: {message}")]
    Decode {
        /// Decoder error text.
        message: String,
    },
}

impl StoreError {
    /// Shorthand for a transport failure.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Returns `true` for [`StoreError::NotFound`].
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// The remote task store.
///
/// Every call is asynchronous and may fail; callers own all local state.
pub trait TaskStore: Send + Sync {
    /// `GET /tasks`: the full collection.
    fn list(&self) -> StoreFuture<'_, Vec<Task>>;

    /// `POST /tasks`: creates a task and returns it with its assigned id.
    fn create(&self, task: &NewTask) -> StoreFuture<'_, Task>;

    /// `PUT /tasks/{id}`: full-field edit with partial fields.
    fn update(&self, id: &TaskId, patch: &TaskPatch) -> StoreFuture<'_, Task>;

    /// `PATCH /tasks/{id}/status`: status-only transition.
    fn update_status(&self, id: &TaskId, status: TaskStatus) -> StoreFuture<'_, Task>;

    /// `DELETE /tasks/{id}`.
    fn delete(&self, id: &TaskId) -> StoreFuture<'_, ()>;
}
