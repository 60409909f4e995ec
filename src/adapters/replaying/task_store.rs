//! Replaying adapter for the `TaskStore` port.

use super::{next_output, replay_store_result};
use crate::cassette::config::SharedReplayer;
use crate::ports::{StoreFuture, TaskStore};
use crate::task::{NewTask, Task, TaskId, TaskPatch, TaskStatus};

/// Serves recorded task store responses.
pub struct ReplayingTaskStore {
    replayer: Option<SharedReplayer>,
}

impl ReplayingTaskStore {
    /// Backed by `replayer`.
    #[must_use]
    pub fn new(replayer: SharedReplayer) -> Self {
        Self {
            replayer: Some(replayer),
        }
    }

    /// No cassette; panics when called.
    #[must_use]
    pub fn unconfigured() -> Self {
        Self { replayer: None }
    }

    fn replay<T>(&self, method: &str) -> StoreFuture<'_, T>
    where
        T: serde::de::DeserializeOwned + Send + 'static,
    {
        let output = next_output(self.replayer.as_ref(), "tasks", method);
        Box::pin(async move { replay_store_result(output) })
    }
}

impl TaskStore for ReplayingTaskStore {
    fn list(&self) -> StoreFuture<'_, Vec<Task>> {
        self.replay("list")
    }

    fn create(&self, _task: &NewTask) -> StoreFuture<'_, Task> {
        self.replay("create")
    }

    fn update(&self, _id: &TaskId, _patch: &TaskPatch) -> StoreFuture<'_, Task> {
        self.replay("update")
    }

    fn update_status(&self, _id: &TaskId, _status: TaskStatus) -> StoreFuture<'_, Task> {
        self.replay("update_status")
    }

    fn delete(&self, _id: &TaskId) -> StoreFuture<'_, ()> {
        self.replay("delete")
    }
}
