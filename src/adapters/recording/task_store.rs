//! Recording adapter for the `TaskStore` port.

use serde::Serialize;

use super::record_store_result;
use crate::cassette::session::SharedRecorder;
use crate::ports::{StoreFuture, TaskStore};
use crate::task::{NewTask, Task, TaskId, TaskPatch, TaskStatus};

/// Records task store calls while delegating to an inner store.
pub struct RecordingTaskStore {
    inner: Box<dyn TaskStore>,
    recorder: SharedRecorder,
}

impl RecordingTaskStore {
    /// Wraps `inner`.
    pub fn new(inner: Box<dyn TaskStore>, recorder: SharedRecorder) -> Self {
        Self { inner, recorder }
    }
}

#[derive(Serialize)]
struct IdInput {
    id: TaskId,
}

#[derive(Serialize)]
struct UpdateInput {
    id: TaskId,
    patch: TaskPatch,
}

#[derive(Serialize)]
struct StatusInput {
    id: TaskId,
    status: TaskStatus,
}

impl TaskStore for RecordingTaskStore {
    fn list(&self) -> StoreFuture<'_, Vec<Task>> {
        let call = self.inner.list();
        Box::pin(async move {
            let result = call.await;
            record_store_result(&self.recorder, "list", &(), &result);
            result
        })
    }

    fn create(&self, task: &NewTask) -> StoreFuture<'_, Task> {
        let input = task.clone();
        let call = self.inner.create(task);
        Box::pin(async move {
            let result = call.await;
            record_store_result(&self.recorder, "create", &input, &result);
            result
        })
    }

    fn update(&self, id: &TaskId, patch: &TaskPatch) -> StoreFuture<'_, Task> {
        let input = UpdateInput {
            id: id.clone(),
            patch: patch.clone(),
        };
        let call = self.inner.update(id, patch);
        Box::pin(async move {
            let result = call.await;
            record_store_result(&self.recorder, "update", &input, &result);
            result
        })
    }

    fn update_status(&self, id: &TaskId, status: TaskStatus) -> StoreFuture<'_, Task> {
        let input = StatusInput {
            id: id.clone(),
            status,
        };
        let call = self.inner.update_status(id, status);
        Box::pin(async move {
            let result = call.await;
            record_store_result(&self.recorder, "update_status", &input, &result);
            result
        })
    }

    fn delete(&self, id: &TaskId) -> StoreFuture<'_, ()> {
        let input = IdInput { id: id.clone() };
        let call = self.inner.delete(id);
        Box::pin(async move {
            let result = call.await;
            record_store_result(&self.recorder, "delete", &input, &result);
            result
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::replaying::ReplayingTaskStore;
    use crate::cassette::format::{Cassette, Interaction};
    use crate::cassette::recorder::CassetteRecorder;
    use crate::cassette::replayer::CassetteReplayer;
    use crate::ports::StoreError;
    use chrono::Utc;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    fn source(output: serde_json::Value) -> ReplayingTaskStore {
        let cassette = Cassette {
            name: "source".into(),
            recorded_at: Utc::now(),
            commit: "abc".into(),
            interactions: vec![Interaction {
                seq: 0,
                port: "tasks".into(),
                method: "delete".into(),
                input: json!({"id": "3"}),
                output,
            }],
        };
        ReplayingTaskStore::new(Arc::new(Mutex::new(CassetteReplayer::new(&cassette))))
    }

    #[tokio::test]
    async fn records_typed_store_errors() {
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(
            std::env::temp_dir().join("taskboard_rec_tasks.cassette.yaml"),
            "test",
            "abc",
        )));
        let inner = source(json!({"Err": {"kind": "not_found", "id": "3"}}));
        let store = RecordingTaskStore::new(Box::new(inner), Arc::clone(&recorder));

        let err = store.delete(&TaskId::new("3")).await.unwrap_err();
        assert_eq!(err, StoreError::NotFound { id: "3".into() });

        drop(store);
        let recorder = Arc::try_unwrap(recorder).unwrap().into_inner().unwrap();
        let path = recorder.finish().unwrap();
        let cassette = Cassette::load(&path).unwrap();
        let recorded = &cassette.interactions[0];
        assert_eq!(recorded.input, json!({"id": "3"}));
        assert_eq!(recorded.output, json!({"Err": {"kind": "not_found", "id": "3"}}));
        let _ = std::fs::remove_file(&path);
    }
}
