//! Live adapter for the `TaskStore` port over the REST API.

use reqwest::{RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use super::http::{error_message, ApiClient};
use crate::ports::{StoreError, StoreFuture, TaskStore};
use crate::task::{NewTask, Task, TaskId, TaskPatch, TaskStatus};

/// Task store backed by `{base}/tasks`.
pub struct HttpTaskStore {
    api: ApiClient,
}

impl HttpTaskStore {
    /// Wraps a configured API client.
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// `{base}/tasks/{id}` followed by `rest`, with the id percent-encoded
    /// as a single path segment.
    fn task_url(&self, id: &TaskId, rest: &[&str]) -> Result<Url, StoreError> {
        let mut url = Url::parse(&self.api.url("tasks"))
            .map_err(|e| StoreError::network(format!("invalid API URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|()| StoreError::network("API URL cannot take a path"))?
            .push(id.as_str())
            .extend(rest);
        Ok(url)
    }
}

#[derive(Serialize)]
struct StatusBody {
    status: TaskStatus,
}

/// Sends a request and returns the body of a successful response.
async fn send(request: RequestBuilder, id: Option<&TaskId>) -> Result<String, StoreError> {
    let response = request.send().await.map_err(|e| StoreError::network(e.to_string()))?;
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| StoreError::network(format!("failed to read response: {e}")))?;
    debug!(status = status.as_u16(), bytes = body.len(), "task store responded");
    if status.is_success() {
        Ok(body)
    } else {
        Err(status_error(status, &body, id))
    }
}

/// Maps an unsuccessful status to a store error.
///
/// 404 only means "not found" for calls addressing a single task.
fn status_error(status: StatusCode, body: &str, id: Option<&TaskId>) -> StoreError {
    let mut message = error_message(body);
    if message.is_empty() {
        message = status.canonical_reason().unwrap_or("no reason given").to_string();
    }
    match (status, id) {
        (StatusCode::NOT_FOUND, Some(id)) => StoreError::NotFound { id: id.to_string() },
        (StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY, _) => {
            StoreError::Rejected { message }
        }
        _ => StoreError::Status {
            status: status.as_u16(),
            message,
        },
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, StoreError> {
    serde_json::from_str(body).map_err(|e| StoreError::Decode {
        message: e.to_string(),
    })
}

impl TaskStore for HttpTaskStore {
    fn list(&self) -> StoreFuture<'_, Vec<Task>> {
        let request = self.api.http().get(self.api.url("tasks"));
        Box::pin(async move { decode(&send(request, None).await?) })
    }

    fn create(&self, task: &NewTask) -> StoreFuture<'_, Task> {
        let request = self.api.http().post(self.api.url("tasks")).json(task);
        Box::pin(async move { decode(&send(request, None).await?) })
    }

    fn update(&self, id: &TaskId, patch: &TaskPatch) -> StoreFuture<'_, Task> {
        let request = self.task_url(id, &[]).map(|url| self.api.http().put(url).json(patch));
        let id = id.clone();
        Box::pin(async move { decode(&send(request?, Some(&id)).await?) })
    }

    fn update_status(&self, id: &TaskId, status: TaskStatus) -> StoreFuture<'_, Task> {
        let request = self
            .task_url(id, &["status"])
            .map(|url| self.api.http().patch(url).json(&StatusBody { status }));
        let id = id.clone();
        Box::pin(async move { decode(&send(request?, Some(&id)).await?) })
    }

    fn delete(&self, id: &TaskId) -> StoreFuture<'_, ()> {
        let request = self.task_url(id, &[]).map(|url| self.api.http().delete(url));
        let id = id.clone();
        Box::pin(async move {
            send(request?, Some(&id)).await?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn maps_statuses_to_store_errors() {
        let id = TaskId::new("42");
        assert_eq!(
            status_error(StatusCode::NOT_FOUND, "", Some(&id)),
            StoreError::NotFound { id: "42".into() }
        );
        assert_eq!(
            status_error(StatusCode::NOT_FOUND, "", None),
            StoreError::Status {
                status: 404,
                message: "Not Found".into(),
            }
        );
        assert_eq!(
            status_error(StatusCode::UNPROCESSABLE_ENTITY, r#"{"message": "bad date"}"#, None),
            StoreError::Rejected {
                message: "bad date".into(),
            }
        );
        assert_eq!(
            status_error(StatusCode::INTERNAL_SERVER_ERROR, r#"{"error": "db down"}"#, Some(&id)),
            StoreError::Status {
                status: 500,
                message: "db down".into(),
            }
        );
    }

    #[test]
    fn task_ids_are_encoded_as_one_path_segment() {
        let api = ApiClient::new("http://localhost:8080/api/v1/", Duration::from_secs(2)).unwrap();
        let store = HttpTaskStore::new(api);

        let plain = store.task_url(&TaskId::new("42"), &[]).unwrap();
        assert_eq!(plain.as_str(), "http://localhost:8080/api/v1/tasks/42");

        let odd = store.task_url(&TaskId::new("a/b?c#d"), &["status"]).unwrap();
        assert_eq!(odd.as_str(), "http://localhost:8080/api/v1/tasks/a%2Fb%3Fc%23d/status");
    }

    #[test]
    fn undecodable_body_is_a_decode_error() {
        let err = decode::<Vec<Task>>("<html>").unwrap_err();
        assert!(matches!(err, StoreError::Decode { .. }));
    }

    #[tokio::test]
    async fn unreachable_server_is_a_network_error() {
        let api = ApiClient::new("http://127.0.0.1:9/api/v1", Duration::from_secs(2)).unwrap();
        let store = HttpTaskStore::new(api);
        let err = store.list().await.unwrap_err();
        assert!(matches!(err, StoreError::Network { .. }), "got {err:?}");
    }
}
