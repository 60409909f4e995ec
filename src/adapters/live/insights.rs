//! Live adapter for the `InsightsClient` port.

use std::error::Error;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::http::{error_message, ApiClient};
use crate::ports::{Insights, InsightsClient, InsightsFuture, Suggestion, TaskSummary};

/// Insights client backed by `{base}/ai/*`.
pub struct HttpInsightsClient {
    api: ApiClient,
}

impl HttpInsightsClient {
    /// Wraps a configured API client.
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    fn post<T: DeserializeOwned + Send + 'static>(
        &self,
        path: &str,
        tasks: &[TaskSummary],
    ) -> InsightsFuture<'_, T> {
        let request = self
            .api
            .http()
            .post(self.api.url(path))
            .json(&InsightsRequest { tasks });
        Box::pin(async move {
            let response = request.send().await.map_err(|e| -> Box<dyn Error + Send + Sync> {
                format!("insights request failed: {e}").into()
            })?;

            let status = response.status();
            let text = response.text().await.map_err(|e| -> Box<dyn Error + Send + Sync> {
                format!("failed to read insights response: {e}").into()
            })?;

            if !status.is_success() {
                let msg = error_message(&text);
                return Err(format!("insights service error ({}): {msg}", status.as_u16()).into());
            }

            serde_json::from_str(&text).map_err(|e| -> Box<dyn Error + Send + Sync> {
                format!("failed to parse insights response: {e}").into()
            })
        })
    }
}

#[derive(Serialize)]
struct InsightsRequest<'a> {
    tasks: &'a [TaskSummary],
}

impl InsightsClient for HttpInsightsClient {
    fn insights(&self, tasks: &[TaskSummary]) -> InsightsFuture<'_, Insights> {
        self.post("ai/insights", tasks)
    }

    fn schedule(&self, tasks: &[TaskSummary]) -> InsightsFuture<'_, Vec<Suggestion>> {
        self.post("ai/schedule", tasks)
    }
}
