//! Recording adapter for the `InsightsClient` port.

use super::record_result;
use crate::cassette::session::SharedRecorder;
use crate::ports::{Insights, InsightsClient, InsightsFuture, Suggestion, TaskSummary};

/// Records insights calls while delegating to an inner client.
pub struct RecordingInsightsClient {
    inner: Box<dyn InsightsClient>,
    recorder: SharedRecorder,
}

impl RecordingInsightsClient {
    /// Wraps `inner`.
    pub fn new(inner: Box<dyn InsightsClient>, recorder: SharedRecorder) -> Self {
        Self { inner, recorder }
    }
}

impl InsightsClient for RecordingInsightsClient {
    fn insights(&self, tasks: &[TaskSummary]) -> InsightsFuture<'_, Insights> {
        let input = tasks.to_vec();
        let call = self.inner.insights(tasks);
        Box::pin(async move {
            let result = call.await;
            record_result(&self.recorder, "insights", "insights", &input, &result);
            result
        })
    }

    fn schedule(&self, tasks: &[TaskSummary]) -> InsightsFuture<'_, Vec<Suggestion>> {
        let input = tasks.to_vec();
        let call = self.inner.schedule(tasks);
        Box::pin(async move {
            let result = call.await;
            record_result(&self.recorder, "insights", "schedule", &input, &result);
            result
        })
    }
}
