//! Replaying adapter for the `InsightsClient` port.

use super::{next_output, replay_result};
use crate::cassette::config::SharedReplayer;
use crate::ports::{Insights, InsightsClient, InsightsFuture, Suggestion, TaskSummary};

/// Serves recorded insight payloads.
pub struct ReplayingInsightsClient {
    replayer: Option<SharedReplayer>,
}

impl ReplayingInsightsClient {
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
}

impl InsightsClient for ReplayingInsightsClient {
    fn insights(&self, _tasks: &[TaskSummary]) -> InsightsFuture<'_, Insights> {
        let output = next_output(self.replayer.as_ref(), "insights", "insights");
        Box::pin(async move { replay_result(output) })
    }

    fn schedule(&self, _tasks: &[TaskSummary]) -> InsightsFuture<'_, Vec<Suggestion>> {
        let output = next_output(self.replayer.as_ref(), "insights", "schedule");
        Box::pin(async move { replay_result(output) })
    }
}
