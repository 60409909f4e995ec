//! Insights panel: asks the AI service about the tasks needing attention.
//!
//! Only due-today and overdue tasks are sent. The service is optional; any
//! failure leaves the panel empty and never touches the board.

use chrono::{DateTime, FixedOffset};
use tracing::{debug, warn};

use crate::classify;
use crate::ports::{Insights, InsightsClient, Suggestion, TaskSummary};
use crate::settings::AiSettings;
use crate::task::Task;

/// Sections shown on the panel with their fallback text.
const SECTIONS: [(&str, &str, &str); 3] = [
    ("suggestions", "Task Suggestions", "No suggestions available"),
    ("optimalTimes", "Optimal Times", "No timing data available"),
    ("productivity", "Productivity Insights", "No productivity data available"),
];

/// Everything the panel can show.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InsightsReport {
    /// Number of tasks sent for analysis.
    pub analysed: usize,
    /// Insight payload, if the service answered.
    pub insights: Option<Insights>,
    /// Scheduling suggestions, empty when disabled or unavailable.
    pub suggestions: Vec<Suggestion>,
}

impl InsightsReport {
    /// Heading and text for each panel section, with fallbacks for gaps.
    ///
    /// A plain-text payload fills the first section.
    #[must_use]
    pub fn sections(&self) -> Vec<(&'static str, String)> {
        SECTIONS
            .iter()
            .enumerate()
            .map(|(i, (key, heading, fallback))| {
                let text = match &self.insights {
                    Some(Insights::Text(text)) if i == 0 && !text.trim().is_empty() => {
                        Some(text.clone())
                    }
                    Some(Insights::Sections(map)) => map.get(*key).and_then(render_value),
                    _ => None,
                };
                (*heading, text.unwrap_or_else(|| (*fallback).to_string()))
            })
            .collect()
    }
}

fn render_value(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(text) if text.trim().is_empty() => None,
        serde_json::Value::String(text) => Some(text.clone()),
        serde_json::Value::Array(items) => {
            let lines: Vec<String> = items.iter().filter_map(render_value).collect();
            (!lines.is_empty()).then(|| lines.join("; "))
        }
        other => Some(other.to_string()),
    }
}

/// Summaries of the tasks the panel analyses: due today, then overdue.
#[must_use]
pub fn attention_summaries(tasks: &[Task], now: &DateTime<FixedOffset>) -> Vec<TaskSummary> {
    let buckets = classify::classify(tasks, now);
    buckets
        .due_today
        .iter()
        .chain(buckets.overdue.iter())
        .map(|task| TaskSummary::from(*task))
        .collect()
}

/// Fetches insights and, if enabled, scheduling suggestions.
///
/// Nothing is requested when insights are disabled or no task needs
/// attention. The two requests run concurrently.
pub async fn gather(
    client: &dyn InsightsClient,
    tasks: &[Task],
    now: &DateTime<FixedOffset>,
    settings: &AiSettings,
) -> InsightsReport {
    if !settings.insights_enabled {
        debug!("AI insights disabled");
        return InsightsReport::default();
    }
    let summaries = attention_summaries(tasks, now);
    if summaries.is_empty() {
        debug!("no due-today or overdue tasks to analyse");
        return InsightsReport::default();
    }

    let schedule = async {
        if settings.auto_scheduling {
            client.schedule(&summaries).await.map(Some)
        } else {
            Ok(None)
        }
    };
    let (insights, suggestions) = tokio::join!(client.insights(&summaries), schedule);

    let insights = insights
        .map_err(|e| warn!(error = %e, "insights unavailable"))
        .ok();
    let suggestions = suggestions
        .map_err(|e| warn!(error = %e, "scheduling suggestions unavailable"))
        .ok()
        .flatten()
        .unwrap_or_default();
    InsightsReport {
        analysed: summaries.len(),
        insights,
        suggestions,
    }
}
