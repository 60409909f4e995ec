//! Notification port: the push channel delivering reminders and updates.

use std::error::Error;

use serde::Deserialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::task::Task;

/// A push event from the notification channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskEvent {
    /// `taskReminder`: the task is due soon.
    Reminder(Task),
    /// `taskUpdated`: the task changed on the server.
    Updated(Task),
}

impl TaskEvent {
    /// The task the event is about.
    #[must_use]
    pub fn task(&self) -> &Task {
        match self {
            Self::Reminder(task) | Self::Updated(task) => task,
        }
    }
}

#[derive(Deserialize)]
struct WireEvent {
    event: String,
    task: Task,
}

/// Decodes one line of the event stream.
///
/// Blank lines, malformed JSON and unknown event names yield `None`.
#[must_use]
pub fn parse_event_line(line: &str) -> Option<TaskEvent> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let wire: WireEvent = match serde_json::from_str(line) {
        Ok(wire) => wire,
        Err(e) => {
            debug!(error = %e, "ignoring malformed notification line");
            return None;
        }
    };
    match wire.event.as_str() {
        "taskReminder" => Some(TaskEvent::Reminder(wire.task)),
        "taskUpdated" => Some(TaskEvent::Updated(wire.task)),
        other => {
            debug!(event = other, "ignoring unknown notification event");
            None
        }
    }
}

/// A live subscription. Dropping it tears the connection down.
pub struct Subscription {
    events: mpsc::Receiver<TaskEvent>,
    pump: Option<JoinHandle<()>>,
}

impl Subscription {
    /// Wraps a receiver fed by a background task that is aborted on drop.
    #[must_use]
    pub fn new(events: mpsc::Receiver<TaskEvent>, pump: JoinHandle<()>) -> Self {
        Self {
            events,
            pump: Some(pump),
        }
    }

    /// Wraps a receiver whose sender is owned elsewhere.
    #[must_use]
    pub fn from_receiver(events: mpsc::Receiver<TaskEvent>) -> Self {
        Self { events, pump: None }
    }

    /// Waits for the next event; `None` once the channel has closed.
    pub async fn next(&mut self) -> Option<TaskEvent> {
        self.events.recv().await
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(pump) = self.pump.take() {
            pump.abort();
        }
    }
}

/// Opens subscriptions to the push channel.
pub trait NotificationSource: Send + Sync {
    /// Opens the long-lived connection. Must be called inside a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if the subscription cannot be started.
    fn subscribe(&self) -> Result<Subscription, Box<dyn Error + Send + Sync>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_events() {
        let line = concat!(
            r#"{"event": "taskReminder", "task": {"id": "1", "title": "Pay rent", "#,
            r#""priority": "high", "dueDate": "2025-05-01T09:00:00Z", "status": "pending"}}"#,
        );
        match parse_event_line(line) {
            Some(TaskEvent::Reminder(task)) => assert_eq!(task.title, "Pay rent"),
            other => panic!("expected reminder, got {other:?}"),
        }
    }

    #[test]
    fn skips_unknown_and_malformed_lines() {
        assert!(parse_event_line("").is_none());
        assert!(parse_event_line("{not json").is_none());
        assert!(parse_event_line(r#"{"event": "connect", "task": {"id": "1", "title": "x"}}"#)
            .is_none());
    }

    #[tokio::test]
    async fn subscription_ends_when_sender_drops() {
        let (tx, rx) = mpsc::channel(4);
        let mut subscription = Subscription::from_receiver(rx);
        drop(tx);
        assert!(subscription.next().await.is_none());
    }
}
