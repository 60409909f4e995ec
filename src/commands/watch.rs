//! `taskboard watch` command.

use tracing::{debug, warn};

use super::load_board;
use crate::board::BoardController;
use crate::config::AppConfig;
use crate::context::ServiceContext;
use crate::notify::{NotificationCenter, NotificationEntry, NotificationKind};
use crate::ports::{Subscription, TaskEvent};
use crate::settings::SettingsStore;

/// Execute the `watch` command.
///
/// Runs until the server closes the stream or `limit` notifications have
/// been shown.
///
/// # Errors
///
/// Returns an error string if the tasks cannot be loaded or the push
/// channel cannot be opened.
pub async fn run(
    ctx: &ServiceContext,
    config: &AppConfig,
    limit: Option<usize>,
) -> Result<(), String> {
    let board = BoardController::from_context(ctx);
    load_board(&board).await?;
    let store = SettingsStore::new(ctx.fs.as_ref(), config);
    let mut center = NotificationCenter::new(store, ctx.clock.as_ref(), ctx.id_gen.as_ref());
    let mut subscription = ctx
        .notifications
        .subscribe()
        .map_err(|e| format!("Failed to open notification stream: {e}"))?;

    eprintln!("Watching for notifications...");
    let shown = pump(&board, &mut center, &mut subscription, limit, |entry| {
        let icon = match entry.kind {
            NotificationKind::Reminder => "⏰",
            NotificationKind::Update | NotificationKind::Test => "🔔",
        };
        println!("{icon} {}", entry.message);
    })
    .await;
    board.detach();
    if limit.is_some_and(|limit| shown >= limit) {
        return Ok(());
    }
    eprintln!("Notification stream closed after {shown} notification(s).");
    Ok(())
}

/// Feeds events through the centre until the stream ends or `limit` is
/// reached; returns how many were shown.
///
/// An event for a task the board does not know triggers one reload, so
/// tasks created since the last load are picked up. Events for tasks that
/// are still missing afterwards are dropped. Updates to tasks on the board
/// replace the local copy.
async fn pump(
    board: &BoardController<'_>,
    center: &mut NotificationCenter<'_>,
    subscription: &mut Subscription,
    limit: Option<usize>,
    mut show: impl FnMut(&NotificationEntry),
) -> usize {
    let mut shown = 0;
    while !limit.is_some_and(|limit| shown >= limit) {
        let Some(event) = subscription.next().await else {
            break;
        };
        let id = &event.task().id;
        if board.task(id).is_none() {
            if let Err(err) = board.load().await {
                warn!(%id, error = %err, "reload for unknown task failed");
            }
            if board.task(id).is_none() {
                debug!(%id, "ignoring notification for task not on the board");
                continue;
            }
        }
        if let TaskEvent::Updated(task) = &event {
            board.apply_remote(task);
        }
        if let Some(entry) = center.handle(&event) {
            show(&entry);
            shown += 1;
        }
    }
    shown
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::context;
    use crate::settings::testing::MemoryFileSystem;
    use crate::task::{Priority, Task, TaskId, TaskStatus};
    use serde_json::json;
    use tokio::sync::mpsc;

    fn task(id: &str, priority: Priority, status: TaskStatus) -> Task {
        Task {
            id: TaskId::new(id),
            title: format!("task {id}"),
            description: None,
            priority,
            due_date: "2025-04-10T15:00:00Z".into(),
            status,
        }
    }

    fn reminder(id: &str, priority: Priority) -> TaskEvent {
        TaskEvent::Reminder(task(id, priority, TaskStatus::Pending))
    }

    fn listed() -> serde_json::Value {
        json!({"Ok": [
            {"id": "1", "title": "task 1", "priority": "high",
             "dueDate": "2025-04-10T15:00:00Z", "status": "pending"},
            {"id": "2", "title": "task 2", "priority": "low",
             "dueDate": "2025-04-10T15:00:00Z", "status": "pending"},
        ]})
    }

    fn with_new_task() -> serde_json::Value {
        json!({"Ok": [
            {"id": "1", "title": "task 1", "priority": "high",
             "dueDate": "2025-04-10T15:00:00Z", "status": "pending"},
            {"id": "2", "title": "task 2", "priority": "low",
             "dueDate": "2025-04-10T15:00:00Z", "status": "pending"},
            {"id": "3", "title": "task 3", "priority": "high",
             "dueDate": "2025-04-10T15:00:00Z", "status": "pending"},
        ]})
    }

    #[tokio::test]
    async fn filters_unknown_tasks_and_low_priority() {
        let ctx = context(vec![("tasks", "list", listed()), ("tasks", "list", listed())]);
        let board = BoardController::from_context(&ctx);
        board.load().await.unwrap();
        let config = AppConfig::default();
        let store = SettingsStore::new(ctx.fs.as_ref(), &config);
        let mut center = NotificationCenter::new(store, ctx.clock.as_ref(), ctx.id_gen.as_ref());

        let (tx, rx) = mpsc::channel(8);
        let mut subscription = Subscription::from_receiver(rx);
        tx.send(reminder("ghost", Priority::High)).await.unwrap();
        tx.send(reminder("2", Priority::Low)).await.unwrap();
        tx.send(reminder("1", Priority::High)).await.unwrap();
        let completed = task("2", Priority::Low, TaskStatus::Completed);
        tx.send(TaskEvent::Updated(completed)).await.unwrap();
        drop(tx);

        let mut messages = Vec::new();
        let shown = pump(&board, &mut center, &mut subscription, None, |entry| {
            messages.push(entry.message.clone());
        })
        .await;

        assert_eq!(shown, 2);
        assert_eq!(messages[0], "Reminder: \"task 1\" is due soon!");
        assert_eq!(messages[1], "\"task 2\" was updated");
        assert!(board.task(&TaskId::new("2")).unwrap().is_completed());
        assert!(board.task(&TaskId::new("ghost")).is_none());
        assert_eq!(center.history().len(), 2);
    }

    #[tokio::test]
    async fn stops_at_limit() {
        let ctx = context(vec![("tasks", "list", listed())]);
        let board = BoardController::from_context(&ctx);
        board.load().await.unwrap();
        let config = AppConfig::default();
        let store = SettingsStore::new(ctx.fs.as_ref(), &config);
        let mut center = NotificationCenter::new(store, ctx.clock.as_ref(), ctx.id_gen.as_ref());

        let (tx, rx) = mpsc::channel(8);
        let mut subscription = Subscription::from_receiver(rx);
        for _ in 0..3 {
            tx.send(reminder("1", Priority::High)).await.unwrap();
        }

        let shown = pump(&board, &mut center, &mut subscription, Some(2), |_| {}).await;
        assert_eq!(shown, 2);
    }

    #[tokio::test]
    async fn reloads_for_tasks_created_after_start() {
        let ctx = context(vec![
            ("tasks", "list", listed()),
            ("tasks", "list", with_new_task()),
        ]);
        let board = BoardController::from_context(&ctx);
        board.load().await.unwrap();
        let config = AppConfig::default();
        let store = SettingsStore::new(ctx.fs.as_ref(), &config);
        let mut center = NotificationCenter::new(store, ctx.clock.as_ref(), ctx.id_gen.as_ref());

        let (tx, rx) = mpsc::channel(8);
        let mut subscription = Subscription::from_receiver(rx);
        tx.send(reminder("3", Priority::High)).await.unwrap();
        drop(tx);

        let mut messages = Vec::new();
        let shown = pump(&board, &mut center, &mut subscription, None, |entry| {
            messages.push(entry.message.clone());
        })
        .await;

        assert_eq!(shown, 1);
        assert_eq!(messages, vec!["Reminder: \"task 3\" is due soon!"]);
        assert!(board.task(&TaskId::new("3")).is_some());
    }

    #[tokio::test]
    async fn unsaved_history_does_not_end_the_session() {
        let ctx = context(vec![("tasks", "list", listed())]);
        let board = BoardController::from_context(&ctx);
        board.load().await.unwrap();
        let fs = MemoryFileSystem::default().read_only();
        let store = SettingsStore::new(&fs, &AppConfig::default());
        let mut center = NotificationCenter::new(store, ctx.clock.as_ref(), ctx.id_gen.as_ref());

        let (tx, rx) = mpsc::channel(8);
        let mut subscription = Subscription::from_receiver(rx);
        for _ in 0..2 {
            tx.send(reminder("1", Priority::High)).await.unwrap();
        }
        drop(tx);

        let shown = pump(&board, &mut center, &mut subscription, None, |_| {}).await;
        assert_eq!(shown, 2);
    }

    #[tokio::test]
    async fn unavailable_channel_is_an_error() {
        let ctx = context(vec![("tasks", "list", listed())]);
        let err = run(&ctx, &AppConfig::default(), Some(1)).await.unwrap_err();
        assert!(err.contains("Failed to open notification stream"));
    }
}
