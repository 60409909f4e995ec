//! `taskboard add` command.

use super::settle;
use crate::board::BoardController;
use crate::context::ServiceContext;
use crate::task::{Priority, TaskDraft};

/// Execute the `add` command.
///
/// # Errors
///
/// Returns an error string if the input is invalid or the store refuses.
pub async fn run(
    ctx: &ServiceContext,
    title: &str,
    description: Option<&str>,
    priority: Priority,
    due: &str,
) -> Result<(), String> {
    let draft = TaskDraft {
        title: title.to_string(),
        description: description.map(String::from),
        priority: Some(priority),
        due: Some(due.to_string()),
    };
    let board = BoardController::from_context(ctx);
    let result = board.create(&draft).await;
    let task = settle(&board, result)?;
    println!("Created task {}: {}", task.id, task.title);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::context;
    use serde_json::json;

    #[tokio::test]
    async fn creates_task() {
        let ctx = context(vec![(
            "tasks",
            "create",
            json!({"Ok": {"id": "t9", "title": "Ship", "priority": "high",
                          "dueDate": "2025-04-11T12:00:00Z", "status": "pending"}}),
        )]);
        assert!(run(&ctx, "Ship", None, Priority::High, "2025-04-11").await.is_ok());
    }

    #[tokio::test]
    async fn blank_title_fails_before_any_store_call() {
        // No scripted interactions: a store call would panic.
        let ctx = context(vec![]);
        let err = run(&ctx, "  ", None, Priority::Low, "2025-04-11").await.unwrap_err();
        assert!(err.contains("title is required"));
    }

    #[tokio::test]
    async fn past_due_date_is_rejected() {
        let ctx = context(vec![]);
        let err = run(&ctx, "Late", None, Priority::Low, "2025-04-09").await.unwrap_err();
        assert!(err.contains("in the past"));
    }
}
