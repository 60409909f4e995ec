//! `taskboard move` command.

use super::{load_board, settle};
use crate::board::{BoardController, MoveOutcome};
use crate::classify::{bucket_of, Bucket};
use crate::context::ServiceContext;
use crate::task::TaskId;

/// Execute the `move` command.
///
/// The source column is the one the task currently sits in. Tasks due
/// after today sit in no column and cannot be moved.
///
/// # Errors
///
/// Returns an error string if the task is unknown or not on a column, or
/// the store rejects the status change (which is then rolled back).
pub async fn run(ctx: &ServiceContext, id: &str, to: Bucket, index: usize) -> Result<(), String> {
    let board = BoardController::from_context(ctx);
    load_board(&board).await?;

    let id = TaskId::new(id);
    let Some(task) = board.task(&id) else {
        return Err(format!("task {id} is not on the board"));
    };
    let Some(from) = bucket_of(&task, &ctx.clock.now()) else {
        return Err(format!("task {id} is not in any column (due later or undated)"));
    };

    let result = board.move_task(&id, from, to, index).await;
    match settle(&board, result)? {
        MoveOutcome::Unchanged => println!("Task {id} is already there."),
        MoveOutcome::Reordered => {
            println!("Moved task {id} to position {index} in {}.", to.title());
        }
        MoveOutcome::Persisted => {
            println!("Moved task {id} from {} to {}.", from.title(), to.title());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::context;
    use serde_json::json;

    fn listed() -> serde_json::Value {
        json!({"Ok": [
            {"id": "1", "title": "Taxes", "priority": "high",
             "dueDate": "2025-04-08T09:00:00Z", "status": "pending"},
            {"id": "2", "title": "Trip", "priority": "low",
             "dueDate": "2025-05-08T09:00:00Z", "status": "pending"},
        ]})
    }

    #[tokio::test]
    async fn failed_status_change_reports_notice() {
        let ctx = context(vec![
            ("tasks", "list", listed()),
            ("tasks", "update_status", json!({"Err": {"kind": "network", "message": "offline"}})),
            ("tasks", "list", listed()),
        ]);
        let err = run(&ctx, "1", Bucket::Completed, 0).await.unwrap_err();
        assert!(err.contains("Failed to update task status"));
    }

    #[tokio::test]
    async fn persisted_move_succeeds() {
        let ctx = context(vec![
            ("tasks", "list", listed()),
            (
                "tasks",
                "update_status",
                json!({"Ok": {"id": "1", "title": "Taxes", "priority": "high",
                              "dueDate": "2025-04-08T09:00:00Z", "status": "completed"}}),
            ),
        ]);
        assert!(run(&ctx, "1", Bucket::Completed, 0).await.is_ok());
    }

    #[tokio::test]
    async fn upcoming_task_cannot_move() {
        let ctx = context(vec![("tasks", "list", listed())]);
        let err = run(&ctx, "2", Bucket::Completed, 0).await.unwrap_err();
        assert!(err.contains("not in any column"));
    }
}
