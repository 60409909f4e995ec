//! `taskboard edit` command.

use super::{load_board, settle};
use crate::board::BoardController;
use crate::context::ServiceContext;
use crate::dates;
use crate::task::{Priority, TaskId, TaskPatch, TaskStatus};

/// Fields given on the command line; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct EditFields {
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New priority.
    pub priority: Option<Priority>,
    /// New due date text.
    pub due: Option<String>,
    /// New status.
    pub status: Option<TaskStatus>,
}

/// Execute the `edit` command.
///
/// # Errors
///
/// Returns an error string if the due date is unreadable, nothing would
/// change, the task is unknown, or the store refuses.
pub async fn run(ctx: &ServiceContext, id: &str, fields: EditFields) -> Result<(), String> {
    let zone = ctx.clock.now().timezone();
    let due_date = match fields.due.as_deref() {
        None => None,
        Some(raw) => Some(
            dates::parse_input(raw, &zone)
                .ok_or_else(|| format!("due date '{raw}' is not a valid date/time"))?,
        ),
    };
    let patch = TaskPatch {
        title: fields.title,
        description: fields.description,
        priority: fields.priority,
        due_date,
        status: fields.status,
    };

    let board = BoardController::from_context(ctx);
    load_board(&board).await?;
    let result = board.update(&TaskId::new(id), &patch).await;
    let task = settle(&board, result)?;
    println!("Updated task {}: {}", task.id, task.title);
    Ok(())
}
