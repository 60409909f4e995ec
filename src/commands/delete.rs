//! `taskboard delete` command.

use super::{load_board, settle};
use crate::board::BoardController;
use crate::context::ServiceContext;
use crate::task::TaskId;

/// Execute the `delete` command.
///
/// # Errors
///
/// Returns an error string if the tasks cannot be loaded or the store
/// refuses the delete (the task is then restored).
pub async fn run(ctx: &ServiceContext, id: &str) -> Result<(), String> {
    let board = BoardController::from_context(ctx);
    load_board(&board).await?;
    let result = board.delete(&TaskId::new(id)).await;
    settle(&board, result)
}
