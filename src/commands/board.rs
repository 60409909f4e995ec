//! `taskboard board` command.

use chrono::{DateTime, FixedOffset};

use super::{load_board, render_table};
use crate::board::{BoardController, BoardView};
use crate::classify;
use crate::context::ServiceContext;
use crate::dates;
use crate::task::Task;

/// Execute the `board` command.
///
/// Loads every task and prints the three columns, then how many pending
/// tasks are due later (or, with `upcoming`, lists them).
///
/// # Errors
///
/// Returns an error string if the tasks cannot be loaded.
pub async fn run(ctx: &ServiceContext, upcoming: bool) -> Result<(), String> {
    let board = BoardController::from_context(ctx);
    load_board(&board).await?;
    let view = board.view();
    println!("{}", render_board(&view));

    if upcoming && view.hidden_upcoming > 0 {
        let later = classify::upcoming(&board.tasks(), &view.now);
        println!("\nUpcoming");
        println!("{}", render_tasks(&later.iter().collect::<Vec<_>>(), &view.now));
    }
    Ok(())
}

/// One row per task: id, title, priority, due label.
pub(super) fn task_row(task: &Task, now: &DateTime<FixedOffset>) -> Vec<String> {
    let due = task.due(&now.timezone()).map_or_else(
        || format!("invalid date ({})", task.due_date),
        |due| {
            if task.is_completed() {
                dates::format_due(&due, now)
            } else if dates::is_past_due(&due, now) {
                let late = dates::format_relative(&due, now);
                format!("{} (past due, {late})", dates::format_due(&due, now))
            } else {
                format!("{} ({})", dates::format_due(&due, now), dates::format_relative(&due, now))
            }
        },
    );
    vec![
        task.id.to_string(),
        task.title.clone(),
        task.priority.to_string(),
        due,
    ]
}

pub(super) fn render_tasks(tasks: &[&Task], now: &DateTime<FixedOffset>) -> String {
    let rows: Vec<Vec<String>> = tasks.iter().map(|task| task_row(task, now)).collect();
    render_table(&["ID", "TITLE", "PRIORITY", "DUE"], &rows)
}

/// The three columns as text.
pub(super) fn render_board(view: &BoardView) -> String {
    let mut out = Vec::new();
    for (bucket, tasks) in view.columns.iter() {
        out.push(format!("{} ({})", bucket.title(), tasks.len()));
        if tasks.is_empty() {
            out.push("  No tasks".to_string());
        } else {
            out.push(render_tasks(&tasks.iter().collect::<Vec<_>>(), &view.now));
        }
        out.push(String::new());
    }
    match view.hidden_upcoming {
        0 => {
            out.pop();
        }
        1 => out.push("1 upcoming task not shown (--upcoming to list it)".to_string()),
        n => out.push(format!("{n} upcoming tasks not shown (--upcoming to list them)")),
    }
    out.join("\n")
}
