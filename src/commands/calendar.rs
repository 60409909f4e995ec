//! `taskboard calendar` command.

use chrono::{DateTime, FixedOffset, NaiveDate};

use super::{load_board, render_table};
use crate::board::BoardController;
use crate::classify;
use crate::context::ServiceContext;
use crate::dates;
use crate::task::Task;

/// Execute the `calendar` command: every task due on one day.
///
/// # Errors
///
/// Returns an error string if the date is unreadable or the tasks cannot
/// be loaded.
pub async fn run(ctx: &ServiceContext, date: Option<&str>) -> Result<(), String> {
    let now = ctx.clock.now();
    let day = match date {
        None => now.date_naive(),
        Some(raw) => dates::parse_date(raw)
            .ok_or_else(|| format!("date '{raw}' is not a valid YYYY-MM-DD date"))?,
    };

    let board = BoardController::from_context(ctx);
    load_board(&board).await?;
    let tasks = board.tasks();
    println!("{}", render_day(&tasks, day, &now));
    Ok(())
}

fn render_day(tasks: &[Task], day: NaiveDate, now: &DateTime<FixedOffset>) -> String {
    let heading = format!("Tasks for {}", day.format("%A, %B %-d, %Y"));
    let on_day = classify::tasks_on_day(tasks, day, now);
    if on_day.is_empty() {
        return format!("{heading}\n  No tasks scheduled");
    }
    let zone = now.timezone();
    let rows: Vec<Vec<String>> = on_day
        .iter()
        .map(|task| {
            let time = task
                .due(&zone)
                .map(|due| due.with_timezone(&zone).format("%-I:%M %p").to_string())
                .unwrap_or_default();
            vec![
                time,
                task.id.to_string(),
                task.title.clone(),
                task.priority.to_string(),
                task.status.to_string(),
            ]
        })
        .collect();
    format!("{heading}\n{}", render_table(&["TIME", "ID", "TITLE", "PRIORITY", "STATUS"], &rows))
}
