//! `taskboard insights` command.

use super::load_board;
use crate::board::BoardController;
use crate::config::AppConfig;
use crate::context::ServiceContext;
use crate::insights::{self, InsightsReport};
use crate::settings::SettingsStore;

/// Execute the `insights` command.
///
/// An unavailable insights service is not an error; the panel just shows
/// its fallbacks.
///
/// # Errors
///
/// Returns an error string if the tasks cannot be loaded.
pub async fn run(ctx: &ServiceContext, config: &AppConfig) -> Result<(), String> {
    let ai = SettingsStore::new(ctx.fs.as_ref(), config).load().ai;
    if !ai.insights_enabled {
        println!("AI insights are turned off (taskboard settings set ai.insights_enabled true).");
        return Ok(());
    }

    let board = BoardController::from_context(ctx);
    load_board(&board).await?;
    let report =
        insights::gather(ctx.insights.as_ref(), &board.tasks(), &ctx.clock.now(), &ai).await;
    println!("{}", render_report(&report));
    Ok(())
}

fn render_report(report: &InsightsReport) -> String {
    if report.analysed == 0 {
        return "No due-today or overdue tasks to analyse.".to_string();
    }
    let mut out = vec![
        format!("Insights for {} task(s)", report.analysed),
        String::new(),
    ];
    for (heading, text) in report.sections() {
        out.push(heading.to_string());
        out.push(format!("  {text}"));
    }
    if !report.suggestions.is_empty() {
        out.push(String::new());
        out.push("Scheduling suggestions".to_string());
        for suggestion in &report.suggestions {
            out.push(format!("  - {}: {}", suggestion.title, suggestion.description));
        }
    }
    out.join("\n")
}
