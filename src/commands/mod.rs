//! Command dispatch and handlers.

pub mod add;
pub mod board;
pub mod calendar;
pub mod delete;
pub mod edit;
pub mod history;
pub mod insights;
pub mod move_task;
pub mod settings;
pub mod watch;

use crate::board::{BoardController, NoticeLevel};
use crate::cassette::session::RecordingSession;
use crate::cli::{Command, SettingsAction};
use crate::config::AppConfig;
use crate::context::ServiceContext;
use crate::error::BoardError;

/// Dispatch a parsed command to its handler.
///
/// When `TASKBOARD_RECORD` is set to a directory path, all port
/// interactions are recorded to per-port cassette files in that directory.
///
/// # Errors
///
/// Returns an error string if configuration is invalid or the selected
/// command handler fails.
pub fn dispatch(command: &Command) -> Result<(), String> {
    let config = AppConfig::from_env().map_err(|e| e.to_string())?;
    let (ctx, session) = if let Some(dir) = &config.record_dir {
        let (ctx, session) = ServiceContext::recording_at(&config, dir)?;
        (ctx, Some(session))
    } else {
        (ServiceContext::live(&config)?, None)
    };

    let result = run_with_context(command, &ctx, &config);

    // Finish recording after command completes (even on error)
    if let Some(session) = session {
        // Drop context first to release Arc references
        drop(ctx);
        finish_recording(session)?;
    }

    result
}

/// Runs a command on a single-threaded runtime with the given context.
///
/// # Errors
///
/// Returns an error string if the runtime cannot start or the handler fails.
pub fn run_with_context(
    command: &Command,
    ctx: &ServiceContext,
    config: &AppConfig,
) -> Result<(), String> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("Failed to start async runtime: {e}"))?;
    runtime.block_on(execute(command, ctx, config))
}

async fn execute(
    command: &Command,
    ctx: &ServiceContext,
    config: &AppConfig,
) -> Result<(), String> {
    match command {
        Command::Board { upcoming } => board::run(ctx, *upcoming).await,
        Command::Add { title, description, priority, due } => {
            add::run(ctx, title, description.as_deref(), *priority, due).await
        }
        Command::Edit { id, title, description, priority, due, status } => {
            let fields = edit::EditFields {
                title: title.clone(),
                description: description.clone(),
                priority: *priority,
                due: due.clone(),
                status: *status,
            };
            edit::run(ctx, id, fields).await
        }
        Command::Move { id, to, index } => move_task::run(ctx, id, *to, *index).await,
        Command::Delete { id } => delete::run(ctx, id).await,
        Command::Calendar { date } => calendar::run(ctx, date.as_deref()).await,
        Command::Insights => insights::run(ctx, config).await,
        Command::Settings { action } => match action {
            SettingsAction::Show => settings::show(ctx, config),
            SettingsAction::Set { key, value } => settings::set(ctx, config, key, value),
            SettingsAction::Reset => settings::reset(ctx, config),
            SettingsAction::Test => settings::test(ctx, config),
        },
        Command::Watch { limit } => watch::run(ctx, config, *limit).await,
        Command::History { clear, mark_read } => history::run(ctx, config, *clear, *mark_read),
    }
}

/// Finish a recording session and print the output directory.
fn finish_recording(session: RecordingSession) -> Result<(), String> {
    let output_dir = session.finish()?;
    eprintln!("Recording saved to: {}", output_dir.display());
    Ok(())
}

/// Loads the board, turning a failure into the load notice.
async fn load_board(board: &BoardController<'_>) -> Result<(), String> {
    let result = board.load().await;
    settle(board, result)
}

/// Prints success notices and turns a failed operation into its error
/// notice, so the user sees one line per failure.
fn settle<T>(board: &BoardController<'_>, result: Result<T, BoardError>) -> Result<T, String> {
    let mut failure = None;
    for notice in board.take_notices() {
        match notice.level {
            NoticeLevel::Success => println!("{notice}"),
            NoticeLevel::Error => failure = Some(notice.to_string()),
        }
    }
    result.map_err(|err| failure.unwrap_or_else(|| err.to_string()))
}

/// Renders rows under a header with each column padded to its widest cell.
fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            rows.iter()
                .filter_map(|row| row.get(i))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
                .max(header.len())
        })
        .collect();

    let line = |cells: Vec<String>| {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect();
        padded.join("  ").trim_end().to_string()
    };

    let mut out = Vec::with_capacity(rows.len() + 2);
    out.push(line(headers.iter().map(ToString::to_string).collect()));
    out.push(line(widths.iter().map(|w| "-".repeat(*w)).collect()));
    for row in rows {
        out.push(line(row.clone()));
    }
    out.join("\n")
}
