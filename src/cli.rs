//! CLI argument definitions and logging setup.

use std::io::IsTerminal;

use clap::{ArgAction, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::classify::Bucket;
use crate::task::{Priority, TaskStatus};

/// Top-level CLI parser for `taskboard`.
#[derive(Debug, Parser)]
#[command(name = "taskboard", version, about = "Task board with due-date columns")]
pub struct Cli {
    /// More log output (-v info, -vv debug, -vvv trace).
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,
    /// Less log output (-q warn, -qq error).
    #[arg(short = 'q', long = "quiet", action = ArgAction::Count, global = true)]
    pub quiet: u8,
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the Due Today, Completed and Overdue columns.
    Board {
        /// Also list pending tasks due after today.
        #[arg(long)]
        upcoming: bool,
    },
    /// Create a task.
    Add {
        /// Task title.
        #[arg(long)]
        title: String,
        /// Optional description.
        #[arg(long)]
        description: Option<String>,
        /// low, medium or high.
        #[arg(long, default_value = "medium")]
        priority: Priority,
        /// Due date: YYYY-MM-DD (noon), YYYY-MM-DD HH:MM, or RFC 3339.
        #[arg(long)]
        due: String,
    },
    /// Change fields of a task.
    Edit {
        /// Task id.
        id: String,
        /// New title.
        #[arg(long)]
        title: Option<String>,
        /// New description.
        #[arg(long)]
        description: Option<String>,
        /// New priority.
        #[arg(long)]
        priority: Option<Priority>,
        /// New due date.
        #[arg(long)]
        due: Option<String>,
        /// pending or completed.
        #[arg(long)]
        status: Option<TaskStatus>,
    },
    /// Move a task to another column, or reorder it within its column.
    Move {
        /// Task id.
        id: String,
        /// Destination column: due-today, completed or overdue.
        #[arg(long)]
        to: Bucket,
        /// Position in the destination column.
        #[arg(long, default_value_t = 0)]
        index: usize,
    },
    /// Delete a task.
    Delete {
        /// Task id.
        id: String,
    },
    /// List the tasks due on one day.
    Calendar {
        /// Day to show (YYYY-MM-DD); defaults to today.
        #[arg(long)]
        date: Option<String>,
    },
    /// AI insights and scheduling suggestions for due-today and overdue tasks.
    Insights,
    /// Show or change local preferences.
    Settings {
        /// What to do with the settings.
        #[command(subcommand)]
        action: SettingsAction,
    },
    /// Follow the push channel and print accepted notifications.
    Watch {
        /// Stop after this many notifications.
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Show notifications received so far.
    History {
        /// Delete every entry.
        #[arg(long, conflicts_with = "mark_read")]
        clear: bool,
        /// Mark every entry read.
        #[arg(long)]
        mark_read: bool,
    },
}

/// `taskboard settings` actions.
#[derive(Debug, Subcommand)]
pub enum SettingsAction {
    /// Print every setting.
    Show,
    /// Change one setting, e.g. `notifications.low_priority true`.
    Set {
        /// Dotted setting key.
        key: String,
        /// New value.
        value: String,
    },
    /// Restore the defaults.
    Reset,
    /// Send a test notification.
    Test,
}

/// Installs the stderr log subscriber.
///
/// `RUST_LOG` wins over the flags. Calling it twice is harmless.
pub fn init_tracing(verbose: u8, quiet: u8) {
    let default_level = if quiet >= 2 {
        "error"
    } else if quiet == 1 {
        "warn"
    } else if verbose >= 3 {
        "trace"
    } else if verbose == 2 {
        "debug"
    } else if verbose == 1 {
        "info"
    } else {
        "warn"
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }
}
