//! `taskboard history` command.

use chrono::{DateTime, FixedOffset};

use super::render_table;
use crate::config::AppConfig;
use crate::context::ServiceContext;
use crate::notify::{format_age, NotificationCenter, NotificationHistory};
use crate::settings::SettingsStore;

/// Execute the `history` command: list, clear, or mark all read.
///
/// # Errors
///
/// Returns an error string if a changed history cannot be saved.
pub fn run(
    ctx: &ServiceContext,
    config: &AppConfig,
    clear: bool,
    mark_read: bool,
) -> Result<(), String> {
    let store = SettingsStore::new(ctx.fs.as_ref(), config);
    let mut center = NotificationCenter::new(store, ctx.clock.as_ref(), ctx.id_gen.as_ref());

    if clear {
        center.clear().map_err(|e| e.to_string())?;
        println!("Notification history cleared.");
    } else if mark_read {
        center.mark_all_read().map_err(|e| e.to_string())?;
        println!("All notifications marked as read.");
    } else {
        println!("{}", render_history(center.history(), &ctx.clock.now()));
    }
    Ok(())
}

fn render_history(history: &NotificationHistory, now: &DateTime<FixedOffset>) -> String {
    if history.is_empty() {
        return "No notifications yet.".to_string();
    }
    let rows: Vec<Vec<String>> = history
        .entries()
        .iter()
        .map(|entry| {
            vec![
                if entry.read { String::new() } else { "•".to_string() },
                format_age(&entry.timestamp, now),
                entry.kind.to_string(),
                entry.message.clone(),
            ]
        })
        .collect();
    format!(
        "{}\n\n{} unread of {}",
        render_table(&["", "WHEN", "KIND", "MESSAGE"], &rows),
        history.unread_count(),
        history.len()
    )
}
