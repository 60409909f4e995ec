//! `taskboard settings` subcommands.

use super::render_table;
use crate::config::AppConfig;
use crate::context::ServiceContext;
use crate::notify::NotificationCenter;
use crate::settings::{Settings, SettingsStore};

/// Execute `settings show`.
///
/// # Errors
///
/// Never fails; the signature matches the other handlers.
pub fn show(ctx: &ServiceContext, config: &AppConfig) -> Result<(), String> {
    let settings = SettingsStore::new(ctx.fs.as_ref(), config).load();
    println!("{}", render_settings(&settings));
    Ok(())
}

/// Execute `settings set <key> <value>`.
///
/// # Errors
///
/// Returns an error string for an unknown key, a bad value, or a failed save.
pub fn set(ctx: &ServiceContext, config: &AppConfig, key: &str, value: &str) -> Result<(), String> {
    let store = SettingsStore::new(ctx.fs.as_ref(), config);
    let mut settings = store.load();
    settings.set(key, value).map_err(|e| e.to_string())?;
    store.save(&settings).map_err(|e| e.to_string())?;
    let shown = settings
        .entries()
        .into_iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v);
    println!("{key} = {}", shown.unwrap_or_else(|| value.to_string()));
    Ok(())
}

/// Execute `settings reset`.
///
/// # Errors
///
/// Returns an error string if the defaults cannot be saved.
pub fn reset(ctx: &ServiceContext, config: &AppConfig) -> Result<(), String> {
    SettingsStore::new(ctx.fs.as_ref(), config)
        .save(&Settings::default())
        .map_err(|e| e.to_string())?;
    println!("Settings restored to defaults.");
    Ok(())
}

/// Execute `settings test`: records a test notification when enabled.
///
/// # Errors
///
/// Returns an error string if the history cannot be saved.
pub fn test(ctx: &ServiceContext, config: &AppConfig) -> Result<(), String> {
    let store = SettingsStore::new(ctx.fs.as_ref(), config);
    let mut center = NotificationCenter::new(store, ctx.clock.as_ref(), ctx.id_gen.as_ref());
    match center.send_test().map_err(|e| e.to_string())? {
        Some(entry) => println!("🔔 {}", entry.message),
        None => println!("Notifications are turned off; no test sent."),
    }
    Ok(())
}

fn render_settings(settings: &Settings) -> String {
    let rows: Vec<Vec<String>> = settings
        .entries()
        .into_iter()
        .map(|(key, value)| vec![key.to_string(), value])
        .collect();
    render_table(&["KEY", "VALUE"], &rows)
}
