//! Filters push events against the user's preferences and records the
//! ones that are shown.

use tracing::{debug, info, warn};

use super::history::{NotificationEntry, NotificationHistory, NotificationKind};
use crate::ports::{Clock, IdGenerator, TaskEvent};
use crate::settings::{NotificationSettings, SettingsError, SettingsStore};
use crate::task::TaskId;

/// Accepted notifications, newest first, plus the preferences that decide
/// which events get through.
pub struct NotificationCenter<'a> {
    prefs: NotificationSettings,
    history: NotificationHistory,
    store: SettingsStore<'a>,
    clock: &'a dyn Clock,
    ids: &'a dyn IdGenerator,
}

impl<'a> NotificationCenter<'a> {
    /// Loads preferences and history from `store`.
    pub fn new(store: SettingsStore<'a>, clock: &'a dyn Clock, ids: &'a dyn IdGenerator) -> Self {
        let prefs = store.load().notifications;
        let history = store.load_history();
        Self {
            prefs,
            history,
            store,
            clock,
            ids,
        }
    }

    /// Preferences in effect.
    #[must_use]
    pub fn preferences(&self) -> &NotificationSettings {
        &self.prefs
    }

    /// Shown notifications, newest first.
    #[must_use]
    pub fn history(&self) -> &NotificationHistory {
        &self.history
    }

    /// Whether `event` would be shown.
    ///
    /// Reminders also need the flag for the task's priority.
    #[must_use]
    pub fn accepts(&self, event: &TaskEvent) -> bool {
        match event {
            TaskEvent::Reminder(task) => self.prefs.allows(task.priority),
            TaskEvent::Updated(_) => self.prefs.enabled,
        }
    }

    /// Records `event` if the preferences let it through.
    ///
    /// The entry is returned even when the history cannot be saved; the
    /// failure is logged and the entry stays in memory.
    pub fn handle(&mut self, event: &TaskEvent) -> Option<NotificationEntry> {
        let task = event.task();
        if !self.accepts(event) {
            debug!(id = %task.id, priority = %task.priority, "notification filtered out");
            return None;
        }
        let (kind, title, message) = match event {
            TaskEvent::Reminder(_) => (
                NotificationKind::Reminder,
                "Task Reminder",
                format!("Reminder: \"{}\" is due soon!", task.title),
            ),
            TaskEvent::Updated(_) => (
                NotificationKind::Update,
                "Task Updated",
                format!("\"{}\" was updated", task.title),
            ),
        };
        let entry = self.entry(kind, title, message, Some(task.id.clone()));
        self.history.push(entry.clone());
        info!(kind = %entry.kind, message = %entry.message, "notification");
        if let Err(err) = self.store.save_history(&self.history) {
            warn!(error = %err, "notification history not saved");
        }
        Some(entry)
    }

    /// Pushes a fixed test notification, unless notifications are off.
    ///
    /// # Errors
    ///
    /// Returns an error if the history cannot be saved.
    pub fn send_test(&mut self) -> Result<Option<NotificationEntry>, SettingsError> {
        if !self.prefs.enabled {
            debug!("notifications disabled; test not sent");
            return Ok(None);
        }
        let entry = self.entry(
            NotificationKind::Test,
            "Test Notification",
            "This is a test notification!".to_string(),
            None,
        );
        self.record(entry).map(Some)
    }

    /// Marks every entry read and saves.
    ///
    /// # Errors
    ///
    /// Returns an error if the history cannot be saved.
    pub fn mark_all_read(&mut self) -> Result<(), SettingsError> {
        self.history.mark_all_read();
        self.store.save_history(&self.history)
    }

    /// Empties the history and saves.
    ///
    /// # Errors
    ///
    /// Returns an error if the history cannot be saved.
    pub fn clear(&mut self) -> Result<(), SettingsError> {
        self.history.clear();
        self.store.save_history(&self.history)
    }

    fn entry(
        &self,
        kind: NotificationKind,
        title: &str,
        message: String,
        task_id: Option<TaskId>,
    ) -> NotificationEntry {
        NotificationEntry {
            id: self.ids.generate_id(),
            kind,
            title: title.to_string(),
            message,
            task_id,
            timestamp: self.clock.now(),
            read: false,
        }
    }

    fn record(&mut self, entry: NotificationEntry) -> Result<NotificationEntry, SettingsError> {
        info!(kind = %entry.kind, message = %entry.message, "notification");
        self.history.push(entry.clone());
        self.store.save_history(&self.history)?;
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::ports::{FileSystem, FixedClock};
    use crate::settings::testing::MemoryFileSystem;
    use crate::settings::Settings;
    use crate::task::{Priority, Task, TaskStatus};
    use chrono::{FixedOffset, TimeZone};
    use std::path::{Path, PathBuf};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingIds(AtomicUsize);

    impl IdGenerator for CountingIds {
        fn generate_id(&self) -> String {
            format!("n{}", self.0.fetch_add(1, Ordering::Relaxed))
        }
    }

    fn config() -> AppConfig {
        AppConfig {
            data_dir: PathBuf::from("/data"),
            ..AppConfig::default()
        }
    }

    fn clock() -> FixedClock {
        FixedClock(
            FixedOffset::east_opt(0)
                .unwrap()
                .with_ymd_and_hms(2025, 6, 1, 9, 0, 0)
                .unwrap(),
        )
    }

    fn task(priority: Priority) -> Task {
        Task {
            id: TaskId::new("7"),
            title: "Pay rent".into(),
            description: None,
            priority,
            due_date: "2025-06-01T10:00:00Z".into(),
            status: TaskStatus::Pending,
        }
    }

    fn with_settings(settings: &Settings) -> MemoryFileSystem {
        MemoryFileSystem::default()
            .with_file("/data/settings.json", &serde_json::to_string(settings).unwrap())
    }

    #[test]
    fn reminders_follow_priority_flags() {
        let fs = MemoryFileSystem::default();
        let (clock, ids) = (clock(), CountingIds::default());
        let mut center = NotificationCenter::new(SettingsStore::new(&fs, &config()), &clock, &ids);

        let shown = center.handle(&TaskEvent::Reminder(task(Priority::High))).unwrap();
        assert_eq!(shown.message, "Reminder: \"Pay rent\" is due soon!");
        assert_eq!(shown.task_id, Some(TaskId::new("7")));
        assert_eq!(shown.id, "n0");

        assert!(center.handle(&TaskEvent::Reminder(task(Priority::Low))).is_none());
        assert_eq!(center.history().len(), 1);
        assert!(fs.contents(Path::new("/data/notifications.json")).unwrap().contains("Pay rent"));
    }

    #[test]
    fn disabled_center_drops_everything() {
        let mut settings = Settings::default();
        settings.notifications.enabled = false;
        let fs = with_settings(&settings);
        let (clock, ids) = (clock(), CountingIds::default());
        let mut center = NotificationCenter::new(SettingsStore::new(&fs, &config()), &clock, &ids);

        assert!(!center.accepts(&TaskEvent::Updated(task(Priority::High))));
        assert!(center.handle(&TaskEvent::Reminder(task(Priority::High))).is_none());
        assert!(center.send_test().unwrap().is_none());
        assert!(center.history().is_empty());
        assert!(!fs.exists(Path::new("/data/notifications.json")));
    }

    #[test]
    fn updates_ignore_priority_flags() {
        let mut settings = Settings::default();
        settings.notifications.low_priority = false;
        let fs = with_settings(&settings);
        let (clock, ids) = (clock(), CountingIds::default());
        let mut center = NotificationCenter::new(SettingsStore::new(&fs, &config()), &clock, &ids);

        let shown = center.handle(&TaskEvent::Updated(task(Priority::Low))).unwrap();
        assert_eq!(shown.kind, NotificationKind::Update);
    }

    #[test]
    fn unsaved_history_still_yields_the_entry() {
        let fs = MemoryFileSystem::default().read_only();
        let (clock, ids) = (clock(), CountingIds::default());
        let mut center = NotificationCenter::new(SettingsStore::new(&fs, &config()), &clock, &ids);

        let shown = center.handle(&TaskEvent::Reminder(task(Priority::High))).unwrap();
        assert_eq!(shown.kind, NotificationKind::Reminder);
        assert_eq!(center.history().len(), 1);
        assert!(!fs.exists(Path::new("/data/notifications.json")));
        assert!(center.send_test().is_err());
    }

    #[test]
    fn history_survives_reload_and_can_be_cleared() {
        let fs = MemoryFileSystem::default();
        let (clock, ids) = (clock(), CountingIds::default());
        {
            let mut center =
                NotificationCenter::new(SettingsStore::new(&fs, &config()), &clock, &ids);
            center.send_test().unwrap();
            center.send_test().unwrap();
        }

        let mut center = NotificationCenter::new(SettingsStore::new(&fs, &config()), &clock, &ids);
        assert_eq!(center.history().unread_count(), 2);
        center.mark_all_read().unwrap();
        assert_eq!(center.history().unread_count(), 0);
        center.clear().unwrap();

        let reloaded = NotificationCenter::new(SettingsStore::new(&fs, &config()), &clock, &ids);
        assert!(reloaded.history().is_empty());
    }
}
