//! Notification centre: preference filtering and the persisted history.

mod center;
mod history;

pub use center::NotificationCenter;
pub use history::{
    format_age, NotificationEntry, NotificationHistory, NotificationKind, HISTORY_LIMIT,
};
