//! Day-granularity date helpers.
//!
//! All comparisons happen in the zone carried by the reference instant, so
//! "today" means the calendar day the user is living in, not the UTC day.

use std::cmp::Ordering;

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

use crate::task::Task;

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Where a due date sits relative to today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayStatus {
    /// On a day before today.
    Overdue,
    /// Today.
    Today,
    /// On a day after today.
    Upcoming,
}

/// Parses a due date from wire or user text into `zone`.
///
/// Accepts RFC 3339, naive date-times (interpreted in `zone`), and bare
/// dates (midnight in `zone`). Returns `None` for anything else.
#[must_use]
pub fn parse_due(raw: &str, zone: &FixedOffset) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(zone));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| parse_date(raw).map(|day| day.and_time(NaiveTime::MIN)))
        .and_then(|naive| zone.from_local_datetime(&naive).single())
}

/// Parses user-entered due text; a bare date is due at noon.
#[must_use]
pub fn parse_input(raw: &str, zone: &FixedOffset) -> Option<DateTime<FixedOffset>> {
    match parse_date(raw.trim()) {
        Some(day) => {
            let noon = day.and_hms_opt(12, 0, 0)?;
            zone.from_local_datetime(&noon).single()
        }
        None => parse_due(raw, zone),
    }
}

/// Parses a `YYYY-MM-DD` calendar day.
#[must_use]
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// Calendar day of `instant` as seen from `now`'s zone.
#[must_use]
pub fn local_day(instant: &DateTime<FixedOffset>, now: &DateTime<FixedOffset>) -> NaiveDate {
    instant.with_timezone(&now.timezone()).date_naive()
}

/// Compares `due` with `now` at day granularity; time of day is ignored.
#[must_use]
pub fn day_status(due: &DateTime<FixedOffset>, now: &DateTime<FixedOffset>) -> DayStatus {
    match local_day(due, now).cmp(&now.date_naive()) {
        Ordering::Less => DayStatus::Overdue,
        Ordering::Equal => DayStatus::Today,
        Ordering::Greater => DayStatus::Upcoming,
    }
}

/// Moment-level lateness: the due instant has already passed.
///
/// Distinct from [`DayStatus::Overdue`]; a task due at 08:00 is past due at
/// 20:00 the same day while still being due today.
#[must_use]
pub fn is_past_due(due: &DateTime<FixedOffset>, now: &DateTime<FixedOffset>) -> bool {
    due < now
}

/// Returns the tasks sorted by due date; unparseable dates sort last.
#[must_use]
pub fn sort_by_due_date(tasks: &[Task], zone: &FixedOffset) -> Vec<Task> {
    let mut sorted = tasks.to_vec();
    sorted.sort_by_key(|task| {
        let due = task.due(zone);
        (due.is_none(), due)
    });
    sorted
}

/// Human label such as "Today at 3:04 PM" or "Mar 5, 2025 3:04 PM".
#[must_use]
pub fn format_due(due: &DateTime<FixedOffset>, now: &DateTime<FixedOffset>) -> String {
    let local = due.with_timezone(&now.timezone());
    let time = local.format("%-I:%M %p");
    let today = now.date_naive();
    let day = local.date_naive();

    if day == today {
        format!("Today at {time}")
    } else if today.succ_opt() == Some(day) {
        format!("Tomorrow at {time}")
    } else if today.pred_opt() == Some(day) {
        format!("Yesterday at {time}")
    } else {
        local.format("%b %-d, %Y %-I:%M %p").to_string()
    }
}

/// Coarse distance from now, e.g. "in 3 hours" or "2 days ago".
#[must_use]
pub fn format_relative(due: &DateTime<FixedOffset>, now: &DateTime<FixedOffset>) -> String {
    let delta = *due - *now;
    let magnitude = if delta < Duration::zero() { -delta } else { delta };

    let amount = if magnitude < Duration::minutes(1) {
        return "just now".to_string();
    } else if magnitude < Duration::hours(1) {
        plural(magnitude.num_minutes(), "minute")
    } else if magnitude < Duration::days(1) {
        plural(magnitude.num_hours(), "hour")
    } else {
        plural(magnitude.num_days(), "day")
    };

    if delta < Duration::zero() {
        format!("{amount} ago")
    } else {
        format!("in {amount}")
    }
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("1 {unit}")
    } else {
        format!("{count} {unit}s")
    }
}
