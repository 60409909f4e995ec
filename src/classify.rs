//! Task classification into the board's three date-bucketed columns.
//!
//! Precedence, first match wins:
//!
//! 1. completed tasks go to [`Bucket::Completed`] whatever their due date;
//! 2. pending tasks due on a day before today go to [`Bucket::Overdue`];
//! 3. pending tasks due today go to [`Bucket::DueToday`].
//!
//! Pending tasks due after today, and pending tasks whose due date cannot
//! be parsed, land in no bucket. Bucket membership is never stored; it is
//! recomputed from `(tasks, now)` on every pass.

use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dates::{self, DayStatus};
use crate::task::{Task, TaskStatus};

/// One of the three board columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Bucket {
    /// Pending tasks due today.
    DueToday,
    /// Completed tasks.
    Completed,
    /// Pending tasks due before today.
    Overdue,
}

impl Bucket {
    /// All buckets in column order.
    pub const ALL: [Bucket; 3] = [Bucket::DueToday, Bucket::Completed, Bucket::Overdue];

    /// Stable key used by drag sources and targets.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::DueToday => "due-today",
            Self::Completed => "completed",
            Self::Overdue => "overdue",
        }
    }

    /// Looks a bucket up by its key.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|bucket| bucket.key() == key)
    }

    /// Column heading.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::DueToday => "Due Today",
            Self::Completed => "Completed",
            Self::Overdue => "Overdue",
        }
    }

    /// Status a task takes when dropped into this bucket.
    #[must_use]
    pub fn target_status(self) -> TaskStatus {
        match self {
            Self::Completed => TaskStatus::Completed,
            Self::DueToday | Self::Overdue => TaskStatus::Pending,
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl std::str::FromStr for Bucket {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_key(s.trim()).ok_or_else(|| {
            format!("unknown bucket '{s}' (expected due-today, completed or overdue)")
        })
    }
}

/// Per-bucket contents in collection order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buckets<T> {
    /// Pending tasks due today.
    pub due_today: Vec<T>,
    /// Completed tasks.
    pub completed: Vec<T>,
    /// Pending tasks due before today.
    pub overdue: Vec<T>,
}

impl<T> Default for Buckets<T> {
    fn default() -> Self {
        Self {
            due_today: Vec::new(),
            completed: Vec::new(),
            overdue: Vec::new(),
        }
    }
}

impl<T> Buckets<T> {
    /// Contents of one bucket.
    #[must_use]
    pub fn get(&self, bucket: Bucket) -> &[T] {
        match bucket {
            Bucket::DueToday => &self.due_today,
            Bucket::Completed => &self.completed,
            Bucket::Overdue => &self.overdue,
        }
    }

    fn get_mut(&mut self, bucket: Bucket) -> &mut Vec<T> {
        match bucket {
            Bucket::DueToday => &mut self.due_today,
            Bucket::Completed => &mut self.completed,
            Bucket::Overdue => &mut self.overdue,
        }
    }

    /// Iterates buckets in column order.
    pub fn iter(&self) -> impl Iterator<Item = (Bucket, &[T])> {
        Bucket::ALL.into_iter().map(move |bucket| (bucket, self.get(bucket)))
    }

    /// Total number of bucketed items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.due_today.len() + self.completed.len() + self.overdue.len()
    }

    /// Returns `true` when every bucket is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maps every item, keeping bucket and order.
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Buckets<U> {
        Buckets {
            due_today: self.due_today.into_iter().map(&mut f).collect(),
            completed: self.completed.into_iter().map(&mut f).collect(),
            overdue: self.overdue.into_iter().map(&mut f).collect(),
        }
    }
}

/// Bucket of a single task at `now`, if any.
#[must_use]
pub fn bucket_of(task: &Task, now: &DateTime<FixedOffset>) -> Option<Bucket> {
    if task.status == TaskStatus::Completed {
        return Some(Bucket::Completed);
    }
    let Some(due) = task.due(&now.timezone()) else {
        debug!(id = %task.id, due_date = %task.due_date, "skipping task with unparseable due date");
        return None;
    };
    match dates::day_status(&due, now) {
        DayStatus::Overdue => Some(Bucket::Overdue),
        DayStatus::Today => Some(Bucket::DueToday),
        DayStatus::Upcoming => None,
    }
}

/// Partitions `tasks` into the three buckets, preserving input order.
#[must_use]
pub fn classify<'a>(tasks: &'a [Task], now: &DateTime<FixedOffset>) -> Buckets<&'a Task> {
    let mut buckets = Buckets::default();
    for task in tasks {
        if let Some(bucket) = bucket_of(task, now) {
            buckets.get_mut(bucket).push(task);
        }
    }
    buckets
}

/// Pending tasks due after today, soonest first. These are the tasks the
/// three-column board leaves out.
#[must_use]
pub fn upcoming(tasks: &[Task], now: &DateTime<FixedOffset>) -> Vec<Task> {
    let zone = now.timezone();
    let later: Vec<Task> = tasks
        .iter()
        .filter(|task| !task.is_completed())
        .filter(|task| {
            task.due(&zone)
                .is_some_and(|due| dates::day_status(&due, now) == DayStatus::Upcoming)
        })
        .cloned()
        .collect();
    dates::sort_by_due_date(&later, &zone)
}

/// Tasks due on `day` in `now`'s zone, in collection order, any status.
#[must_use]
pub fn tasks_on_day<'a>(
    tasks: &'a [Task],
    day: NaiveDate,
    now: &DateTime<FixedOffset>,
) -> Vec<&'a Task> {
    let zone = now.timezone();
    tasks
        .iter()
        .filter(|task| {
            task.due(&zone)
                .is_some_and(|due| dates::local_day(&due, now) == day)
        })
        .collect()
}
