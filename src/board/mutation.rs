//! Local mutations applied ahead of store confirmation.

use tracing::debug;

use crate::classify::{bucket_of, Bucket};
use crate::task::{Task, TaskId, TaskStatus};
use chrono::{DateTime, FixedOffset};

/// A local change that may need to be undone when the store refuses it.
///
/// Reverts always run against the collection as it is at failure time,
/// never against a snapshot taken when the operation started.
#[derive(Debug, Clone)]
pub(super) enum Mutation {
    /// A task's status was switched and the task moved within the collection.
    Status {
        /// Task that changed.
        id: TaskId,
        /// Position it occupied before the move.
        index: usize,
        /// Status before the change.
        previous: TaskStatus,
        /// Status written optimistically.
        next: TaskStatus,
    },
    /// A task was removed from the collection.
    Remove {
        /// Position it occupied.
        index: usize,
        /// The removed task.
        task: Task,
    },
}

impl Mutation {
    /// Undoes the change if it is still in effect. Returns `true` if anything changed.
    ///
    /// A status revert is skipped when the task is gone or already carries a
    /// different status; otherwise the task also returns to its old position,
    /// clamped to the current length. A removal is only undone if the id is
    /// absent.
    pub(super) fn revert(self, tasks: &mut Vec<Task>) -> bool {
        match self {
            Self::Status { id, index, previous, next } => {
                match tasks.iter().position(|task| task.id == id) {
                    Some(position) if tasks[position].status == next => {
                        let mut task = tasks.remove(position);
                        task.status = previous;
                        tasks.insert(index.min(tasks.len()), task);
                        true
                    }
                    Some(_) => {
                        debug!(%id, "status changed meanwhile; leaving it for the reload");
                        false
                    }
                    None => {
                        debug!(%id, "task vanished before rollback");
                        false
                    }
                }
            }
            Self::Remove { index, task } => {
                if tasks.iter().any(|existing| existing.id == task.id) {
                    return false;
                }
                let at = index.min(tasks.len());
                tasks.insert(at, task);
                true
            }
        }
    }
}

/// Moves the task at `from` so that it sits at `index` within `bucket`.
///
/// The position is computed among the bucket's other members after the
/// move; an index past the end places the task after the bucket's last
/// member, or at the end of the collection if the bucket is empty.
pub(super) fn reposition(
    tasks: &mut Vec<Task>,
    from: usize,
    bucket: Bucket,
    index: usize,
    now: &DateTime<FixedOffset>,
) {
    let task = tasks.remove(from);
    let members: Vec<usize> = tasks
        .iter()
        .enumerate()
        .filter(|(_, other)| bucket_of(other, now) == Some(bucket))
        .map(|(position, _)| position)
        .collect();
    let at = match members.get(index) {
        Some(&position) => position,
        None => members.last().map_or(tasks.len(), |&last| last + 1),
    };
    tasks.insert(at, task);
}
