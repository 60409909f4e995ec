//! Board controller: owns the local task collection and runs every mutation
//! as apply-locally, call-the-store, then confirm or roll back.
//!
//! The controller is driven from a single-threaded runtime. Several
//! operations may be in flight at once (`tokio::join!` over `&self`), so the
//! state lock is only ever taken between awaits, and every rollback targets
//! the collection as it is when the failure arrives.

mod mutation;
mod notice;

pub use notice::{Notice, NoticeLevel};

use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, FixedOffset};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::classify::{self, bucket_of, Bucket, Buckets};
use crate::context::ServiceContext;
use crate::ports::{Clock, StoreError, TaskStore};
use crate::task::{describe_errors, Task, TaskDraft, TaskId, TaskPatch, ValidationError};
use mutation::{reposition, Mutation};

/// Why a board operation did not go through.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    /// Input failed validation; nothing was sent.
    #[error("invalid task: {}", describe_errors(.0))]
    Validation(Vec<ValidationError>),
    /// The id is not in the local collection.
    #[error("task {0} is not on the board")]
    UnknownTask(TaskId),
    /// The store call failed; any local change has been rolled back.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// The board was detached; the response was dropped.
    #[error("board is detached")]
    Detached,
}

/// Result of [`BoardController::move_task`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Same bucket, same position.
    Unchanged,
    /// Reordered within a bucket; local only.
    Reordered,
    /// Status change confirmed by the store.
    Persisted,
}

/// Snapshot of the board for rendering.
#[derive(Debug, Clone)]
pub struct BoardView {
    /// Instant the columns were computed for.
    pub now: DateTime<FixedOffset>,
    /// The three columns in collection order.
    pub columns: Buckets<Task>,
    /// Pending tasks due after today, which no column shows.
    pub hidden_upcoming: usize,
    /// A load is in flight.
    pub loading: bool,
    /// Last load failure, if the most recent load failed.
    pub error: Option<String>,
}

struct Messages {
    success: &'static str,
    failure: &'static str,
}

const CREATE: Messages = Messages {
    success: "Task created successfully",
    failure: "Failed to create task",
};
const UPDATE: Messages = Messages {
    success: "Task updated successfully",
    failure: "Failed to update task",
};
const DELETE: Messages = Messages {
    success: "Task deleted successfully",
    failure: "Failed to delete task",
};
const MOVE: Messages = Messages {
    success: "Task status updated",
    failure: "Failed to update task status",
};

#[derive(Default)]
struct BoardState {
    tasks: Vec<Task>,
    loading: bool,
    error: Option<String>,
    load_generation: u64,
    detached: bool,
    notices: Vec<Notice>,
}

impl BoardState {
    fn ensure_attached(&self) -> Result<(), BoardError> {
        if self.detached {
            return Err(BoardError::Detached);
        }
        Ok(())
    }

    fn position(&self, id: &TaskId) -> Option<usize> {
        self.tasks.iter().position(|task| &task.id == id)
    }

    fn replace_tasks(&mut self, tasks: Vec<Task>) {
        let mut unique: Vec<Task> = Vec::with_capacity(tasks.len());
        for task in tasks {
            if unique.iter().any(|seen| seen.id == task.id) {
                warn!(id = %task.id, "store returned duplicate task id; keeping first");
                continue;
            }
            unique.push(task);
        }
        self.tasks = unique;
    }
}

/// The local task collection plus the protocol that keeps it in step with
/// the store.
pub struct BoardController<'a> {
    store: &'a dyn TaskStore,
    clock: &'a dyn Clock,
    state: Mutex<BoardState>,
}

impl<'a> BoardController<'a> {
    /// An empty, attached board.
    pub fn new(store: &'a dyn TaskStore, clock: &'a dyn Clock) -> Self {
        Self {
            store,
            clock,
            state: Mutex::new(BoardState::default()),
        }
    }

    /// A board over the context's task store and clock.
    pub fn from_context(ctx: &'a ServiceContext) -> Self {
        Self::new(ctx.tasks.as_ref(), ctx.clock.as_ref())
    }

    fn state(&self) -> MutexGuard<'_, BoardState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fetches the full collection and replaces local state with it.
    ///
    /// Only the most recently started load may write; an older response
    /// that arrives late is discarded. On failure the previous collection
    /// stays in place.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Store`] if the fetch fails, or
    /// [`BoardError::Detached`].
    pub async fn load(&self) -> Result<(), BoardError> {
        let generation = {
            let mut state = self.state();
            state.ensure_attached()?;
            state.loading = true;
            state.load_generation += 1;
            state.load_generation
        };
        debug!(generation, "loading tasks");
        let result = self.store.list().await;

        let mut state = self.state();
        state.ensure_attached()?;
        if state.load_generation != generation {
            debug!(generation, latest = state.load_generation, "discarding superseded load");
            return Ok(());
        }
        state.loading = false;
        match result {
            Ok(tasks) => {
                state.replace_tasks(tasks);
                state.error = None;
                info!(count = state.tasks.len(), "loaded tasks");
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "failed to load tasks");
                state.error = Some(err.to_string());
                state.notices.push(Notice::failure("Failed to load tasks"));
                Err(err.into())
            }
        }
    }

    /// Reloads after a failure; same as [`BoardController::load`].
    ///
    /// # Errors
    ///
    /// See [`BoardController::load`].
    pub async fn retry(&self) -> Result<(), BoardError> {
        self.load().await
    }

    /// Validates and creates a task, appending the stored copy on success.
    ///
    /// # Errors
    ///
    /// [`BoardError::Validation`] without any store call, or
    /// [`BoardError::Store`] if the store refuses.
    pub async fn create(&self, draft: &TaskDraft) -> Result<Task, BoardError> {
        let new_task = draft
            .validate(&self.clock.now())
            .map_err(BoardError::Validation)?;
        self.state().ensure_attached()?;
        info!(title = %new_task.title, "creating task");
        let call = self.store.create(&new_task);
        self.persist(None, call, &CREATE, |tasks, created: &Task| {
            match tasks.iter_mut().find(|task| task.id == created.id) {
                Some(existing) => *existing = created.clone(),
                None => tasks.push(created.clone()),
            }
        })
        .await
    }

    /// Sends a partial update and replaces the local task with the store's copy.
    ///
    /// # Errors
    ///
    /// [`BoardError::Validation`] for an empty patch, [`BoardError::UnknownTask`]
    /// if the id is not on the board, or [`BoardError::Store`].
    pub async fn update(&self, id: &TaskId, patch: &TaskPatch) -> Result<Task, BoardError> {
        patch.validate().map_err(BoardError::Validation)?;
        {
            let state = self.state();
            state.ensure_attached()?;
            if state.position(id).is_none() {
                return Err(BoardError::UnknownTask(id.clone()));
            }
        }
        info!(%id, "updating task");
        let call = self.store.update(id, patch);
        self.persist(None, call, &UPDATE, |tasks, updated: &Task| {
            // A task deleted meanwhile is not brought back.
            if let Some(existing) = tasks.iter_mut().find(|task| &task.id == id) {
                *existing = updated.clone();
            }
        })
        .await
    }

    /// Removes a task locally, then deletes it on the store.
    ///
    /// A store that no longer knows the task counts as success. On any other
    /// failure the task is put back at its old position unless something
    /// else already restored it, and the board reloads.
    ///
    /// # Errors
    ///
    /// [`BoardError::Store`] or [`BoardError::Detached`].
    pub async fn delete(&self, id: &TaskId) -> Result<(), BoardError> {
        let mutation = {
            let mut state = self.state();
            state.ensure_attached()?;
            state.position(id).map(|index| Mutation::Remove {
                index,
                task: state.tasks.remove(index),
            })
        };
        if mutation.is_none() {
            debug!(%id, "deleting task that is not on the board");
        }
        info!(%id, "deleting task");
        let call = async {
            match self.store.delete(id).await {
                Err(err) if err.is_not_found() => {
                    debug!(%id, "task already gone from the store");
                    Ok(())
                }
                other => other,
            }
        };
        self.persist(mutation, call, &DELETE, |_, _| {}).await
    }

    /// Drags a task from `source` to position `destination_index` in
    /// `destination`.
    ///
    /// Reordering within a bucket stays local. Crossing buckets sets the
    /// destination's status locally and asks the store to persist it; a
    /// failure reverts the status and position if the status is still the
    /// one written here, then reloads. The due date is never touched, so a task dragged into
    /// "Due Today" keeps its original date.
    ///
    /// # Errors
    ///
    /// [`BoardError::UnknownTask`], [`BoardError::Store`], or
    /// [`BoardError::Detached`].
    pub async fn move_task(
        &self,
        id: &TaskId,
        source: Bucket,
        destination: Bucket,
        destination_index: usize,
    ) -> Result<MoveOutcome, BoardError> {
        let now = self.clock.now();
        let next = destination.target_status();
        let mutation = {
            let mut state = self.state();
            state.ensure_attached()?;
            let Some(position) = state.position(id) else {
                return Err(BoardError::UnknownTask(id.clone()));
            };
            let current = bucket_of(&state.tasks[position], &now);
            if current != Some(source) {
                debug!(%id, ?current, %source, "drag source differs from derived bucket");
            }
            if source == destination {
                let column = classify::classify(&state.tasks, &now);
                let index = column
                    .get(destination)
                    .iter()
                    .position(|task| &task.id == id);
                if index == Some(destination_index) {
                    return Ok(MoveOutcome::Unchanged);
                }
            }

            let previous = state.tasks[position].status;
            state.tasks[position].status = next;
            reposition(&mut state.tasks, position, destination, destination_index, &now);
            if source == destination && previous == next {
                debug!(%id, %destination, destination_index, "reordered task");
                return Ok(MoveOutcome::Reordered);
            }
            Mutation::Status {
                id: id.clone(),
                index: position,
                previous,
                next,
            }
        };

        info!(%id, %source, %destination, status = %next, "moving task");
        let call = self.store.update_status(id, next);
        self.persist(Some(mutation), call, &MOVE, |_, _: &Task| {}).await?;
        Ok(MoveOutcome::Persisted)
    }

    /// Awaits a store call and settles local state with its outcome.
    ///
    /// Nothing is written after [`BoardController::detach`]. On failure the
    /// local mutation, if any, is reverted and a reload reconciles with the
    /// store.
    async fn persist<T>(
        &self,
        mutation: Option<Mutation>,
        call: impl Future<Output = Result<T, StoreError>>,
        messages: &Messages,
        on_success: impl FnOnce(&mut Vec<Task>, &T),
    ) -> Result<T, BoardError> {
        let result = call.await;
        let (err, mutated) = {
            let mut state = self.state();
            if state.detached {
                debug!("dropping store response after detach");
                return Err(BoardError::Detached);
            }
            match result {
                Ok(value) => {
                    on_success(&mut state.tasks, &value);
                    state.notices.push(Notice::success(messages.success));
                    return Ok(value);
                }
                Err(err) => {
                    warn!(error = %err, "{}", messages.failure);
                    let mutated = mutation.is_some();
                    if let Some(mutation) = mutation {
                        mutation.revert(&mut state.tasks);
                    }
                    state.notices.push(Notice::failure(format!("{}: {err}", messages.failure)));
                    (err, mutated)
                }
            }
        };
        if mutated {
            self.reconcile().await;
        }
        Err(err.into())
    }

    async fn reconcile(&self) {
        match self.load().await {
            Ok(()) => debug!("reconciled with store"),
            Err(BoardError::Detached) => debug!("skipped reconcile after detach"),
            Err(err) => debug!(error = %err, "reconcile failed; keeping local state"),
        }
    }

    /// Stops all further state writes. Responses that arrive later are
    /// dropped and new operations fail with [`BoardError::Detached`].
    pub fn detach(&self) {
        let mut state = self.state();
        state.detached = true;
        state.loading = false;
        debug!("board detached");
    }

    /// Replaces the local copy of a task the server reports as changed.
    ///
    /// Returns `false`, leaving state untouched, when the task is not on
    /// the board or the board is detached.
    pub fn apply_remote(&self, task: &Task) -> bool {
        let mut state = self.state();
        if state.detached {
            return false;
        }
        match state.position(&task.id) {
            Some(index) => {
                state.tasks[index] = task.clone();
                true
            }
            None => {
                debug!(id = %task.id, "ignoring update for task not on the board");
                false
            }
        }
    }

    /// Columns and status flags as of the clock's current time.
    pub fn view(&self) -> BoardView {
        let now = self.clock.now();
        let state = self.state();
        let columns = classify::classify(&state.tasks, &now).map(Clone::clone);
        let hidden_upcoming = classify::upcoming(&state.tasks, &now).len();
        BoardView {
            now,
            columns,
            hidden_upcoming,
            loading: state.loading,
            error: state.error.clone(),
        }
    }

    /// Copy of the whole local collection, in order.
    pub fn tasks(&self) -> Vec<Task> {
        self.state().tasks.clone()
    }

    /// The local copy of one task.
    pub fn task(&self, id: &TaskId) -> Option<Task> {
        let state = self.state();
        state.position(id).map(|index| state.tasks[index].clone())
    }

    /// Takes the notices raised since the last call, oldest first.
    pub fn take_notices(&self) -> Vec<Notice> {
        std::mem::take(&mut self.state().notices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{FixedClock, StoreFuture};
    use crate::task::{NewTask, Priority, TaskStatus};
    use chrono::TimeZone;
    use std::collections::VecDeque;
    use tokio::sync::oneshot;

    enum Reply<T> {
        Now(Result<T, StoreError>),
        Later(oneshot::Receiver<Result<T, StoreError>>),
    }

    impl<T: Send + 'static> Reply<T> {
        fn into_future(self) -> StoreFuture<'static, T> {
            Box::pin(async move {
                match self {
                    Reply::Now(result) => result,
                    Reply::Later(gate) => {
                        gate.await.unwrap_or_else(|_| Err(StoreError::network("gate dropped")))
                    }
                }
            })
        }
    }

    /// Store double answering from per-method queues; gated replies let a
    /// test decide when each response lands.
    #[derive(Default)]
    struct ScriptedStore {
        lists: Mutex<VecDeque<Reply<Vec<Task>>>>,
        creates: Mutex<VecDeque<Reply<Task>>>,
        updates: Mutex<VecDeque<Reply<Task>>>,
        statuses: Mutex<VecDeque<Reply<Task>>>,
        deletes: Mutex<VecDeque<Reply<()>>>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedStore {
        fn next<T: Send + 'static>(
            &self,
            queue: &Mutex<VecDeque<Reply<T>>>,
            call: String,
        ) -> StoreFuture<'static, T> {
            self.calls.lock().unwrap().push(call.clone());
            let reply = queue.lock().unwrap().pop_front();
            reply.unwrap_or_else(|| panic!("no scripted reply for {call}")).into_future()
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn list(self, reply: Reply<Vec<Task>>) -> Self {
            self.lists.lock().unwrap().push_back(reply);
            self
        }

        fn status(self, reply: Reply<Task>) -> Self {
            self.statuses.lock().unwrap().push_back(reply);
            self
        }

        fn delete(self, reply: Reply<()>) -> Self {
            self.deletes.lock().unwrap().push_back(reply);
            self
        }

        fn create(self, reply: Reply<Task>) -> Self {
            self.creates.lock().unwrap().push_back(reply);
            self
        }

        fn update(self, reply: Reply<Task>) -> Self {
            self.updates.lock().unwrap().push_back(reply);
            self
        }
    }

    impl TaskStore for ScriptedStore {
        fn list(&self) -> StoreFuture<'_, Vec<Task>> {
            self.next(&self.lists, "list".into())
        }

        fn create(&self, task: &NewTask) -> StoreFuture<'_, Task> {
            self.next(&self.creates, format!("create {}", task.title))
        }

        fn update(&self, id: &TaskId, _patch: &TaskPatch) -> StoreFuture<'_, Task> {
            self.next(&self.updates, format!("update {id}"))
        }

        fn update_status(&self, id: &TaskId, status: TaskStatus) -> StoreFuture<'_, Task> {
            self.next(&self.statuses, format!("status {id} {status}"))
        }

        fn delete(&self, id: &TaskId) -> StoreFuture<'_, ()> {
            self.next(&self.deletes, format!("delete {id}"))
        }
    }

    fn clock() -> FixedClock {
        FixedClock(
            FixedOffset::east_opt(0)
                .unwrap()
                .with_ymd_and_hms(2025, 4, 10, 12, 0, 0)
                .unwrap(),
        )
    }

    fn task(id: &str, due: &str, status: TaskStatus) -> Task {
        Task {
            id: TaskId::new(id),
            title: format!("task {id}"),
            description: None,
            priority: Priority::Medium,
            due_date: due.to_string(),
            status,
        }
    }

    fn overdue(id: &str) -> Task {
        task(id, "2025-04-08T09:00:00Z", TaskStatus::Pending)
    }

    fn today(id: &str) -> Task {
        task(id, "2025-04-10T15:00:00Z", TaskStatus::Pending)
    }

    fn ids(tasks: &[Task]) -> Vec<String> {
        tasks.iter().map(|t| t.id.to_string()).collect()
    }

    fn offline() -> StoreError {
        StoreError::network("offline")
    }

    async fn loaded<'a>(store: &'a ScriptedStore, clock: &'a FixedClock) -> BoardController<'a> {
        let board = BoardController::new(store, clock);
        board.load().await.unwrap();
        board.take_notices();
        board
    }

    #[tokio::test]
    async fn load_builds_columns_and_counts_upcoming() {
        let store = ScriptedStore::default().list(Reply::Now(Ok(vec![
            overdue("o"),
            today("t"),
            task("c", "2025-04-01T09:00:00Z", TaskStatus::Completed),
            task("u", "2025-04-20T09:00:00Z", TaskStatus::Pending),
        ])));
        let clock = clock();
        let board = loaded(&store, &clock).await;

        let view = board.view();
        assert_eq!(ids(&view.columns.overdue), vec!["o"]);
        assert_eq!(ids(&view.columns.due_today), vec!["t"]);
        assert_eq!(ids(&view.columns.completed), vec!["c"]);
        assert_eq!(view.hidden_upcoming, 1);
        assert!(!view.loading);
        assert!(view.error.is_none());
    }

    #[tokio::test]
    async fn duplicate_ids_keep_first() {
        let mut second = today("a");
        second.title = "second".into();
        let store = ScriptedStore::default().list(Reply::Now(Ok(vec![today("a"), second])));
        let clock = clock();
        let board = loaded(&store, &clock).await;
        assert_eq!(board.tasks().len(), 1);
        assert_eq!(board.tasks()[0].title, "task a");
    }

    #[tokio::test]
    async fn failed_load_keeps_previous_collection() {
        let store = ScriptedStore::default()
            .list(Reply::Now(Ok(vec![today("a")])))
            .list(Reply::Now(Err(offline())));
        let clock = clock();
        let board = loaded(&store, &clock).await;

        assert!(matches!(board.load().await, Err(BoardError::Store(_))));
        let view = board.view();
        assert_eq!(ids(&view.columns.due_today), vec!["a"]);
        assert!(view.error.unwrap().contains("offline"));
        let notices = board.take_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Error);
        assert!(notices[0].retry);
    }

    #[tokio::test]
    async fn superseded_load_is_discarded() {
        let (first_tx, first_rx) = oneshot::channel();
        let store = ScriptedStore::default()
            .list(Reply::Later(first_rx))
            .list(Reply::Now(Ok(vec![today("fresh")])));
        let clock = clock();
        let board = BoardController::new(&store, &clock);

        let driver = async {
            tokio::task::yield_now().await;
            first_tx.send(Ok(vec![today("stale")])).unwrap();
        };
        let (first, second, ()) = tokio::join!(board.load(), board.load(), driver);
        first.unwrap();
        second.unwrap();
        assert_eq!(ids(&board.tasks()), vec!["fresh"]);
    }

    #[tokio::test]
    async fn create_with_blank_title_never_reaches_store() {
        let store = ScriptedStore::default().list(Reply::Now(Ok(vec![])));
        let clock = clock();
        let board = loaded(&store, &clock).await;

        let draft = TaskDraft {
            title: "   ".into(),
            priority: Some(Priority::High),
            due: Some("2025-04-10".into()),
            ..TaskDraft::default()
        };
        let err = board.create(&draft).await.unwrap_err();
        assert_eq!(err, BoardError::Validation(vec![ValidationError::MissingTitle]));
        assert_eq!(store.calls(), vec!["list"]);
    }

    #[tokio::test]
    async fn create_appends_stored_task() {
        let store = ScriptedStore::default()
            .list(Reply::Now(Ok(vec![overdue("o")])))
            .create(Reply::Now(Ok(today("new"))));
        let clock = clock();
        let board = loaded(&store, &clock).await;

        let draft = TaskDraft {
            title: "task new".into(),
            priority: Some(Priority::Medium),
            due: Some("2025-04-10 15:00".into()),
            ..TaskDraft::default()
        };
        let created = board.create(&draft).await.unwrap();
        assert_eq!(created.id, TaskId::new("new"));
        assert_eq!(ids(&board.tasks()), vec!["o", "new"]);
        assert_eq!(board.take_notices(), vec![Notice::success("Task created successfully")]);
    }

    #[tokio::test]
    async fn update_rejects_unknown_and_empty_without_store_call() {
        let store = ScriptedStore::default().list(Reply::Now(Ok(vec![today("a")])));
        let clock = clock();
        let board = loaded(&store, &clock).await;

        let patch = TaskPatch {
            title: Some("renamed".into()),
            ..TaskPatch::default()
        };
        assert_eq!(
            board.update(&TaskId::new("zzz"), &patch).await,
            Err(BoardError::UnknownTask(TaskId::new("zzz")))
        );
        assert_eq!(
            board.update(&TaskId::new("a"), &TaskPatch::default()).await,
            Err(BoardError::Validation(vec![ValidationError::EmptyPatch]))
        );
        assert_eq!(store.calls(), vec!["list"]);
    }

    #[tokio::test]
    async fn update_replaces_local_copy() {
        let mut renamed = today("a");
        renamed.title = "renamed".into();
        let store = ScriptedStore::default()
            .list(Reply::Now(Ok(vec![overdue("o"), today("a")])))
            .update(Reply::Now(Ok(renamed)));
        let clock = clock();
        let board = loaded(&store, &clock).await;

        let patch = TaskPatch {
            title: Some("renamed".into()),
            ..TaskPatch::default()
        };
        board.update(&TaskId::new("a"), &patch).await.unwrap();
        assert_eq!(board.task(&TaskId::new("a")).unwrap().title, "renamed");
        assert_eq!(ids(&board.tasks()), vec!["o", "a"]);
    }

    #[tokio::test]
    async fn failed_move_reverts_and_reloads() {
        let (status_tx, status_rx) = oneshot::channel();
        let store = ScriptedStore::default()
            .list(Reply::Now(Ok(vec![overdue("x")])))
            .status(Reply::Later(status_rx))
            .list(Reply::Now(Ok(vec![overdue("x")])));
        let clock = clock();
        let board = loaded(&store, &clock).await;
        let id = TaskId::new("x");

        let driver = async {
            tokio::task::yield_now().await;
            // Completed before the store answers.
            let view = board.view();
            assert_eq!(ids(&view.columns.completed), vec!["x"]);
            assert!(view.columns.overdue.is_empty());
            status_tx.send(Err(offline())).unwrap();
        };
        let (result, ()) =
            tokio::join!(board.move_task(&id, Bucket::Overdue, Bucket::Completed, 0), driver);
        assert!(matches!(result, Err(BoardError::Store(StoreError::Network { .. }))));
        let view = board.view();
        assert_eq!(ids(&view.columns.overdue), vec!["x"]);
        assert!(view.columns.completed.is_empty());
        assert_eq!(store.calls(), vec!["list", "status x completed", "list"]);
        let notices = board.take_notices();
        assert_eq!(notices.len(), 1);
        assert!(notices[0].message.starts_with("Failed to update task status"));
    }

    #[tokio::test]
    async fn failed_move_without_reload_restores_column_order() {
        let store = ScriptedStore::default()
            .list(Reply::Now(Ok(vec![
                overdue("a"),
                overdue("b"),
                task("c", "2025-04-01T09:00:00Z", TaskStatus::Completed),
            ])))
            .status(Reply::Now(Err(offline())))
            .list(Reply::Now(Err(offline())));
        let clock = clock();
        let board = loaded(&store, &clock).await;
        let id = TaskId::new("a");

        let result = board.move_task(&id, Bucket::Overdue, Bucket::Completed, 1).await;
        assert!(result.is_err());
        let view = board.view();
        assert_eq!(ids(&view.columns.overdue), vec!["a", "b"]);
        assert_eq!(ids(&view.columns.completed), vec!["c"]);
        assert_eq!(ids(&board.tasks()), vec!["a", "b", "c"]);
        assert_eq!(store.calls(), vec!["list", "status a completed", "list"]);
    }

    #[tokio::test]
    async fn move_into_due_today_keeps_due_date() {
        let mut done = overdue("x");
        done.status = TaskStatus::Completed;
        let store = ScriptedStore::default()
            .list(Reply::Now(Ok(vec![done])))
            .status(Reply::Now(Ok(overdue("x"))));
        let clock = clock();
        let board = loaded(&store, &clock).await;

        let outcome =
            board.move_task(&TaskId::new("x"), Bucket::Completed, Bucket::DueToday, 0).await;
        assert_eq!(outcome, Ok(MoveOutcome::Persisted));
        let moved = board.task(&TaskId::new("x")).unwrap();
        assert_eq!(moved.status, TaskStatus::Pending);
        assert_eq!(moved.due_date, "2025-04-08T09:00:00Z");
        // Still overdue by date, so it shows up there rather than in Due Today.
        assert_eq!(ids(&board.view().columns.overdue), vec!["x"]);
    }

    #[tokio::test]
    async fn same_bucket_reorder_is_local_only() {
        let store =
            ScriptedStore::default().list(Reply::Now(Ok(vec![today("a"), today("b"), today("c")])));
        let clock = clock();
        let board = loaded(&store, &clock).await;

        let unchanged =
            board.move_task(&TaskId::new("b"), Bucket::DueToday, Bucket::DueToday, 1).await;
        assert_eq!(unchanged, Ok(MoveOutcome::Unchanged));
        let reordered =
            board.move_task(&TaskId::new("c"), Bucket::DueToday, Bucket::DueToday, 0).await;
        assert_eq!(reordered, Ok(MoveOutcome::Reordered));
        assert_eq!(ids(&board.view().columns.due_today), vec!["c", "a", "b"]);
        assert_eq!(store.calls(), vec!["list"]);
    }

    #[tokio::test]
    async fn move_unknown_task_fails_without_store_call() {
        let store = ScriptedStore::default().list(Reply::Now(Ok(vec![today("a")])));
        let clock = clock();
        let board = loaded(&store, &clock).await;
        let id = TaskId::new("nope");
        let result = board.move_task(&id, Bucket::DueToday, Bucket::Completed, 0);
        assert_eq!(result.await, Err(BoardError::UnknownTask(TaskId::new("nope"))));
        assert_eq!(store.calls(), vec!["list"]);
    }

    #[tokio::test]
    async fn delete_of_missing_remote_task_succeeds() {
        let store = ScriptedStore::default()
            .list(Reply::Now(Ok(vec![today("a")])))
            .delete(Reply::Now(Err(StoreError::NotFound { id: "a".into() })));
        let clock = clock();
        let board = loaded(&store, &clock).await;
        board.delete(&TaskId::new("a")).await.unwrap();
        assert!(board.tasks().is_empty());
    }

    #[tokio::test]
    async fn failed_delete_restores_position() {
        let store = ScriptedStore::default()
            .list(Reply::Now(Ok(vec![today("a"), today("b"), today("c")])))
            .delete(Reply::Now(Err(offline())))
            .list(Reply::Now(Err(offline())));
        let clock = clock();
        let board = loaded(&store, &clock).await;
        assert!(board.delete(&TaskId::new("b")).await.is_err());
        assert_eq!(ids(&board.tasks()), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn delete_of_absent_id_still_asks_store() {
        let store = ScriptedStore::default()
            .list(Reply::Now(Ok(vec![today("a")])))
            .delete(Reply::Now(Ok(())));
        let clock = clock();
        let board = loaded(&store, &clock).await;
        board.delete(&TaskId::new("ghost")).await.unwrap();
        assert_eq!(ids(&board.tasks()), vec!["a"]);
        assert_eq!(store.calls(), vec!["list", "delete ghost"]);
    }

    #[tokio::test]
    async fn rollback_does_not_resurrect_task_deleted_meanwhile() {
        let (status_tx, status_rx) = oneshot::channel();
        let (delete_tx, delete_rx) = oneshot::channel();
        let store = ScriptedStore::default()
            .list(Reply::Now(Ok(vec![overdue("x"), today("y")])))
            .status(Reply::Later(status_rx))
            .delete(Reply::Later(delete_rx))
            .list(Reply::Now(Err(offline())));
        let clock = clock();
        let board = loaded(&store, &clock).await;
        let id = TaskId::new("x");

        let driver = async {
            tokio::task::yield_now().await;
            delete_tx.send(Ok(())).unwrap();
            tokio::task::yield_now().await;
            tokio::task::yield_now().await;
            status_tx.send(Err(offline())).unwrap();
        };
        let (moved, deleted, ()) = tokio::join!(
            board.move_task(&id, Bucket::Overdue, Bucket::Completed, 0),
            board.delete(&id),
            driver
        );
        assert!(moved.is_err());
        deleted.unwrap();
        assert_eq!(ids(&board.tasks()), vec!["y"]);
    }

    #[tokio::test]
    async fn rollback_applies_to_current_collection() {
        let (status_tx, status_rx) = oneshot::channel();
        let mut created = today("new");
        created.title = "created meanwhile".into();
        let store = ScriptedStore::default()
            .list(Reply::Now(Ok(vec![overdue("x")])))
            .status(Reply::Later(status_rx))
            .create(Reply::Now(Ok(created)))
            .list(Reply::Now(Err(offline())));
        let clock = clock();
        let board = loaded(&store, &clock).await;

        let draft = TaskDraft {
            title: "created meanwhile".into(),
            priority: Some(Priority::Low),
            due: Some("2025-04-10".into()),
            ..TaskDraft::default()
        };
        let id = TaskId::new("x");
        let driver = async {
            tokio::task::yield_now().await;
            tokio::task::yield_now().await;
            status_tx.send(Err(offline())).unwrap();
        };
        let (moved, created, ()) = tokio::join!(
            board.move_task(&id, Bucket::Overdue, Bucket::Completed, 0),
            board.create(&draft),
            driver
        );
        assert!(moved.is_err());
        created.unwrap();
        let tasks = board.tasks();
        assert_eq!(ids(&tasks), vec!["x", "new"]);
        assert_eq!(tasks[0].status, TaskStatus::Pending);
    }

    #[tokio::test]
    async fn detached_board_ignores_late_responses() {
        let (status_tx, status_rx) = oneshot::channel();
        let store = ScriptedStore::default()
            .list(Reply::Now(Ok(vec![overdue("x")])))
            .status(Reply::Later(status_rx));
        let clock = clock();
        let board = loaded(&store, &clock).await;

        let id = TaskId::new("x");
        let driver = async {
            tokio::task::yield_now().await;
            board.detach();
            status_tx.send(Err(offline())).unwrap();
        };
        let (moved, ()) =
            tokio::join!(board.move_task(&id, Bucket::Overdue, Bucket::Completed, 0), driver);
        assert_eq!(moved, Err(BoardError::Detached));
        // Optimistic state stays; no rollback and no reload after detach.
        assert_eq!(board.tasks()[0].status, TaskStatus::Completed);
        assert!(board.take_notices().is_empty());
        assert_eq!(board.load().await, Err(BoardError::Detached));
        assert_eq!(store.calls(), vec!["list", "status x completed"]);
    }

    #[tokio::test]
    async fn remote_update_only_touches_known_tasks() {
        let store = ScriptedStore::default().list(Reply::Now(Ok(vec![today("a")])));
        let clock = clock();
        let board = loaded(&store, &clock).await;

        let done = task("a", "2025-04-10T15:00:00Z", TaskStatus::Completed);
        assert!(board.apply_remote(&done));
        assert_eq!(ids(&board.view().columns.completed), vec!["a"]);

        assert!(!board.apply_remote(&today("ghost")));
        assert_eq!(board.tasks().len(), 1);

        board.detach();
        assert!(!board.apply_remote(&today("a")));
        assert!(board.task(&TaskId::new("a")).unwrap().is_completed());
    }
}
