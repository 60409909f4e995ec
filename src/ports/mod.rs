//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the board core and an external
//! system (time, local disk, task store, insights service, push channel,
//! IDs). Implementations live in `src/adapters/`.

pub mod clock;
pub mod filesystem;
pub mod id_gen;
pub mod insights;
pub mod notifications;
pub mod task_store;

pub use clock::{Clock, FixedClock};
pub use filesystem::{FileSystem, FsError};
pub use id_gen::IdGenerator;
pub use insights::{Insights, InsightsClient, InsightsFuture, Suggestion, TaskSummary};
pub use notifications::{NotificationSource, Subscription, TaskEvent};
pub use task_store::{StoreError, StoreFuture, TaskStore};
