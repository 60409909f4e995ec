//! Live adapters for real external interactions.

pub mod clock;
pub mod filesystem;
pub mod http;
pub mod id_gen;
pub mod insights;
pub mod notifications;
pub mod task_store;

pub use clock::LiveClock;
pub use filesystem::LiveFileSystem;
pub use id_gen::LiveIdGenerator;
pub use insights::HttpInsightsClient;
pub use notifications::HttpNotificationSource;
pub use task_store::HttpTaskStore;
