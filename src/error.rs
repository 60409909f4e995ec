//! Error types used across the crate, gathered in one place.
//!
//! Each layer owns its error: the task store reports [`StoreError`], input
//! checks report [`ValidationError`], the board wraps both in
//! [`BoardError`]. Command handlers turn them into display strings.

pub use crate::board::BoardError;
pub use crate::config::ConfigError;
pub use crate::ports::{FsError, StoreError};
pub use crate::settings::SettingsError;
pub use crate::task::ValidationError;
