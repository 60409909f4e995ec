//! Clock port for obtaining the current time.

use chrono::{DateTime, FixedOffset};

/// Provides the current time together with the user's UTC offset.
///
/// Day-level bucketing depends on which calendar day "now" falls on, so the
/// offset travels with the instant instead of being looked up separately.
pub trait Clock: Send + Sync {
    /// Returns the current local time.
    fn now(&self) -> DateTime<FixedOffset>;
}

/// Clock pinned to a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<FixedOffset>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}
