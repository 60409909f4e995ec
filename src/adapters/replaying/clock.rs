//! Replaying adapter for the `Clock` port.

use chrono::{DateTime, FixedOffset};

use super::next_output;
use crate::cassette::config::SharedReplayer;
use crate::ports::Clock;

/// Serves recorded instants.
pub struct ReplayingClock {
    replayer: Option<SharedReplayer>,
}

impl ReplayingClock {
    /// Backed by `replayer`.
    #[must_use]
    pub fn new(replayer: SharedReplayer) -> Self {
        Self {
            replayer: Some(replayer),
        }
    }

    /// No cassette; panics when called.
    #[must_use]
    pub fn unconfigured() -> Self {
        Self { replayer: None }
    }
}

impl Clock for ReplayingClock {
    fn now(&self) -> DateTime<FixedOffset> {
        let output = next_output(self.replayer.as_ref(), "clock", "now");
        serde_json::from_value(output)
            .unwrap_or_else(|e| panic!("clock::now: recorded value is not a timestamp: {e}"))
    }
}
