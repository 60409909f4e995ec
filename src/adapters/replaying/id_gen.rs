//! Replaying adapter for the `IdGenerator` port.

use super::next_output;
use crate::cassette::config::SharedReplayer;
use crate::ports::IdGenerator;

/// Serves recorded IDs.
pub struct ReplayingIdGenerator {
    replayer: Option<SharedReplayer>,
}

impl ReplayingIdGenerator {
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

impl IdGenerator for ReplayingIdGenerator {
    fn generate_id(&self) -> String {
        match next_output(self.replayer.as_ref(), "id_gen", "generate_id") {
            serde_json::Value::String(id) => id,
            other => panic!("id_gen::generate_id: expected string output, got {other}"),
        }
    }
}
