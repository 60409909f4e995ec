//! Replaying adapter for the `FileSystem` port.

use std::path::Path;

use super::{next_output, replay_result};
use crate::cassette::config::SharedReplayer;
use crate::ports::{FileSystem, FsError};

/// Serves recorded filesystem results.
pub struct ReplayingFileSystem {
    replayer: Option<SharedReplayer>,
}

impl ReplayingFileSystem {
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

impl FileSystem for ReplayingFileSystem {
    fn read_to_string(&self, _path: &Path) -> Result<String, FsError> {
        replay_result(next_output(self.replayer.as_ref(), "fs", "read_to_string"))
    }

    fn write(&self, _path: &Path, _contents: &str) -> Result<(), FsError> {
        replay_result(next_output(self.replayer.as_ref(), "fs", "write"))
    }

    fn exists(&self, _path: &Path) -> bool {
        next_output(self.replayer.as_ref(), "fs", "exists").as_bool().unwrap_or(false)
    }
}
