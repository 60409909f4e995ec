//! Filesystem port backing the locally persisted settings and history.

use std::error::Error;
use std::path::Path;

/// Boxed error type shared by the filesystem port.
pub type FsError = Box<dyn Error + Send + Sync>;

/// Key-value style document storage on the local disk.
///
/// Settings and notification history are small JSON documents; routing
/// them through this trait lets tests seed state in memory.
pub trait FileSystem: Send + Sync {
    /// Reads the entire contents of a file as a UTF-8 string.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or is not valid UTF-8.
    fn read_to_string(&self, path: &Path) -> Result<String, FsError>;

    /// Writes the given contents to a file, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails (permissions, disk full, etc.).
    fn write(&self, path: &Path, contents: &str) -> Result<(), FsError>;

    /// Returns `true` if the path exists.
    fn exists(&self, path: &Path) -> bool;
}
