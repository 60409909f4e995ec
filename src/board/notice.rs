//! User-facing outcome messages, the terminal stand-in for toasts.

use std::fmt;

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    /// The operation went through.
    Success,
    /// The operation failed; local state was restored or left untouched.
    Error,
}

/// A transient message describing the outcome of a board operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Severity.
    pub level: NoticeLevel,
    /// Text shown to the user.
    pub message: String,
    /// Whether a retry (reload) is offered.
    pub retry: bool,
}

impl Notice {
    /// A success notice.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
            retry: false,
        }
    }

    /// A failure notice offering a retry.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
            retry: true,
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.level {
            NoticeLevel::Success => write!(f, "✓ {}", self.message),
            NoticeLevel::Error if self.retry => {
                write!(f, "✗ {} (retry with `taskboard board`)", self.message)
            }
            NoticeLevel::Error => write!(f, "✗ {}", self.message),
        }
    }
}
