//! Error types for the session core.
//!
//! The session contract itself has no recoverable errors: illegal calls are
//! no-ops.  What remains is configuration loading, command parsing, and the
//! timer coordinator's internal consistency check.

use thiserror::Error;

use crate::timers::TimerKind;

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Errors from loading, parsing, or validating a [`SessionConfig`](crate::config::SessionConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading or writing the backing file failed.
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The stored document is not valid JSON for this schema.
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
    /// A field failed range validation.
    /// The `&'static str` describes which field and why.
    #[error("validation failed: {0}")]
    ValidationFailed(&'static str),
}

// ---------------------------------------------------------------------------
// Timer coordinator errors
// ---------------------------------------------------------------------------

/// Raised when the controller asks for a timer slot that is already taken.
///
/// Unreachable through the public controller contract; seeing one means the
/// state table and the timer slots disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TimerError {
    #[error("{0} timer is already armed")]
    AlreadyArmed(TimerKind),
}

// ---------------------------------------------------------------------------
// Command parsing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandParseError {
    #[error("empty command")]
    Empty,
    #[error("unknown command: {0}")]
    Unknown(String),
}
