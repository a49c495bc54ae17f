//! Error types for the register and input planes.
//!
//! Every failure here is a recoverable value returned to the calling
//! tool; nothing is fatal to the session. There is no auto-fix path for
//! a blocked or stale financial value.

use thiserror::Error;

/// Failures of register store operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegisterError {
    #[error("register '{0}' has never been set; run the prerequisite step first")]
    NotFound(String),

    #[error("register '{key}' has no value at '{path}' (missing segment '{segment}')")]
    PathNotFound {
        key: String,
        path: String,
        segment: String,
    },

    #[error("register '{key}' may only be written by '{required_writer}'; use that tool instead of '{attempted}'")]
    Blocked {
        key: String,
        required_writer: String,
        attempted: String,
    },

    #[error("'{0}' is an intrinsic register and cannot be written")]
    ReservedKey(String),
}

/// Guarded-input validation failures, raised before a tool body executes.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("field '{0}' supplies both a register reference and a literal value; choose exactly one")]
    Ambiguous(String),

    #[error("field '{0}' supplies neither a register reference nor a literal value")]
    Missing(String),
}
