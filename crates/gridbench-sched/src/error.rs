//! Scheduler command error types.

use thiserror::Error;

/// Result type alias for scheduler command operations.
pub type SchedResult<T> = Result<T, SchedError>;

/// Errors from the command execution seam.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to run command: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur while driving a scheduler.
#[derive(Debug, Error)]
pub enum SchedError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("command `{command}` exited with status {code}: {stderr}")]
    CommandFailed {
        command: String,
        code: i32,
        stderr: String,
    },

    #[error("unrecognized submit output: {0:?}")]
    UnparseableSubmit(String),

    #[error("unrecognized node listing: {0}")]
    UnparseableCount(String),
}
