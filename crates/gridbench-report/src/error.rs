//! Reporting error types.

use thiserror::Error;

/// Result type alias for reporting operations.
pub type ReportResult<T> = Result<T, ReportError>;

/// Errors producing benchmark outputs.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("output write failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid log scan pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("report serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("chart renderer failed: {0}")]
    Render(String),
}
