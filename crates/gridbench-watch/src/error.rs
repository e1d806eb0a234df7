//! Watcher error types.

use std::time::Duration;

use thiserror::Error;

/// A transient fault while querying the scheduler state source.
///
/// These are I/O-grade failures (connection drop, command failure, API
/// throttle) that are safe to retry: the watch loop logs them and polls
/// again on the next tick. They never terminate a watch.
#[derive(Debug, Clone, Error)]
#[error("transient scheduler query failure: {0}")]
pub struct TransientQueryError(String);

impl TransientQueryError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

/// Errors constructing a watcher. These are caller bugs, not runtime
/// faults: a running watch never returns an error.
#[derive(Debug, Error)]
pub enum WatchError {
    #[error("poll interval must be greater than zero")]
    ZeroPollInterval,

    #[error("max duration {max:?} is shorter than the poll interval {poll:?}")]
    DeadlineBeforeFirstPoll { poll: Duration, max: Duration },
}
