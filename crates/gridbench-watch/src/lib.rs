//! gridbench-watch — the poll-until-quiescent scaling watcher.
//!
//! `ScalingWatcher` drives a bounded polling loop against a
//! `SchedulerStateSource`: every tick it queries the current compute-node
//! count, pushes the raw value to a `MetricsSink`, and records transitions
//! into a `TimeSeries`. The loop has two independent exits with different
//! semantics — quiescence (the cluster scaled up and came back to zero) is
//! success, the wall-clock deadline is a benign timeout surfaced as data.
//!
//! # Watch loop
//!
//! ```text
//! seed series with Observation(now, 0)
//! loop:
//!     sleep poll_interval
//!     count = source.compute_node_count()
//!       err → log, retry next tick
//!       ok  → sink.report(now, count)        (every poll, not just transitions)
//!             series.record(now, count)
//!             quiescent? → break
//!     past deadline? → break
//! settle delay, then return WatchOutcome
//! ```

pub mod error;
pub mod watcher;

pub use error::{TransientQueryError, WatchError};
pub use watcher::{MetricsSink, ScalingWatcher, SchedulerStateSource, WatchOptions, SETTLE_DELAY};
