//! gridbench-series — the transition time series behind a scaling watch.
//!
//! A watch over a scaling cluster produces a stream of node-count polls.
//! Storing every poll is noise; what matters is when the count *changes*.
//! `TimeSeries` is the run-length-compressed form of that stream: seeded
//! with a zero baseline, it appends an `Observation` only when the polled
//! count differs from the last recorded one.
//!
//! # Architecture
//!
//! ```text
//! poll stream   0 0 3 3 3 0 0
//! TimeSeries    0   3     0      (baseline + transitions only)
//! WatchOutcome  { series, ended_by: Quiescent | TimedOut, end_time }
//! ```

pub mod series;

pub use series::{epoch_secs, EndReason, Observation, TimeSeries, WatchOutcome};
