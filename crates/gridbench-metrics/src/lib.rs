//! gridbench-metrics — where the watch loop's observations go.
//!
//! The watcher reports every successful poll to a `MetricsSink`; this
//! crate provides the sinks. `JsonlSink` appends one JSON object per
//! observation to a file for external charting or ingestion, `MemorySink`
//! captures observations for tests, and `NullSink` discards them.
//!
//! Sinks are fire-and-forget by contract: they log their own failures
//! and never feed errors back into the watch loop.

pub mod namespace;
pub mod sink;

pub use namespace::MetricsNamespace;
pub use sink::{JsonlSink, MemorySink, MetricRecord, NullSink, SinkError};
