//! MetricsSink implementations.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use gridbench_watch::MetricsSink;

use crate::namespace::MetricsNamespace;

/// Metric name under which node-count observations are published.
pub const NODE_COUNT_METRIC: &str = "ComputeNodeCount";

/// Errors creating a sink. Once created, a sink never fails its caller:
/// write errors are logged and swallowed per the fire-and-forget contract.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to open metrics file: {0}")]
    Open(#[from] std::io::Error),
}

/// One published observation, as serialized to the metrics file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricRecord {
    pub namespace: String,
    pub metric: String,
    pub timestamp: u64,
    pub value: u32,
    pub unit: String,
}

/// Discards every observation.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl MetricsSink for NullSink {
    async fn report(&mut self, _timestamp: u64, _count: u32) {}
}

/// Captures observations in memory. Exported for tests in downstream
/// crates that need to assert on what the watcher reported.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Vec<(u64, u32)>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[(u64, u32)] {
        &self.records
    }
}

impl MetricsSink for MemorySink {
    async fn report(&mut self, timestamp: u64, count: u32) {
        self.records.push((timestamp, count));
    }
}

/// Appends one JSON object per observation to a file.
///
/// The format is line-delimited JSON ([`MetricRecord`]) so external
/// tooling can tail, ingest, or chart the stream without coordination.
#[derive(Debug)]
pub struct JsonlSink {
    namespace: MetricsNamespace,
    file: File,
}

impl JsonlSink {
    /// Create (or append to) the metrics file at `path`.
    pub fn create(path: &Path, namespace: MetricsNamespace) -> Result<Self, SinkError> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self { namespace, file })
    }
}

impl MetricsSink for JsonlSink {
    async fn report(&mut self, timestamp: u64, count: u32) {
        let record = MetricRecord {
            namespace: self.namespace.to_string(),
            metric: NODE_COUNT_METRIC.to_string(),
            timestamp,
            value: count,
            unit: "Count".to_string(),
        };
        let line = match serde_json::to_string(&record) {
            Ok(line) => line,
            Err(e) => {
                warn!(error = %e, "failed to encode metric record");
                return;
            }
        };
        if let Err(e) = writeln!(self.file, "{line}") {
            warn!(error = %e, "failed to append metric record");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_sink_captures_reports() {
        let mut sink = MemorySink::new();
        sink.report(100, 0).await;
        sink.report(120, 3).await;
        assert_eq!(sink.records(), &[(100, 0), (120, 3)]);
    }

    #[tokio::test]
    async fn jsonl_sink_writes_one_record_per_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metrics.jsonl");
        let namespace = MetricsNamespace::benchmarking("test-cluster");

        let mut sink = JsonlSink::create(&path, namespace).unwrap();
        sink.report(1000, 0).await;
        sink.report(1020, 4).await;
        drop(sink);

        let content = std::fs::read_to_string(&path).unwrap();
        let records: Vec<MetricRecord> = content
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].namespace, "gridbench/benchmarking/test-cluster");
        assert_eq!(records[0].metric, NODE_COUNT_METRIC);
        assert_eq!(records[1].value, 4);
        assert_eq!(records[1].unit, "Count");
    }

    #[tokio::test]
    async fn jsonl_sink_appends_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metrics.jsonl");
        let namespace = MetricsNamespace::benchmarking("test-cluster");

        let mut sink = JsonlSink::create(&path, namespace.clone()).unwrap();
        sink.report(1000, 1).await;
        drop(sink);

        let mut sink = JsonlSink::create(&path, namespace).unwrap();
        sink.report(1010, 0).await;
        drop(sink);

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
    }

    #[test]
    fn create_fails_for_unwritable_path() {
        let namespace = MetricsNamespace::benchmarking("test-cluster");
        let err =
            JsonlSink::create(Path::new("/no/such/dir/metrics.jsonl"), namespace).unwrap_err();
        assert!(matches!(err, SinkError::Open(_)));
    }
}
