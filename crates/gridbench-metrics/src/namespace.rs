//! Hierarchical metric namespaces.

use std::fmt;

use serde::Serialize;

/// A slash-delimited namespace scoping published observations, so runs
/// against different clusters (or the same cluster on different days)
/// land in distinct series on the charting side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MetricsNamespace(String);

impl MetricsNamespace {
    /// Cluster-scoped benchmarking namespace:
    /// `gridbench/benchmarking/<cluster>`.
    pub fn benchmarking(cluster_name: &str) -> Self {
        Self(format!("gridbench/benchmarking/{cluster_name}"))
    }

    /// Fully scoped namespace for suite-level comparisons:
    /// `gridbench/benchmarking/<suite>/<region>/<instance>/<os>/<scheduler>`.
    pub fn suite_scoped(
        suite: &str,
        region: &str,
        instance: &str,
        os: &str,
        scheduler: &str,
    ) -> Self {
        Self(format!(
            "gridbench/benchmarking/{suite}/{region}/{instance}/{os}/{scheduler}"
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MetricsNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
