//! Benchmark configuration loaded from gridbench.toml.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use gridbench_sched::SchedulerKind;

/// Top-level configuration. Every section (and every field) has a
/// default, so a minimal config only names what differs from them.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct BenchConfig {
    pub cluster: ClusterConfig,
    pub scheduler: SchedulerConfig,
    pub benchmark: BenchmarkConfig,
    pub labels: LabelsConfig,
    pub output: OutputConfig,
    pub logs: LogsConfig,
    pub chart: ChartConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    /// Cluster name, used to scope the metrics namespace.
    pub name: String,
    /// Wrapper argv prepended to every scheduler command, e.g.
    /// `["ssh", "cluster-head"]`. Empty means run locally.
    pub wrapper: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub kind: SchedulerKind,
    /// Job slots per compute node; sizes sge jobs, ignored elsewhere.
    pub slots_per_node: u32,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct BenchmarkConfig {
    /// Compute-node count the submitted job must force.
    pub scaling_target: u32,
    /// How long the benchmark job itself runs.
    pub job_duration_secs: u64,
    /// Node-count poll cadence.
    pub poll_interval_secs: u64,
    /// Hard ceiling on the watch.
    pub max_duration_mins: u64,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct LabelsConfig {
    pub region: Option<String>,
    pub os: Option<String>,
    pub instance: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
    /// Report/chart base name.
    pub name: String,
    /// Metrics JSONL file; relative paths resolve under `dir`.
    pub metrics_file: PathBuf,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct LogsConfig {
    /// Cluster daemon log files scanned for error lines after the run.
    pub files: Vec<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct ChartConfig {
    /// Command receiving the chart payload on stdin and emitting image
    /// bytes on stdout. Unset: only the payload JSON is written.
    pub render_command: Option<String>,
}

// --- Default implementations ---

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            name: "local".to_string(),
            wrapper: Vec::new(),
        }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            kind: SchedulerKind::Slurm,
            slots_per_node: 1,
        }
    }
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            scaling_target: 2,
            job_duration_secs: 60,
            poll_interval_secs: 20,
            max_duration_mins: 30,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("gridbench-out"),
            name: "scaling-benchmark".to_string(),
            metrics_file: PathBuf::from("metrics.jsonl"),
        }
    }
}

impl BenchConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = toml::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    /// The metrics file path, resolved against the output directory.
    pub fn metrics_path(&self) -> PathBuf {
        if self.output.metrics_file.is_absolute() {
            self.output.metrics_file.clone()
        } else {
            self.output.dir.join(&self.output.metrics_file)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config: BenchConfig = toml::from_str("").unwrap();
        assert_eq!(config.cluster.name, "local");
        assert_eq!(config.scheduler.kind, SchedulerKind::Slurm);
        assert_eq!(config.benchmark.scaling_target, 2);
        assert_eq!(config.benchmark.poll_interval_secs, 20);
        assert!(config.logs.files.is_empty());
        assert!(config.chart.render_command.is_none());
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config: BenchConfig = toml::from_str(
            r#"
            [cluster]
            name = "perf-a"
            wrapper = ["ssh", "perf-a-head"]

            [scheduler]
            kind = "sge"
            slots_per_node = 4

            [benchmark]
            scaling_target = 8

            [logs]
            files = ["/var/log/nodewatcher", "/var/log/jobwatcher"]
            "#,
        )
        .unwrap();

        assert_eq!(config.cluster.wrapper, vec!["ssh", "perf-a-head"]);
        assert_eq!(config.scheduler.kind, SchedulerKind::Sge);
        assert_eq!(config.benchmark.scaling_target, 8);
        // Untouched field keeps its default.
        assert_eq!(config.benchmark.job_duration_secs, 60);
        assert_eq!(config.logs.files.len(), 2);
    }

    #[test]
    fn relative_metrics_file_resolves_under_output_dir() {
        let config: BenchConfig = toml::from_str(
            r#"
            [output]
            dir = "/tmp/bench"
            "#,
        )
        .unwrap();
        assert_eq!(config.metrics_path(), PathBuf::from("/tmp/bench/metrics.jsonl"));
    }

    #[test]
    fn absolute_metrics_file_is_kept() {
        let config: BenchConfig = toml::from_str(
            r#"
            [output]
            metrics_file = "/data/metrics.jsonl"
            "#,
        )
        .unwrap();
        assert_eq!(config.metrics_path(), PathBuf::from("/data/metrics.jsonl"));
    }
}
