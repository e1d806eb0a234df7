//! Benchmark report assembly and output.

use std::path::{Path, PathBuf};

use chrono::DateTime;
use serde::Serialize;
use tracing::info;

use gridbench_series::{EndReason, TimeSeries};

use crate::chart::sanitize;
use crate::error::ReportResult;
use crate::logscan::LogFinding;
use crate::verdict::ScalingVerdict;

/// Render an epoch-seconds timestamp as RFC 3339 / ISO-8601 UTC.
pub fn iso8601(epoch: u64) -> String {
    DateTime::from_timestamp(epoch as i64, 0)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_default()
}

/// The knobs a run was performed with, echoed into the report (and the
/// chart title) so results stay interpretable after the cluster is gone.
#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkParams {
    pub scheduler: String,
    pub scaling_target: u32,
    pub job_duration_secs: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub os: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
}

impl BenchmarkParams {
    /// `key=value` pairs joined for chart titles.
    pub fn title(&self) -> String {
        let mut parts = vec![
            format!("scheduler={}", self.scheduler),
            format!("scaling_target={}", self.scaling_target),
            format!("job_duration={}s", self.job_duration_secs),
        ];
        if let Some(region) = &self.region {
            parts.push(format!("region={region}"));
        }
        if let Some(os) = &self.os {
            parts.push(format!("os={os}"));
        }
        if let Some(instance) = &self.instance {
            parts.push(format!("instance={instance}"));
        }
        parts.join(", ")
    }
}

/// Everything a run produced, serialized to the output directory.
#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkReport {
    pub params: BenchmarkParams,
    pub ended_by: EndReason,
    /// Wall-clock seconds from submission to watch-loop exit.
    pub total_time_secs: u64,
    pub series: TimeSeries,
    pub verdict: ScalingVerdict,
    pub log_findings: Vec<LogFinding>,
}

/// Write the report as pretty JSON under `<outdir>/benchmarks/<name>.json`.
pub fn write_report(outdir: &Path, name: &str, report: &BenchmarkReport) -> ReportResult<PathBuf> {
    let dir = outdir.join("benchmarks");
    std::fs::create_dir_all(&dir)?;
    let path = dir.join(format!("{}.json", sanitize(name)));
    let encoded = serde_json::to_vec_pretty(report)?;
    std::fs::write(&path, encoded)?;
    info!(path = %path.display(), "benchmark report written");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> BenchmarkReport {
        let mut series = TimeSeries::seeded(1_700_000_000);
        series.record(1_700_000_020, 4);
        series.record(1_700_000_200, 0);
        let verdict = ScalingVerdict::evaluate(&series, 4);
        BenchmarkReport {
            params: BenchmarkParams {
                scheduler: "slurm".to_string(),
                scaling_target: 4,
                job_duration_secs: 60,
                region: Some("eu-west-1".to_string()),
                os: None,
                instance: None,
            },
            ended_by: EndReason::Quiescent,
            total_time_secs: 200,
            series,
            verdict,
            log_findings: Vec::new(),
        }
    }

    #[test]
    fn iso8601_renders_utc() {
        assert_eq!(iso8601(0), "1970-01-01T00:00:00+00:00");
        assert_eq!(iso8601(1_700_000_000), "2023-11-14T22:13:20+00:00");
    }

    #[test]
    fn title_includes_only_present_labels() {
        let report = sample_report();
        let title = report.params.title();
        assert!(title.contains("scheduler=slurm"));
        assert!(title.contains("region=eu-west-1"));
        assert!(!title.contains("os="));
    }

    #[test]
    fn write_report_produces_parseable_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_report(dir.path(), "scaling::slurm", &sample_report()).unwrap();

        assert!(path.ends_with("benchmarks/scaling--slurm.json"));
        let value: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(value["ended_by"], "quiescent");
        assert_eq!(value["verdict"]["passed"], true);
        assert_eq!(value["series"]["entries"].as_array().unwrap().len(), 3);
    }
}
