//! Chart payload construction and the rendering seam.
//!
//! gridbench never draws pixels. It builds a chart descriptor (the
//! series, the target annotation, the run window) and hands it to a
//! `ChartRenderer` — typically an external command that turns the
//! descriptor into an image.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use serde_json::{json, Value};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use gridbench_series::TimeSeries;

use crate::error::{ReportError, ReportResult};
use crate::report::iso8601;

/// Padding applied on both sides of the run window in the chart.
const GRAPH_MARGIN_SECS: u64 = 120;

const CHART_WIDTH: u32 = 1400;
const CHART_HEIGHT: u32 = 700;

/// Labeling and window parameters for a chart payload.
#[derive(Debug, Clone)]
pub struct ChartParams {
    pub title: String,
    pub namespace: String,
    pub target: u32,
    /// Unix timestamp (seconds) the benchmark started.
    pub start_time: u64,
    /// Unix timestamp (seconds) the watch loop exited.
    pub end_time: u64,
}

/// Build the time-series chart descriptor for a collected series.
pub fn chart_payload(series: &TimeSeries, params: &ChartParams) -> Value {
    let datapoints: Vec<Value> = series
        .observations()
        .iter()
        .map(|o| json!([o.timestamp, o.count]))
        .collect();

    json!({
        "title": params.title,
        "view": "timeSeries",
        "namespace": params.namespace,
        "metric": "ComputeNodeCount",
        "series": datapoints,
        "start": iso8601(params.start_time.saturating_sub(GRAPH_MARGIN_SECS)),
        "end": iso8601(params.end_time + GRAPH_MARGIN_SECS),
        "annotations": {
            "horizontal": [
                { "label": "Scaling Target", "value": params.target }
            ],
            "vertical": [
                { "label": "Start Time", "value": iso8601(params.start_time) },
                { "label": "End Time", "value": iso8601(params.end_time) }
            ]
        },
        "y_axis": { "label": "Count" },
        "width": CHART_WIDTH,
        "height": CHART_HEIGHT,
    })
}

/// Turns a chart payload into image bytes.
#[allow(async_fn_in_trait)]
pub trait ChartRenderer {
    async fn render(&mut self, payload: &Value) -> ReportResult<Vec<u8>>;
}

/// Pipes the payload into a user-configured command and captures the
/// rendered image from its stdout.
#[derive(Debug, Clone)]
pub struct CommandRenderer {
    command: String,
}

impl CommandRenderer {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl ChartRenderer for CommandRenderer {
    async fn render(&mut self, payload: &Value) -> ReportResult<Vec<u8>> {
        let mut child = Command::new("sh")
            .args(["-c", &self.command])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| ReportError::Render("renderer stdin unavailable".to_string()))?;
        let encoded = serde_json::to_vec(payload)?;
        stdin.write_all(&encoded).await?;
        drop(stdin);

        let output = child.wait_with_output().await?;
        if !output.status.success() {
            return Err(ReportError::Render(format!(
                "renderer exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(output.stdout)
    }
}

/// Write rendered image bytes under `<outdir>/benchmarks/<name>.png`.
pub fn write_chart_image(outdir: &Path, name: &str, bytes: &[u8]) -> ReportResult<PathBuf> {
    let dir = outdir.join("benchmarks");
    std::fs::create_dir_all(&dir)?;
    let path = dir.join(format!("{}.png", sanitize(name)));
    std::fs::write(&path, bytes)?;
    Ok(path)
}

/// Write the chart payload itself under `<outdir>/benchmarks/<name>.chart.json`,
/// so a renderer can be pointed at it after the fact.
pub fn write_chart_payload(outdir: &Path, name: &str, payload: &Value) -> ReportResult<PathBuf> {
    let dir = outdir.join("benchmarks");
    std::fs::create_dir_all(&dir)?;
    let path = dir.join(format!("{}.chart.json", sanitize(name)));
    std::fs::write(&path, serde_json::to_vec_pretty(payload)?)?;
    Ok(path)
}

/// Keep output file names portable.
pub(crate) fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '-'
            }
        })
        .collect()
}
