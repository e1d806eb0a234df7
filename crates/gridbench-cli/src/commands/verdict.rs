//! The `verdict` subcommand — offline re-assessment of a captured run.
//!
//! Rebuilds the transition series from a metrics JSONL file and judges
//! it against a target, so a past run can be re-examined without a
//! cluster.

use std::path::Path;

use anyhow::{bail, Context};

use gridbench_metrics::MetricRecord;
use gridbench_report::ScalingVerdict;
use gridbench_series::TimeSeries;

pub fn verdict(series_path: &Path, target: u32) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(series_path)
        .with_context(|| format!("reading metrics file {}", series_path.display()))?;

    let mut records = Vec::new();
    for (i, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let record: MetricRecord = serde_json::from_str(line)
            .with_context(|| format!("parsing metrics line {}", i + 1))?;
        records.push(record);
    }

    let Some(first) = records.first() else {
        bail!("metrics file {} holds no records", series_path.display());
    };

    // Replay the raw observations through the same compression the
    // watcher applies, so the judged series matches a live run.
    let mut series = TimeSeries::seeded(first.timestamp);
    for record in &records {
        series.record(record.timestamp, record.value);
    }

    let verdict = ScalingVerdict::evaluate(&series, target);
    println!("{}", serde_json::to_string_pretty(&verdict)?);

    if !verdict.passed {
        bail!("scaling verdict failed: {}", verdict.failures.join("; "));
    }
    Ok(())
}
