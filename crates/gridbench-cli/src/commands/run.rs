//! The `run` subcommand — the benchmark driver.
//!
//! submit → watch → judge → report. The watcher owns the polling; this
//! driver owns the assertions and the output files.

use std::time::Duration;

use anyhow::{bail, Context};
use tracing::{info, warn};

use gridbench_metrics::{JsonlSink, MetricsNamespace};
use gridbench_report::{
    chart_payload, write_chart_image, write_chart_payload, write_report, BenchmarkParams,
    BenchmarkReport, ChartParams, ChartRenderer, CommandRenderer, LogScan, ScalingVerdict,
};
use gridbench_sched::{JobRequest, LocalTransport, SchedulerClient};
use gridbench_series::epoch_secs;
use gridbench_watch::{ScalingWatcher, WatchOptions};

use crate::config::BenchConfig;

pub async fn run(config: BenchConfig) -> anyhow::Result<()> {
    let target = config.benchmark.scaling_target;
    info!(
        scheduler = %config.scheduler.kind,
        target,
        cluster = %config.cluster.name,
        "starting scaling benchmark"
    );

    std::fs::create_dir_all(&config.output.dir)
        .with_context(|| format!("creating output dir {}", config.output.dir.display()))?;

    let transport = LocalTransport::with_wrapper(config.cluster.wrapper.clone());
    let mut client = SchedulerClient::new(config.scheduler.kind, transport);

    // Submit the job sized to the scaling target.
    let job = JobRequest::sized_for(
        config.scheduler.kind,
        format!("sleep {}", config.benchmark.job_duration_secs),
        target,
        config.scheduler.slots_per_node,
    );
    let start_time = epoch_secs();
    let job_id = client.submit(&job).await.context("job submission failed")?;
    info!(%job_id, "benchmark job accepted");

    // Watch the scale-up and scale-down.
    let namespace = MetricsNamespace::benchmarking(&config.cluster.name);
    let metrics_path = config.metrics_path();
    let mut sink = JsonlSink::create(&metrics_path, namespace.clone())
        .with_context(|| format!("opening metrics file {}", metrics_path.display()))?;

    let watcher = ScalingWatcher::new(WatchOptions {
        poll_interval: Duration::from_secs(config.benchmark.poll_interval_secs),
        max_duration: Duration::from_secs(config.benchmark.max_duration_mins * 60),
    })?;
    let outcome = watcher.watch(&mut client, &mut sink).await;

    // Judge the scaling invariant.
    let verdict = ScalingVerdict::evaluate(&outcome.series, target);

    // Scan the cluster daemon logs for error lines.
    let scan = LogScan::new();
    let mut log_findings = Vec::new();
    for file in &config.logs.files {
        let content = client
            .read_file(file)
            .await
            .with_context(|| format!("fetching log file {file}"))?;
        log_findings.extend(scan.scan(file, &content));
    }

    // Produce outputs.
    let params = BenchmarkParams {
        scheduler: config.scheduler.kind.to_string(),
        scaling_target: target,
        job_duration_secs: config.benchmark.job_duration_secs,
        region: config.labels.region.clone(),
        os: config.labels.os.clone(),
        instance: config.labels.instance.clone(),
    };

    let chart_params = ChartParams {
        title: params.title(),
        namespace: namespace.to_string(),
        target,
        start_time,
        end_time: outcome.end_time,
    };
    let payload = chart_payload(&outcome.series, &chart_params);
    let payload_path = write_chart_payload(&config.output.dir, &config.output.name, &payload)?;
    info!(path = %payload_path.display(), "chart payload written");

    if let Some(command) = &config.chart.render_command {
        let mut renderer = CommandRenderer::new(command);
        match renderer.render(&payload).await {
            Ok(bytes) => {
                let path = write_chart_image(&config.output.dir, &config.output.name, &bytes)?;
                info!(path = %path.display(), "chart image written");
            }
            Err(e) => warn!(error = %e, "chart rendering failed; payload retained"),
        }
    }

    let report = BenchmarkReport {
        params,
        ended_by: outcome.ended_by,
        total_time_secs: outcome.end_time.saturating_sub(start_time),
        series: outcome.series,
        verdict: verdict.clone(),
        log_findings: log_findings.clone(),
    };
    write_report(&config.output.dir, &config.output.name, &report)?;

    if !verdict.passed || !log_findings.is_empty() {
        for failure in &verdict.failures {
            warn!(%failure, "scaling assertion failed");
        }
        for finding in &log_findings {
            warn!(file = %finding.file, line = finding.line_no, "error line in cluster log");
        }
        bail!(
            "scaling benchmark failed: {} assertion failure(s), {} log finding(s)",
            verdict.failures.len(),
            log_findings.len()
        );
    }

    info!(
        peak = verdict.peak,
        total_time_secs = report.total_time_secs,
        "scaling benchmark passed"
    );
    Ok(())
}
