//! gridbench — cluster scaling benchmark driver.
//!
//! Submits a job sized to a target compute-node count, watches the
//! scheduler until the cluster scales up and back down to zero, publishes
//! every observation to a metrics file, and judges the run: the peak must
//! equal the target, the final count must be zero, and the cluster's
//! daemon logs must be free of error lines.
//!
//! # Usage
//!
//! ```text
//! gridbench run --config gridbench.toml --target 8
//! gridbench verdict --series gridbench-out/metrics.jsonl --target 8
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;
mod config;

#[derive(Parser)]
#[command(
    name = "gridbench",
    about = "Cluster scaling benchmark harness",
    version,
    propagate_version = true,
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Submit a benchmark job and watch the cluster scale up and back down.
    Run {
        /// Path to the benchmark configuration.
        #[arg(long, default_value = "gridbench.toml")]
        config: PathBuf,

        /// Override the configured scaling target.
        #[arg(long)]
        target: Option<u32>,

        /// Override the configured monitoring ceiling, in minutes.
        #[arg(long)]
        max_minutes: Option<u64>,
    },
    /// Re-judge a previously captured metrics file against a target.
    Verdict {
        /// Metrics JSONL file produced by a run.
        #[arg(long)]
        series: PathBuf,

        /// Scaling target to judge against.
        #[arg(long)]
        target: u32,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,gridbench=debug".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Run {
            config,
            target,
            max_minutes,
        } => {
            let mut config = config::BenchConfig::load(&config)?;
            if let Some(target) = target {
                config.benchmark.scaling_target = target;
            }
            if let Some(minutes) = max_minutes {
                config.benchmark.max_duration_mins = minutes;
            }
            commands::run::run(config).await
        }
        Command::Verdict { series, target } => commands::verdict::verdict(&series, target),
    }
}
