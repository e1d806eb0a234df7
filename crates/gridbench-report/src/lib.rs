//! gridbench-report — judging and reporting a benchmark run.
//!
//! The watcher hands back a `WatchOutcome`; this crate turns it into
//! something a human or a CI job can act on:
//!
//! ```text
//! ScalingVerdict   peak == target && final == 0, with reasons
//! LogScan          error lines in cluster daemon logs
//! chart_payload    chart descriptor for an external renderer
//! BenchmarkReport  everything above, serialized to the output dir
//! ```
//!
//! Chart *rendering* stays external: `chart_payload` builds the
//! descriptor and `ChartRenderer` is the seam a rendering collaborator
//! plugs into.

pub mod chart;
pub mod error;
pub mod logscan;
pub mod report;
pub mod verdict;

pub use chart::{
    chart_payload, write_chart_image, write_chart_payload, ChartParams, ChartRenderer,
    CommandRenderer,
};
pub use error::{ReportError, ReportResult};
pub use logscan::{LogFinding, LogScan};
pub use report::{iso8601, write_report, BenchmarkParams, BenchmarkReport};
pub use verdict::ScalingVerdict;
