//! The scaling invariant, judged.

use serde::Serialize;

use gridbench_series::TimeSeries;

/// Pass/fail assessment of a scaling run: the cluster must have reached
/// exactly the target node count and scaled back down to zero.
#[derive(Debug, Clone, Serialize)]
pub struct ScalingVerdict {
    pub target: u32,
    pub peak: u32,
    pub final_count: u32,
    pub passed: bool,
    /// Human-readable reasons when `passed` is false.
    pub failures: Vec<String>,
}

impl ScalingVerdict {
    /// Judge a collected series against the scaling target.
    pub fn evaluate(series: &TimeSeries, target: u32) -> Self {
        let peak = series.peak();
        let final_count = series.final_count();
        let mut failures = Vec::new();

        if peak < target {
            failures.push(format!(
                "peak node count {peak} never reached the scaling target {target}"
            ));
        } else if peak > target {
            failures.push(format!(
                "peak node count {peak} overshot the scaling target {target}"
            ));
        }
        if final_count != 0 {
            failures.push(format!(
                "final node count {final_count} is nonzero; scale-down never completed"
            ));
        }

        Self {
            target,
            peak,
            final_count,
            passed: failures.is_empty(),
            failures,
        }
    }
}
