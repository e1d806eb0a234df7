//! Transition-compressed node-count time series.
//!
//! All timestamps are Unix epoch seconds. A series is never empty: it is
//! created with a synthetic zero observation at watch start, so the first
//! genuine scale-up always registers as a transition.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

/// Current Unix time in whole seconds.
pub fn epoch_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// A single recorded node-count value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Observation {
    /// Unix timestamp (seconds) when the value was observed.
    pub timestamp: u64,
    /// Compute-node count at that instant.
    pub count: u32,
}

/// Why a watch ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    /// The cluster scaled up and returned to zero nodes.
    Quiescent,
    /// The monitoring deadline elapsed before scale-down completed.
    TimedOut,
}

/// Append-only sequence of node-count transitions.
///
/// Invariants:
/// - never empty; entry 0 is the synthetic zero baseline
/// - timestamps are monotonically non-decreasing
/// - no two adjacent entries hold the same count
#[derive(Debug, Clone, Serialize)]
pub struct TimeSeries {
    entries: Vec<Observation>,
}

impl TimeSeries {
    /// Create a series seeded with a zero observation at `start`.
    pub fn seeded(start: u64) -> Self {
        Self {
            entries: vec![Observation {
                timestamp: start,
                count: 0,
            }],
        }
    }

    /// Record a polled value. Appends an entry only when the count differs
    /// from the last recorded one, and returns whether it did.
    ///
    /// Timestamps are clamped to the previous entry's timestamp so the
    /// series stays monotonic even if the wall clock steps backwards.
    pub fn record(&mut self, timestamp: u64, count: u32) -> bool {
        if self.last_count() == count {
            return false;
        }
        let timestamp = timestamp.max(self.last_timestamp());
        self.entries.push(Observation { timestamp, count });
        true
    }

    /// All recorded observations, oldest first.
    pub fn observations(&self) -> &[Observation] {
        &self.entries
    }

    /// The recorded counts, oldest first.
    pub fn counts(&self) -> Vec<u32> {
        self.entries.iter().map(|o| o.count).collect()
    }

    /// The recorded timestamps, oldest first.
    pub fn timestamps(&self) -> Vec<u64> {
        self.entries.iter().map(|o| o.timestamp).collect()
    }

    /// The most recently recorded count.
    pub fn last_count(&self) -> u32 {
        self.entries.last().map(|o| o.count).unwrap_or(0)
    }

    /// The most recently recorded timestamp.
    pub fn last_timestamp(&self) -> u64 {
        self.entries.last().map(|o| o.timestamp).unwrap_or(0)
    }

    /// The highest count ever recorded.
    pub fn peak(&self) -> u32 {
        self.entries.iter().map(|o| o.count).max().unwrap_or(0)
    }

    /// The final recorded count (alias of [`last_count`](Self::last_count),
    /// named for the assertion it feeds).
    pub fn final_count(&self) -> u32 {
        self.last_count()
    }

    /// Timestamp of the zero baseline.
    pub fn started_at(&self) -> u64 {
        self.entries.first().map(|o| o.timestamp).unwrap_or(0)
    }

    /// Whether anything beyond the baseline was recorded.
    pub fn has_transitions(&self) -> bool {
        self.entries.len() > 1
    }

    /// Number of recorded entries, baseline included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false: a series carries its baseline from construction.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The result of one watch invocation.
#[derive(Debug, Clone, Serialize)]
pub struct WatchOutcome {
    /// The transition series collected during the watch.
    pub series: TimeSeries,
    /// Why the watch ended. A timeout is a benign terminal state, not an
    /// error: callers must inspect this field.
    pub ended_by: EndReason,
    /// Unix timestamp (seconds) at loop exit, before the settle delay.
    pub end_time: u64,
}
