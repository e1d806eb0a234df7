//! The scaling watch loop.
//!
//! A single sequential task: sleep, query, report, maybe-record, check
//! exit. Collaborator calls are awaited one at a time so the recorded
//! timeline stays consistent with the reported metric stream.

use std::time::Duration;

use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

use gridbench_series::{epoch_secs, EndReason, TimeSeries, WatchOutcome};

use crate::error::{TransientQueryError, WatchError};

/// Fixed post-loop wait allowing sink-side ingestion to catch up before
/// results are read back. Applied exactly once per watch, on every exit
/// path. A design constant, deliberately not part of [`WatchOptions`].
pub const SETTLE_DELAY: Duration = Duration::from_secs(180);

/// Reports the cluster's current compute-node count.
///
/// Implementations must be safe to query repeatedly; any I/O or API fault
/// is surfaced as [`TransientQueryError`] and retried by the watch loop.
#[allow(async_fn_in_trait)]
pub trait SchedulerStateSource {
    async fn compute_node_count(&mut self) -> Result<u32, TransientQueryError>;
}

/// Receives one point-in-time observation per successful poll.
///
/// Fire-and-forget: a sink handles (and logs) its own failures, and the
/// watch loop never gates on sink success.
#[allow(async_fn_in_trait)]
pub trait MetricsSink {
    async fn report(&mut self, timestamp: u64, count: u32);
}

/// Cadence and deadline for a watch.
#[derive(Debug, Clone, Copy)]
pub struct WatchOptions {
    /// Time between polls. Must be greater than zero.
    pub poll_interval: Duration,
    /// Hard wall-clock ceiling on the watch. Must be at least one poll
    /// interval long.
    pub max_duration: Duration,
}

impl WatchOptions {
    fn validate(&self) -> Result<(), WatchError> {
        if self.poll_interval.is_zero() {
            return Err(WatchError::ZeroPollInterval);
        }
        if self.max_duration < self.poll_interval {
            return Err(WatchError::DeadlineBeforeFirstPoll {
                poll: self.poll_interval,
                max: self.max_duration,
            });
        }
        Ok(())
    }
}

/// Polls a scheduler state source until the cluster scales up and back
/// down to zero, recording the transition series along the way.
#[derive(Debug)]
pub struct ScalingWatcher {
    options: WatchOptions,
}

impl ScalingWatcher {
    /// Create a watcher with validated options.
    pub fn new(options: WatchOptions) -> Result<Self, WatchError> {
        options.validate()?;
        Ok(Self { options })
    }

    /// Run the watch to completion.
    ///
    /// The returned outcome is data either way: `ended_by` distinguishes
    /// quiescence from a timeout, and a timed-out watch still carries
    /// everything collected so far.
    pub async fn watch<S, M>(&self, source: &mut S, sink: &mut M) -> WatchOutcome
    where
        S: SchedulerStateSource,
        M: MetricsSink,
    {
        let deadline = Instant::now() + self.options.max_duration;
        let mut series = TimeSeries::seeded(epoch_secs());

        info!(
            poll_interval_secs = self.options.poll_interval.as_secs(),
            max_duration_secs = self.options.max_duration.as_secs(),
            "scaling watch started"
        );

        let ended_by = loop {
            sleep(self.options.poll_interval).await;

            match source.compute_node_count().await {
                Ok(count) => {
                    let now = epoch_secs();
                    debug!(count, "compute node count polled");
                    sink.report(now, count).await;
                    if series.record(now, count) {
                        info!(count, "node count transition recorded");
                    }
                    // Quiescent: scaled up, then back down to zero.
                    if series.has_transitions() && series.last_count() == 0 {
                        break EndReason::Quiescent;
                    }
                }
                Err(e) => {
                    warn!(error = %e, "node count query failed; retrying next tick");
                }
            }

            if Instant::now() >= deadline {
                break EndReason::TimedOut;
            }
        };

        let end_time = epoch_secs();
        info!(
            ?ended_by,
            transitions = series.len() - 1,
            counts = ?series.counts(),
            timestamps = ?series.timestamps(),
            "scaling watch completed"
        );

        sleep(SETTLE_DELAY).await;

        WatchOutcome {
            series,
            ended_by,
            end_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Replays a scripted list of poll results, then fails transiently.
    struct ScriptedSource {
        results: VecDeque<Result<u32, TransientQueryError>>,
    }

    impl ScriptedSource {
        fn counts(counts: &[u32]) -> Self {
            Self {
                results: counts.iter().map(|c| Ok(*c)).collect(),
            }
        }

        fn script(results: Vec<Result<u32, TransientQueryError>>) -> Self {
            Self {
                results: results.into(),
            }
        }
    }

    impl SchedulerStateSource for ScriptedSource {
        async fn compute_node_count(&mut self) -> Result<u32, TransientQueryError> {
            self.results
                .pop_front()
                .unwrap_or_else(|| Err(TransientQueryError::new("script exhausted")))
        }
    }

    /// Captures every reported observation.
    #[derive(Default)]
    struct CaptureSink {
        reports: Vec<(u64, u32)>,
    }

    impl MetricsSink for CaptureSink {
        async fn report(&mut self, timestamp: u64, count: u32) {
            self.reports.push((timestamp, count));
        }
    }

    fn watcher(poll_secs: u64, max_secs: u64) -> ScalingWatcher {
        ScalingWatcher::new(WatchOptions {
            poll_interval: Duration::from_secs(poll_secs),
            max_duration: Duration::from_secs(max_secs),
        })
        .unwrap()
    }

    #[test]
    fn rejects_zero_poll_interval() {
        let err = ScalingWatcher::new(WatchOptions {
            poll_interval: Duration::ZERO,
            max_duration: Duration::from_secs(60),
        })
        .unwrap_err();
        assert!(matches!(err, WatchError::ZeroPollInterval));
    }

    #[test]
    fn rejects_deadline_shorter_than_poll() {
        let err = ScalingWatcher::new(WatchOptions {
            poll_interval: Duration::from_secs(20),
            max_duration: Duration::from_secs(10),
        })
        .unwrap_err();
        assert!(matches!(err, WatchError::DeadlineBeforeFirstPoll { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn scale_up_and_down_ends_quiescent() {
        let mut source = ScriptedSource::counts(&[0, 0, 3, 3, 3, 0, 0]);
        let mut sink = CaptureSink::default();

        let outcome = watcher(1, 600).watch(&mut source, &mut sink).await;

        assert_eq!(outcome.ended_by, EndReason::Quiescent);
        assert_eq!(outcome.series.counts(), vec![0, 3, 0]);
        // The loop stops at the first return to zero; the trailing polls
        // in the script are never consumed.
        assert_eq!(sink.reports.len(), 6);
    }

    #[tokio::test(start_paused = true)]
    async fn never_scaling_down_times_out_with_partial_series() {
        let mut source = ScriptedSource::counts(&[1, 2, 4, 4, 4, 4, 4, 4, 4, 4]);
        let mut sink = CaptureSink::default();

        let outcome = watcher(1, 5).watch(&mut source, &mut sink).await;

        assert_eq!(outcome.ended_by, EndReason::TimedOut);
        assert_eq!(outcome.series.counts(), vec![0, 1, 2, 4]);
        assert_eq!(outcome.series.final_count(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn transient_failures_are_swallowed_and_retried() {
        let err = || Err(TransientQueryError::new("ssh: connection refused"));
        let mut source = ScriptedSource::script(vec![
            Ok(0),
            err(),
            Ok(2),
            err(),
            Ok(2),
            err(),
            Ok(0),
        ]);
        let mut sink = CaptureSink::default();

        let outcome = watcher(1, 600).watch(&mut source, &mut sink).await;

        assert_eq!(outcome.ended_by, EndReason::Quiescent);
        assert_eq!(outcome.series.counts(), vec![0, 2, 0]);
        // Failed polls contribute no sink reports either.
        let reported: Vec<u32> = sink.reports.iter().map(|(_, c)| *c).collect();
        assert_eq!(reported, vec![0, 2, 2, 0]);
    }

    #[tokio::test(start_paused = true)]
    async fn every_successful_poll_reaches_the_sink() {
        let mut source = ScriptedSource::counts(&[2, 2, 2, 0]);
        let mut sink = CaptureSink::default();

        let outcome = watcher(1, 600).watch(&mut source, &mut sink).await;

        // Four polls reported, two transitions recorded.
        assert_eq!(sink.reports.len(), 4);
        assert_eq!(outcome.series.counts(), vec![0, 2, 0]);
    }

    #[tokio::test(start_paused = true)]
    async fn series_always_starts_with_zero_baseline() {
        let mut source = ScriptedSource::counts(&[5, 0]);
        let mut sink = CaptureSink::default();

        let outcome = watcher(1, 600).watch(&mut source, &mut sink).await;

        let first = outcome.series.observations()[0];
        assert_eq!(first.count, 0);
        assert_eq!(first.timestamp, outcome.series.started_at());
    }

    #[tokio::test(start_paused = true)]
    async fn initial_zeroes_do_not_count_as_quiescence() {
        // A cluster that never scales up must not end Quiescent just
        // because polls keep returning the baseline zero.
        let mut source = ScriptedSource::counts(&[0; 20]);
        let mut sink = CaptureSink::default();

        let outcome = watcher(1, 10).watch(&mut source, &mut sink).await;

        assert_eq!(outcome.ended_by, EndReason::TimedOut);
        assert_eq!(outcome.series.counts(), vec![0]);
    }

    #[tokio::test(start_paused = true)]
    async fn settle_delay_is_applied_before_returning() {
        let mut source = ScriptedSource::counts(&[1, 0]);
        let mut sink = CaptureSink::default();

        let started = Instant::now();
        watcher(1, 600).watch(&mut source, &mut sink).await;

        assert!(started.elapsed() >= SETTLE_DELAY);
    }

    #[tokio::test(start_paused = true)]
    async fn end_time_is_stamped_at_loop_exit() {
        let mut source = ScriptedSource::counts(&[1, 0]);
        let mut sink = CaptureSink::default();

        let outcome = watcher(1, 600).watch(&mut source, &mut sink).await;

        // end_time precedes the settle delay, so it cannot be before the
        // last recorded observation.
        assert!(outcome.end_time >= outcome.series.last_timestamp());
    }

    #[tokio::test(start_paused = true)]
    async fn benchmark_scenario_target_four() {
        let mut source = ScriptedSource::counts(&[0, 1, 2, 4, 4, 2, 0]);
        let mut sink = CaptureSink::default();

        let outcome = watcher(1, 600).watch(&mut source, &mut sink).await;

        assert_eq!(outcome.series.counts(), vec![0, 1, 2, 4, 2, 0]);
        assert_eq!(outcome.series.peak(), 4);
        assert_eq!(outcome.series.final_count(), 0);
        assert_eq!(outcome.ended_by, EndReason::Quiescent);
    }
}
