use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use warmrun_core::Phase;

/// Why the admission loop stopped pulling from the trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitReason {
    /// The trace source reported end of sequence.
    Exhausted,
    /// The external cancel signal fired.
    Cancelled,
    /// The pool refused a submission.
    PoolRejected,
}

/// Outcome of one scheduler run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub phase: Phase,
    pub worker_threads: usize,
    /// Items handed to the pool.
    pub submitted: u64,
    /// Handles observed done by admission control.
    pub completions_observed: u64,
    /// Pulls that returned no item without the trace being over.
    pub empty_pulls: u64,
    /// Admission passes that found nothing finished and had to wait.
    pub idle_polls: u64,
    /// Largest in-flight set, including the transient submission overshoot.
    pub peak_in_flight: usize,
    /// Largest in-flight set right after admission control let the loop go on.
    pub peak_in_flight_after_admission: usize,
    pub exit_reason: ExitReason,
    /// Whether the pool fully terminated within the shutdown bound.
    pub pool_terminated: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub elapsed: Duration,
}

impl RunReport {
    pub(crate) fn new(phase: Phase, worker_threads: usize) -> Self {
        let now = Utc::now();
        Self {
            phase,
            worker_threads,
            submitted: 0,
            completions_observed: 0,
            empty_pulls: 0,
            idle_polls: 0,
            peak_in_flight: 0,
            peak_in_flight_after_admission: 0,
            exit_reason: ExitReason::Exhausted,
            pool_terminated: false,
            started_at: now,
            finished_at: now,
            elapsed: Duration::ZERO,
        }
    }

    pub(crate) fn record_submission(&mut self, in_flight: usize) {
        self.submitted += 1;
        self.peak_in_flight = self.peak_in_flight.max(in_flight);
    }

    pub(crate) fn record_admitted(&mut self, in_flight: usize) {
        self.peak_in_flight_after_admission = self.peak_in_flight_after_admission.max(in_flight);
    }

    pub(crate) fn finish(&mut self, exit_reason: ExitReason, pool_terminated: bool) {
        self.exit_reason = exit_reason;
        self.pool_terminated = pool_terminated;
        self.finished_at = Utc::now();
        self.elapsed = self
            .finished_at
            .signed_duration_since(self.started_at)
            .to_std()
            .unwrap_or_default();
    }

    /// Items per second over the whole run.
    pub fn throughput(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 { self.submitted as f64 / secs } else { 0.0 }
    }
}
