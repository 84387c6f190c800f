use tracing::trace;
use warmrun_trace::TraceSource;

use crate::pool::{Executor, TaskHandle};
use crate::report::RunReport;

use super::SequentialScheduler;

impl<S: TraceSource, E: Executor> SequentialScheduler<S, E> {
    /// Hold the loop while the in-flight set is at or above the worker count.
    ///
    /// Every pass rescans all handles and drops the finished ones. A pass
    /// that finds nothing finished waits one poll interval (less if the pool
    /// reports a completion) before rescanning. Returns early on cancel.
    pub(super) fn admit(&self, in_flight: &mut Vec<E::Handle>, report: &mut RunReport) {
        while !self.cancel.is_cancelled() && in_flight.len() >= self.worker_threads {
            let before = in_flight.len();
            in_flight.retain(|h| !h.is_done());
            let finished = before - in_flight.len();

            if finished == 0 {
                report.idle_polls += 1;
                self.executor.wait_for_completion(self.poll_interval);
            } else {
                report.completions_observed += finished as u64;
                trace!(phase = %self.phase, finished, in_flight = in_flight.len(), "capacity freed");
            }
        }

        if !self.cancel.is_cancelled() {
            report.record_admitted(in_flight.len());
        }
    }
}
