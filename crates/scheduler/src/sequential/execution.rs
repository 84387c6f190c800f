use tracing::{debug, error, info};
use warmrun_trace::{TraceSource, WorkItem};

use crate::error::SchedulerError;
use crate::pool::Executor;
use crate::report::{ExitReason, RunReport};

use super::SequentialScheduler;

/// The start gate opens one millisecond before time zero.
const START_GATE_OFFSET_MS: i64 = -1;

impl<S: TraceSource, E: Executor> SequentialScheduler<S, E> {
    /// Drain the trace through the pool, then shut the pool down.
    ///
    /// Blocks the calling thread until the trace is exhausted or the cancel
    /// signal fires, followed by at most the shutdown timeout. The only
    /// error after construction is [`SchedulerError::StartInterrupted`],
    /// which is fatal for the whole benchmark run.
    pub fn run(mut self) -> Result<RunReport, SchedulerError> {
        info!(phase = %self.phase, "Scheduler for phase {} is ready to start.", self.phase);
        if self.wait_until_time_zero {
            self.wait_until_start()?;
        }
        info!(phase = %self.phase, workers = self.worker_threads, "Scheduler for phase {} started.", self.phase);

        let mut report = RunReport::new(self.phase, self.worker_threads);
        let mut in_flight: Vec<E::Handle> = Vec::with_capacity(self.worker_threads + 1);

        let exit_reason = loop {
            if self.cancel.is_cancelled() {
                break ExitReason::Cancelled;
            }
            if self.trace.is_exhausted() {
                break ExitReason::Exhausted;
            }

            let Some(mut item) = self.trace.next_item() else {
                report.empty_pulls += 1;
                continue;
            };

            if self.detailed_logging {
                item.append_log(format!(
                    "Current Phase={}, retrieved process from log, submitting to pool.",
                    self.phase
                ));
            }
            item.set_timing(false);

            let id = item.id().to_string();
            match self.executor.submit(item) {
                Ok(handle) => {
                    in_flight.push(handle);
                    report.record_submission(in_flight.len());
                    debug!(phase = %self.phase, item = %id, in_flight = in_flight.len(), "submitted");
                }
                Err(e) => {
                    error!(phase = %self.phase, item = %id, error = %e, "pool rejected work item");
                    break ExitReason::PoolRejected;
                }
            }

            self.admit(&mut in_flight, &mut report);
        };

        let pool_terminated = self.shutdown(exit_reason == ExitReason::Cancelled);
        report.finish(exit_reason, pool_terminated);
        info!(
            phase = %self.phase,
            submitted = report.submitted,
            exit = ?report.exit_reason,
            elapsed_ms = report.elapsed.as_millis() as u64,
            "run finished"
        );
        Ok(report)
    }

    /// Block until the clock reaches the start gate.
    fn wait_until_start(&self) -> Result<(), SchedulerError> {
        self.clock
            .wait_until_relative(START_GATE_OFFSET_MS, &self.cancel)
            .map_err(|e| {
                error!(
                    phase = %self.phase,
                    error = %e,
                    "The scheduler was interrupted before starting execution, terminating."
                );
                SchedulerError::StartInterrupted { phase: self.phase }
            })
    }
}
