use tracing::info;
use warmrun_trace::TraceSource;

use crate::pool::Executor;

use super::SequentialScheduler;

impl<S: TraceSource, E: Executor> SequentialScheduler<S, E> {
    /// Stop the pool and wait up to the shutdown timeout for it to finish.
    ///
    /// `force` also cancels queued and running items. A pool still running
    /// after the timeout is logged and left alone. Returns whether the pool
    /// terminated.
    pub(super) fn shutdown(&mut self, force: bool) -> bool {
        info!(phase = %self.phase, force, "Shutdown of scheduler for phase {} initiated.", self.phase);
        self.executor.shutdown();
        if force {
            self.executor.shutdown_now();
        }
        info!(
            phase = %self.phase,
            "Scheduler for phase {} terminated (business processes may still be running).",
            self.phase
        );

        self.executor.await_termination(self.shutdown_timeout);
        let terminated = self.executor.is_terminated();
        if terminated {
            info!(phase = %self.phase, "All processes of phase {} terminated.", self.phase);
        } else {
            info!(phase = %self.phase, "Some processes of phase {} may still be running.", self.phase);
        }
        terminated
    }
}
