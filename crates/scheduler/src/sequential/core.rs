use std::sync::Arc;
use std::time::Duration;

use warmrun_core::{CancelSignal, Clock, Phase};

use crate::pool::ThreadPoolExecutor;

/// Drains a [`TraceSource`] into an [`Executor`], keeping at most
/// `worker_threads` items in flight.
///
/// Callers must ensure at most one scheduler is active at a time against a
/// shared clock and logging context; this type does not enforce it.
///
/// [`TraceSource`]: warmrun_trace::TraceSource
/// [`Executor`]: crate::pool::Executor
pub struct SequentialScheduler<S, E = ThreadPoolExecutor> {
    pub(super) trace: S,
    pub(super) executor: E,
    pub(super) phase: Phase,
    /// Admission ceiling; equals the pool size.
    pub(super) worker_threads: usize,
    pub(super) poll_interval: Duration,
    pub(super) shutdown_timeout: Duration,
    pub(super) detailed_logging: bool,
    /// Block at the start gate until the clock reaches time zero.
    pub(super) wait_until_time_zero: bool,
    pub(super) clock: Arc<dyn Clock>,
    /// External interruption.
    pub(super) cancel: CancelSignal,
}

impl<S, E> SequentialScheduler<S, E> {
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn worker_threads(&self) -> usize {
        self.worker_threads
    }

    pub fn waits_until_time_zero(&self) -> bool {
        self.wait_until_time_zero
    }

    /// Handle for interrupting a running scheduler from another thread.
    pub fn cancel_signal(&self) -> CancelSignal {
        self.cancel.clone()
    }
}
