use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;
use warmrun_core::{CancelSignal, Clock, Phase, ReferenceClock, SequentialConfig};
use warmrun_trace::{FileTraceSource, SimulatedExecutor, TraceSource};

use crate::error::SchedulerError;
use crate::pool::{Executor, ThreadPoolExecutor};

use super::SequentialScheduler;

/// Builder for [`SequentialScheduler`].
pub struct SchedulerBuilder {
    phase: Phase,
    config: SequentialConfig,
    worker_threads: Option<usize>,
    poll_interval: Option<Duration>,
    shutdown_timeout: Option<Duration>,
    wait_until_time_zero: bool,
    clock: Option<Arc<dyn Clock>>,
    cancel: Option<CancelSignal>,
}

impl SchedulerBuilder {
    /// Create a builder for the given phase with default settings.
    pub fn new(phase: Phase) -> Self {
        Self {
            phase,
            config: SequentialConfig::default(),
            worker_threads: None,
            poll_interval: None,
            shutdown_timeout: None,
            wait_until_time_zero: false,
            clock: None,
            cancel: None,
        }
    }

    /// Take pool size, poll cadence, shutdown bound and logging from `config`.
    pub fn config(mut self, config: &SequentialConfig) -> Self {
        self.config = config.clone();
        self
    }

    /// Override the pool size from the config. Must be positive.
    pub fn worker_threads(mut self, workers: usize) -> Self {
        self.worker_threads = Some(workers);
        self
    }

    /// Override the admission-control re-check cadence from the config.
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = Some(interval);
        self
    }

    /// Override the pool termination wait bound from the config.
    pub fn shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = Some(timeout);
        self
    }

    /// Wait for time zero before pulling the first item (default: off).
    pub fn wait_until_time_zero(mut self, wait: bool) -> Self {
        self.wait_until_time_zero = wait;
        self
    }

    /// Clock consulted by the start gate (default: time zero is "now").
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Use an existing signal for external interruption.
    pub fn cancel_signal(mut self, cancel: CancelSignal) -> Self {
        self.cancel = Some(cancel);
        self
    }

    fn resolved_workers(&self) -> Result<usize, SchedulerError> {
        match self.worker_threads {
            Some(0) => Err(SchedulerError::InvalidWorkerCount(0)),
            Some(n) => Ok(n),
            None => Ok(self.config.resolved_worker_threads()),
        }
    }

    /// Open `path` as a trace of simulated business processes and build a
    /// scheduler with its own named pool.
    pub fn build_from_trace_file(
        self,
        path: impl AsRef<Path>,
        record_measurements: bool,
    ) -> Result<SequentialScheduler<FileTraceSource>, SchedulerError> {
        let trace = FileTraceSource::open(path, record_measurements, Arc::new(SimulatedExecutor))?;
        self.build(trace)
    }

    /// Build a scheduler with a pool of `worker_threads` threads named
    /// `{phase}-thread-{index}`.
    pub fn build<S: TraceSource>(self, trace: S) -> Result<SequentialScheduler<S>, SchedulerError> {
        let workers = self.resolved_workers()?;
        let executor = ThreadPoolExecutor::new(workers, self.phase.thread_prefix())?;
        self.build_with_executor(trace, executor)
    }

    /// Build a scheduler on a caller-supplied executor. The executor should
    /// run as many items concurrently as the configured worker count.
    pub fn build_with_executor<S: TraceSource, E: Executor>(
        self,
        trace: S,
        executor: E,
    ) -> Result<SequentialScheduler<S, E>, SchedulerError> {
        let worker_threads = self.resolved_workers()?;
        let clock = self
            .clock
            .unwrap_or_else(|| Arc::new(ReferenceClock::started_now()) as Arc<dyn Clock>);

        info!(phase = %self.phase, workers = worker_threads, "Scheduler for phase {} initialized.", self.phase);
        Ok(SequentialScheduler {
            trace,
            executor,
            phase: self.phase,
            worker_threads,
            poll_interval: self.poll_interval.unwrap_or_else(|| self.config.poll_interval()),
            shutdown_timeout: self
                .shutdown_timeout
                .unwrap_or_else(|| self.config.shutdown_timeout()),
            detailed_logging: self.config.detailed_logging,
            wait_until_time_zero: self.wait_until_time_zero,
            clock,
            cancel: self.cancel.unwrap_or_default(),
        })
    }
}

impl SequentialScheduler<FileTraceSource> {
    /// Scheduler over a trace file with default settings: no start gate and
    /// the configured default pool size.
    pub fn from_trace_file(
        path: impl AsRef<Path>,
        record_measurements: bool,
        phase: Phase,
    ) -> Result<Self, SchedulerError> {
        SchedulerBuilder::new(phase).build_from_trace_file(path, record_measurements)
    }
}
