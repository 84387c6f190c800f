use thiserror::Error;
use warmrun_core::Phase;
use warmrun_trace::TraceError;

use crate::pool::PoolError;

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("worker count must be positive, got {0}")]
    InvalidWorkerCount(usize),

    #[error("trace error: {0}")]
    Trace(#[from] TraceError),

    #[error("pool error: {0}")]
    Pool(#[from] PoolError),

    /// The start gate was interrupted. Starting a phase at the wrong time
    /// invalidates the whole run.
    #[error("scheduler for phase {phase} was interrupted before starting execution")]
    StartInterrupted { phase: Phase },
}

impl SchedulerError {
    /// Whether the caller should terminate the process.
    pub fn is_fatal(&self) -> bool {
        matches!(self, SchedulerError::StartInterrupted { .. })
    }
}
