//! Worker pool abstraction.
//!
//! The scheduler only needs three things from a pool: submit an item and
//! get back a handle, ask a handle whether it finished, and shut the pool
//! down. Anything offering those can back a [`SequentialScheduler`].
//!
//! [`SequentialScheduler`]: crate::sequential::SequentialScheduler

mod thread_pool;

use std::time::Duration;

use thiserror::Error;
use warmrun_trace::WorkItem;

pub use thread_pool::{PoolHandle, ThreadPoolExecutor};

#[derive(Debug, Error)]
pub enum PoolError {
    #[error("failed to build thread pool: {0}")]
    Build(String),

    #[error("pool is shut down and rejects new work")]
    Rejected,
}

/// Completion handle for one submitted item.
///
/// Handles never cancel their item; only the pool as a whole can.
pub trait TaskHandle {
    fn is_done(&self) -> bool;
}

/// Fixed-size executor of [`WorkItem`]s.
pub trait Executor: Send {
    type Handle: TaskHandle;

    /// Hand `item` to the pool. Fails once the pool was shut down.
    fn submit<W: WorkItem>(&self, item: W) -> Result<Self::Handle, PoolError>;

    /// Stop accepting work. Queued and running items still complete.
    fn shutdown(&mut self);

    /// Like [`shutdown`](Executor::shutdown), and also cancel queued and
    /// running items.
    fn shutdown_now(&mut self);

    /// Wait up to `timeout` for every worker to exit. Returns whether the
    /// pool terminated.
    fn await_termination(&self, timeout: Duration) -> bool;

    fn is_terminated(&self) -> bool;

    /// Block for at most `timeout`, returning early if a pool can tell that
    /// some item finished. The default is a plain sleep.
    fn wait_for_completion(&self, timeout: Duration) {
        std::thread::sleep(timeout);
    }
}
