pub mod error;
pub mod pool;
pub mod report;
pub mod sequential;

pub use error::SchedulerError;
pub use pool::{Executor, PoolError, PoolHandle, TaskHandle, ThreadPoolExecutor};
pub use report::{ExitReason, RunReport};
pub use sequential::{SchedulerBuilder, SequentialScheduler};
