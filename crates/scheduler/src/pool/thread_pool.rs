use std::any::Any;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tracing::{debug, error};
use warmrun_core::CancelSignal;
use warmrun_trace::WorkItem;

use super::{Executor, PoolError, TaskHandle};

#[derive(Debug)]
struct PoolState {
    /// Worker threads that have not exited yet.
    live_threads: usize,
    /// Monotonic count of finished items.
    completions: u64,
}

#[derive(Debug)]
struct Shared {
    state: Mutex<PoolState>,
    changed: Condvar,
    cancel: CancelSignal,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, PoolState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record_completion(&self) {
        self.lock().completions += 1;
        self.changed.notify_all();
    }

    fn record_thread_exit(&self) {
        {
            let mut state = self.lock();
            state.live_threads = state.live_threads.saturating_sub(1);
        }
        self.changed.notify_all();
    }
}

/// Handle returned by [`ThreadPoolExecutor::submit`].
#[derive(Debug, Clone)]
pub struct PoolHandle {
    done: Arc<AtomicBool>,
}

impl TaskHandle for PoolHandle {
    fn is_done(&self) -> bool {
        self.done.load(Ordering::Acquire)
    }
}

/// Marks a handle done when the job ends, including by panic.
struct CompletionGuard {
    done: Arc<AtomicBool>,
    shared: Arc<Shared>,
}

impl Drop for CompletionGuard {
    fn drop(&mut self) {
        self.done.store(true, Ordering::Release);
        self.shared.record_completion();
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

/// Fixed-size pool of named threads backed by `rayon`.
///
/// Dropping the rayon pool stops it from accepting work; its threads exit
/// once every job spawned on it has finished. Thread exits are counted
/// through rayon's exit handler so termination can be awaited.
pub struct ThreadPoolExecutor {
    pool: Option<rayon::ThreadPool>,
    shared: Arc<Shared>,
    name_prefix: String,
}

impl ThreadPoolExecutor {
    /// Spawn `size` threads named `{name_prefix}-{index}`.
    pub fn new(size: usize, name_prefix: impl Into<String>) -> Result<Self, PoolError> {
        if size == 0 {
            return Err(PoolError::Build("pool size must be positive".to_string()));
        }
        let name_prefix = name_prefix.into();
        let shared = Arc::new(Shared {
            state: Mutex::new(PoolState {
                live_threads: size,
                completions: 0,
            }),
            changed: Condvar::new(),
            cancel: CancelSignal::new(),
        });

        let prefix = name_prefix.clone();
        let on_exit = Arc::clone(&shared);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(size)
            .thread_name(move |i| format!("{}-{}", prefix, i))
            .panic_handler(|payload| {
                error!(panic = panic_message(payload.as_ref()), "work item panicked");
            })
            .exit_handler(move |_| on_exit.record_thread_exit())
            .build()
            .map_err(|e| PoolError::Build(e.to_string()))?;

        debug!(size, prefix = %name_prefix, "thread pool started");
        Ok(Self {
            pool: Some(pool),
            shared,
            name_prefix,
        })
    }
}

impl Executor for ThreadPoolExecutor {
    type Handle = PoolHandle;

    fn submit<W: WorkItem>(&self, item: W) -> Result<PoolHandle, PoolError> {
        let pool = self.pool.as_ref().ok_or(PoolError::Rejected)?;

        let done = Arc::new(AtomicBool::new(false));
        let guard = CompletionGuard {
            done: Arc::clone(&done),
            shared: Arc::clone(&self.shared),
        };
        let cancel = self.shared.cancel.clone();

        pool.spawn(move || {
            let _guard = guard;
            let mut item = item;
            if cancel.is_cancelled() {
                debug!(item = item.id(), "pool cancelled, skipping queued item");
                return;
            }
            item.run(&cancel);
        });

        Ok(PoolHandle { done })
    }

    fn shutdown(&mut self) {
        if let Some(pool) = self.pool.take() {
            drop(pool);
            debug!(prefix = %self.name_prefix, "thread pool no longer accepting work");
        }
    }

    fn shutdown_now(&mut self) {
        self.shared.cancel.cancel();
        self.shutdown();
    }

    fn await_termination(&self, timeout: Duration) -> bool {
        let state = self.shared.lock();
        let (state, _) = self
            .shared
            .changed
            .wait_timeout_while(state, timeout, |s| s.live_threads > 0)
            .unwrap_or_else(PoisonError::into_inner);
        state.live_threads == 0
    }

    fn is_terminated(&self) -> bool {
        self.pool.is_none() && self.shared.lock().live_threads == 0
    }

    fn wait_for_completion(&self, timeout: Duration) {
        let state = self.shared.lock();
        let seen = state.completions;
        let _ = self
            .shared
            .changed
            .wait_timeout_while(state, timeout, |s| s.completions == seen);
    }
}
