use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use warmrun_core::CancelSignal;

use crate::error::TraceError;
use crate::work::WorkItem;

/// Tracing target for per-operation measurement lines.
pub const MEASUREMENT_TARGET: &str = "warmrun::measurements";

/// One step of a business process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub name: String,
    /// Simulated service time.
    #[serde(default)]
    pub latency_ms: u64,
    /// Free-form arguments passed to the executor.
    #[serde(default)]
    pub params: serde_json::Map<String, serde_json::Value>,
}

/// Executes individual operations against the system under test.
pub trait OperationExecutor: Send + Sync {
    fn execute(&self, op: &Operation) -> Result<(), TraceError>;
}

/// Executor that only sleeps for each operation's `latency_ms`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SimulatedExecutor;

impl OperationExecutor for SimulatedExecutor {
    fn execute(&self, op: &Operation) -> Result<(), TraceError> {
        if op.latency_ms > 0 {
            std::thread::sleep(Duration::from_millis(op.latency_ms));
        }
        Ok(())
    }
}

/// A pre-recorded sequence of operations executed as one unit.
pub struct BusinessProcess {
    id: String,
    /// Scheduled start relative to time zero, as recorded in the trace.
    start_offset_ms: i64,
    operations: Vec<Operation>,
    record_measurements: bool,
    do_timing: bool,
    log: Vec<String>,
    executor: Arc<dyn OperationExecutor>,
}

impl BusinessProcess {
    pub fn new(
        id: impl Into<String>,
        start_offset_ms: i64,
        operations: Vec<Operation>,
        executor: Arc<dyn OperationExecutor>,
    ) -> Self {
        Self {
            id: id.into(),
            start_offset_ms,
            operations,
            record_measurements: false,
            do_timing: true,
            log: Vec::new(),
            executor,
        }
    }

    /// Emit one measurement line per executed operation.
    pub fn with_measurements(mut self, enabled: bool) -> Self {
        self.record_measurements = enabled;
        self
    }

    pub fn start_offset_ms(&self) -> i64 {
        self.start_offset_ms
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn records_measurements(&self) -> bool {
        self.record_measurements
    }

    pub fn log_lines(&self) -> &[String] {
        &self.log
    }
}

impl fmt::Debug for BusinessProcess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BusinessProcess")
            .field("id", &self.id)
            .field("start_offset_ms", &self.start_offset_ms)
            .field("operations", &self.operations.len())
            .field("record_measurements", &self.record_measurements)
            .field("do_timing", &self.do_timing)
            .finish()
    }
}

impl WorkItem for BusinessProcess {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_timing(&mut self, enabled: bool) {
        self.do_timing = enabled;
    }

    fn timing_enabled(&self) -> bool {
        self.do_timing
    }

    fn append_log(&mut self, line: String) {
        self.log.push(line);
    }

    fn run(&mut self, cancel: &CancelSignal) {
        let started = Instant::now();
        let mut executed = 0usize;

        for op in &self.operations {
            if cancel.is_cancelled() {
                debug!(process = %self.id, executed, "cancelled before completing all operations");
                break;
            }

            let op_start = Instant::now();
            let outcome = self.executor.execute(op);
            let elapsed = op_start.elapsed();
            executed += 1;

            if let Err(e) = &outcome {
                warn!(process = %self.id, op = %op.name, error = %e, "operation failed");
            }
            if self.record_measurements && self.do_timing {
                info!(
                    target: MEASUREMENT_TARGET,
                    process = %self.id,
                    op = %op.name,
                    ok = outcome.is_ok(),
                    elapsed_us = elapsed.as_micros() as u64,
                    "operation"
                );
            }
        }

        if self.do_timing {
            info!(
                target: MEASUREMENT_TARGET,
                process = %self.id,
                scheduled_ms = self.start_offset_ms,
                executed,
                total_us = started.elapsed().as_micros() as u64,
                "process"
            );
        }

        for line in self.log.drain(..) {
            debug!(process = %self.id, "{}", line);
        }
    }
}
