//! Sequential scheduler -- drains a trace through a fixed-size pool as fast
//! as the pool allows, ignoring the timestamps recorded in the trace.
//!
//! Used for preload and warm-up phases where throughput matters and timing
//! fidelity does not.
//!
//! Split into focused submodules:
//! - `core`: scheduler struct and accessors
//! - `builder`: construction and validation
//! - `execution`: start gate and the main pull/submit loop
//! - `admission`: bounding the in-flight set to the worker count
//! - `shutdown`: timeout-bounded pool shutdown

mod admission;
mod builder;
mod core;
mod execution;
mod shutdown;

pub use self::builder::SchedulerBuilder;
pub use self::core::SequentialScheduler;
