//! Trace sources and the business processes they produce.
//!
//! A trace is a line-oriented file with one business process per line. The
//! sources here turn it into a lazy sequence of [`WorkItem`]s for a
//! scheduler to execute.

pub mod error;
pub mod file;
pub mod parser;
pub mod process;
pub mod source;
pub mod work;

pub use error::TraceError;
pub use file::FileTraceSource;
pub use parser::parse_line;
pub use process::{BusinessProcess, Operation, OperationExecutor, SimulatedExecutor};
pub use source::{TraceSource, VecTraceSource};
pub use work::WorkItem;
