use warmrun_core::CancelSignal;

/// A unit of executable work handed to a worker pool.
///
/// Ownership moves into the pool on submission; the scheduler keeps only
/// the completion handle the pool returns.
pub trait WorkItem: Send + 'static {
    /// Identity used in log lines.
    fn id(&self) -> &str;

    /// Enable or disable fine-grained timing output for this item.
    fn set_timing(&mut self, enabled: bool);

    fn timing_enabled(&self) -> bool;

    /// Append a line to the item's detailed log.
    fn append_log(&mut self, line: String);

    /// Execute the item. `cancel` fires when the pool is force-stopped;
    /// honouring it is up to the item.
    fn run(&mut self, cancel: &CancelSignal);
}
