use std::collections::VecDeque;

use crate::work::WorkItem;

/// Lazy, finite sequence of work items.
///
/// `next_item` may return `None` without the sequence being over ("no item
/// right now"); only `is_exhausted` signals the end.
pub trait TraceSource: Send {
    type Item: WorkItem;

    /// True once no further item will ever be produced.
    fn is_exhausted(&self) -> bool;

    /// Pull the next item, or `None` if nothing is available at the moment.
    fn next_item(&mut self) -> Option<Self::Item>;
}

/// In-memory trace. `None` entries model transient empty pulls.
#[derive(Debug)]
pub struct VecTraceSource<W> {
    entries: VecDeque<Option<W>>,
}

impl<W: WorkItem> VecTraceSource<W> {
    pub fn new(entries: Vec<Option<W>>) -> Self {
        Self {
            entries: entries.into(),
        }
    }

    /// Trace without transient gaps.
    pub fn from_items(items: Vec<W>) -> Self {
        Self::new(items.into_iter().map(Some).collect())
    }

    pub fn remaining(&self) -> usize {
        self.entries.len()
    }
}

impl<W: WorkItem> TraceSource for VecTraceSource<W> {
    type Item = W;

    fn is_exhausted(&self) -> bool {
        self.entries.is_empty()
    }

    fn next_item(&mut self) -> Option<W> {
        self.entries.pop_front().flatten()
    }
}
