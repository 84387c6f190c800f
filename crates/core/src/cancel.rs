use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared, sticky cancellation flag.
///
/// Clones observe the same flag. Once cancelled, a signal stays cancelled.
#[derive(Debug, Clone, Default)]
pub struct CancelSignal {
    flag: Arc<AtomicBool>,
}

impl CancelSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Every clone observes it.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_flag() {
        let signal = CancelSignal::new();
        let other = signal.clone();
        assert!(!other.is_cancelled());

        signal.cancel();
        assert!(other.is_cancelled());
        assert!(signal.is_cancelled());
    }

    #[test]
    fn cancel_is_sticky() {
        let signal = CancelSignal::new();
        signal.cancel();
        signal.cancel();
        assert!(signal.is_cancelled());
    }
}
