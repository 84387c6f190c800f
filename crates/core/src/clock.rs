//! Reference clock shared by every scheduler of a benchmark run.
//!
//! All times are expressed relative to a single "time zero": the start
//! boundary of the measured experiment. Negative values lie before it.

use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::cancel::CancelSignal;

/// Upper bound for one sleep slice while waiting, so cancellation is
/// noticed promptly.
const WAIT_SLICE: Duration = Duration::from_millis(5);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClockError {
    #[error("interrupted while waiting for relative time {offset_ms}ms")]
    Interrupted { offset_ms: i64 },
}

/// Source of run-relative time.
pub trait Clock: Send + Sync {
    /// Milliseconds elapsed since time zero (negative before it).
    fn now_relative_ms(&self) -> i64;

    /// Block until `now_relative_ms() >= offset_ms`.
    ///
    /// Returns immediately when the instant has already passed. Fails with
    /// [`ClockError::Interrupted`] if `cancel` fires while waiting.
    fn wait_until_relative(&self, offset_ms: i64, cancel: &CancelSignal) -> Result<(), ClockError> {
        loop {
            let remaining = offset_ms - self.now_relative_ms();
            if remaining <= 0 {
                return Ok(());
            }
            if cancel.is_cancelled() {
                return Err(ClockError::Interrupted { offset_ms });
            }
            let slice = Duration::from_millis(remaining as u64).min(WAIT_SLICE);
            std::thread::sleep(slice);
        }
    }
}

/// Wall-clock implementation anchored at a fixed UTC instant.
#[derive(Debug, Clone, Copy)]
pub struct ReferenceClock {
    time_zero: DateTime<Utc>,
}

impl ReferenceClock {
    pub fn starting_at(time_zero: DateTime<Utc>) -> Self {
        Self { time_zero }
    }

    /// Time zero lies `delay` in the future.
    pub fn starting_in(delay: Duration) -> Self {
        let delay = chrono::Duration::from_std(delay).unwrap_or(chrono::Duration::zero());
        Self::starting_at(Utc::now() + delay)
    }

    pub fn started_now() -> Self {
        Self::starting_at(Utc::now())
    }

    pub fn time_zero(&self) -> DateTime<Utc> {
        self.time_zero
    }
}

impl Clock for ReferenceClock {
    fn now_relative_ms(&self) -> i64 {
        Utc::now()
            .signed_duration_since(self.time_zero)
            .num_milliseconds()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;

    #[test]
    fn relative_time_is_negative_before_time_zero() {
        let clock = ReferenceClock::starting_in(Duration::from_secs(60));
        assert!(clock.now_relative_ms() < -50_000);
    }

    #[test]
    fn wait_returns_immediately_once_passed() {
        let clock = ReferenceClock::starting_at(Utc::now() - chrono::Duration::seconds(5));
        let start = Instant::now();
        clock.wait_until_relative(-1, &CancelSignal::new()).unwrap();
        assert!(start.elapsed() < Duration::from_millis(50));
    }

    #[test]
    fn wait_ignores_cancel_when_instant_already_reached() {
        let clock = ReferenceClock::started_now();
        let cancel = CancelSignal::new();
        cancel.cancel();
        assert!(clock.wait_until_relative(-1, &cancel).is_ok());
    }

    #[test]
    fn wait_blocks_until_time_zero() {
        let clock = ReferenceClock::starting_in(Duration::from_millis(40));
        let start = Instant::now();
        clock.wait_until_relative(0, &CancelSignal::new()).unwrap();
        assert!(start.elapsed() >= Duration::from_millis(30));
        assert!(clock.now_relative_ms() >= 0);
    }

    #[test]
    fn wait_is_interrupted_by_cancel() {
        let clock = ReferenceClock::starting_in(Duration::from_secs(60));
        let cancel = CancelSignal::new();
        let trigger = cancel.clone();
        let handle = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(20));
            trigger.cancel();
        });

        let start = Instant::now();
        let err = clock.wait_until_relative(-1, &cancel).unwrap_err();
        handle.join().unwrap();

        assert_eq!(err, ClockError::Interrupted { offset_ms: -1 });
        assert!(start.elapsed() < Duration::from_secs(5));
    }
}
