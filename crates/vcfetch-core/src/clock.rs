//! Time source and blocking sleep used by the retry loop.
//!
//! The engine never calls `SystemTime::now` or `std::thread::sleep` directly;
//! it goes through a [`Clock`] so tests can run the loop without real delays.

use std::cell::{Cell, RefCell};
use std::time::{Duration, SystemTime};

/// Wall-clock source plus a blocking wait.
pub trait Clock {
    /// Current wall-clock time. Absolute `Retry-After` dates are measured against it.
    fn now(&self) -> SystemTime;

    /// Block the calling thread for `duration`.
    fn sleep(&self, duration: Duration);
}

/// Real clock: `SystemTime::now` and `std::thread::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Deterministic clock: `sleep` returns immediately and advances `now`.
///
/// Every requested sleep is recorded so callers can assert on the schedule.
#[derive(Debug)]
pub struct ManualClock {
    now: Cell<SystemTime>,
    sleeps: RefCell<Vec<Duration>>,
}

impl ManualClock {
    pub fn new(start: SystemTime) -> Self {
        Self {
            now: Cell::new(start),
            sleeps: RefCell::new(Vec::new()),
        }
    }

    /// Move the clock forward without recording a sleep.
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    /// Sleeps requested so far, in order.
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.borrow().clone()
    }

    /// Sum of all recorded sleeps.
    pub fn total_slept(&self) -> Duration {
        self.sleeps.borrow().iter().sum()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> SystemTime {
        self.now.get()
    }

    fn sleep(&self, duration: Duration) {
        self.sleeps.borrow_mut().push(duration);
        self.advance(duration);
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> SystemTime {
        (**self).now()
    }

    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::UNIX_EPOCH;

    #[test]
    fn manual_clock_sleep_advances_now_and_records() {
        let start = UNIX_EPOCH + Duration::from_secs(1_000);
        let clock = ManualClock::new(start);
        clock.sleep(Duration::from_secs(2));
        clock.sleep(Duration::from_millis(500));
        assert_eq!(clock.now(), start + Duration::from_millis(2_500));
        assert_eq!(
            clock.sleeps(),
            vec![Duration::from_secs(2), Duration::from_millis(500)]
        );
        assert_eq!(clock.total_slept(), Duration::from_millis(2_500));
    }

    #[test]
    fn manual_clock_advance_is_not_a_sleep() {
        let start = UNIX_EPOCH;
        let clock = ManualClock::new(start);
        clock.advance(Duration::from_secs(10));
        assert_eq!(clock.now(), start + Duration::from_secs(10));
        assert!(clock.sleeps().is_empty());
    }

    #[test]
    fn system_clock_sleep_waits_at_least_requested() {
        let clock = SystemClock;
        let before = std::time::Instant::now();
        clock.sleep(Duration::from_millis(20));
        assert!(before.elapsed() >= Duration::from_millis(20));
    }
}
