//! Nullable clock: deterministic time for testing.

use std::cell::Cell;
use vow_types::Timestamp;

/// A deterministic clock for testing.
///
/// Time only advances when you tell it to.
pub struct NullClock {
    current: Cell<u64>,
}

impl NullClock {
    pub fn new(initial_secs: u64) -> Self {
        Self {
            current: Cell::new(initial_secs),
        }
    }

    /// Get the current time.
    pub fn now(&self) -> Timestamp {
        Timestamp::new(self.current.get())
    }

    /// Advance time by a number of seconds, returning the new time.
    pub fn advance(&self, secs: u64) -> Timestamp {
        self.current.set(self.current.get() + secs);
        self.now()
    }

    /// Advance time by `count` whole periods of `period_secs`.
    pub fn advance_periods(&self, count: u64, period_secs: u64) -> Timestamp {
        self.advance(count * period_secs)
    }

    /// Set the time to a specific value.
    pub fn set(&self, secs: u64) {
        self.current.set(secs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advances_only_on_request() {
        let clock = NullClock::new(1_000);
        assert_eq!(clock.now(), Timestamp::new(1_000));
        assert_eq!(clock.now(), Timestamp::new(1_000));
        assert_eq!(clock.advance(5), Timestamp::new(1_005));
        assert_eq!(clock.advance_periods(3, 60), Timestamp::new(1_185));
        clock.set(10);
        assert_eq!(clock.now(), Timestamp::new(10));
    }
}
