//! Timestamp type used throughout the protocol.
//!
//! Timestamps are Unix epoch seconds (UTC), supplied by whatever serializes
//! calls into the engine (the host ledger's block time, or a clock in tests).

use serde::{Deserialize, Serialize};
use std::fmt;

/// A Unix timestamp in seconds since epoch (UTC).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Timestamp(u64);

impl Timestamp {
    /// The epoch (time zero).
    pub const EPOCH: Self = Self(0);

    pub fn new(secs: u64) -> Self {
        Self(secs)
    }

    pub fn as_secs(&self) -> u64 {
        self.0
    }

    /// Seconds elapsed since this timestamp (relative to `now`).
    ///
    /// Saturates at zero if `now` precedes this timestamp.
    pub fn elapsed_since(&self, now: Timestamp) -> u64 {
        now.0.saturating_sub(self.0)
    }

    /// Number of whole `period_secs` periods between this timestamp and `now`.
    ///
    /// A zero-length period yields zero periods.
    pub fn whole_periods_until(&self, now: Timestamp, period_secs: u64) -> u64 {
        if period_secs == 0 {
            return 0;
        }
        self.elapsed_since(now) / period_secs
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}
