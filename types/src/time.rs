//! Timestamp and clock used for notice expiry.
//!
//! Timestamps are Unix epoch milliseconds (UTC). The portal never reads the
//! system clock directly; it asks a [`Clock`], which tests replace with a
//! deterministic one.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// A Unix timestamp in milliseconds since epoch (UTC).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(u64);

impl Timestamp {
    /// The epoch (time zero).
    pub const EPOCH: Self = Self(0);

    pub fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    pub fn from_secs(secs: u64) -> Self {
        Self(secs.saturating_mul(1000))
    }

    /// Get the current system time as a `Timestamp`.
    pub fn now() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        Self(millis)
    }

    pub fn as_millis(&self) -> u64 {
        self.0
    }

    /// This timestamp shifted forward by `duration`.
    pub fn after(&self, duration: Duration) -> Self {
        Self(self.0.saturating_add(duration.as_millis() as u64))
    }

    /// Whether this timestamp + duration has passed relative to `now`.
    pub fn has_expired(&self, duration: Duration, now: Timestamp) -> bool {
        now >= self.after(duration)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Wall-clock time.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn after_saturates() {
        let end = Timestamp::from_millis(u64::MAX - 1).after(Duration::from_secs(1));
        assert_eq!(end.as_millis(), u64::MAX);
    }

    #[test]
    fn expiry_is_inclusive() {
        let start = Timestamp::from_secs(10);
        let window = Duration::from_secs(3);
        assert!(!start.has_expired(window, Timestamp::from_millis(12_999)));
        assert!(start.has_expired(window, Timestamp::from_secs(13)));
    }
}
