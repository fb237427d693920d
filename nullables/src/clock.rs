//! Nullable clock: deterministic time for testing.

use relief_types::{Clock, Timestamp};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// A deterministic clock for testing.
///
/// Time only advances when you tell it to.
pub struct NullClock {
    current_millis: AtomicU64,
}

impl NullClock {
    pub fn new(initial_millis: u64) -> Self {
        Self {
            current_millis: AtomicU64::new(initial_millis),
        }
    }

    /// Advance time by `by`.
    pub fn advance(&self, by: Duration) {
        self.current_millis
            .fetch_add(by.as_millis() as u64, Ordering::SeqCst);
    }

    /// Set the time to a specific value.
    pub fn set(&self, millis: u64) {
        self.current_millis.store(millis, Ordering::SeqCst);
    }
}

impl Default for NullClock {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Clock for NullClock {
    fn now(&self) -> Timestamp {
        Timestamp::from_millis(self.current_millis.load(Ordering::SeqCst))
    }
}
