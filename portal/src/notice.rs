//! Transient success notices.

use crate::badge::Tone;
use relief_types::Timestamp;
use std::time::Duration;

/// A message that disappears on its own once `lifetime` has passed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub tone: Tone,
    pub shown_at: Timestamp,
    pub lifetime: Duration,
}

impl Notice {
    pub fn success(message: impl Into<String>, now: Timestamp, lifetime: Duration) -> Self {
        Self {
            message: message.into(),
            tone: Tone::Success,
            shown_at: now,
            lifetime,
        }
    }

    pub fn is_active(&self, now: Timestamp) -> bool {
        !self.shown_at.has_expired(self.lifetime, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expires_after_lifetime() {
        let notice = Notice::success("saved", Timestamp::from_millis(1_000), Duration::from_secs(3));
        assert!(notice.is_active(Timestamp::from_millis(1_000)));
        assert!(notice.is_active(Timestamp::from_millis(3_999)));
        assert!(!notice.is_active(Timestamp::from_millis(4_000)));
    }

    #[test]
    fn zero_lifetime_is_never_shown() {
        let notice = Notice::success("saved", Timestamp::from_millis(1_000), Duration::ZERO);
        assert!(!notice.is_active(Timestamp::from_millis(1_000)));
    }
}
