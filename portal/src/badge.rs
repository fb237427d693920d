//! Status badges.
//!
//! Every status enum maps to a label and tone through an exhaustive match, so
//! a new status is a compile error here rather than a silent fallback.

use relief_types::{AccountStatus, PackageStatus, VerificationStatus};
use serde::Serialize;

/// Visual weight of a badge or notice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Success,
    Warning,
    Danger,
    Info,
    Progress,
    Neutral,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Badge {
    pub label: &'static str,
    pub tone: Tone,
}

impl Badge {
    const fn new(label: &'static str, tone: Tone) -> Self {
        Self { label, tone }
    }
}

pub trait Badged {
    fn badge(&self) -> Badge;
}

impl Badged for VerificationStatus {
    fn badge(&self) -> Badge {
        match self {
            Self::Verified => Badge::new("Verified", Tone::Success),
            Self::Pending => Badge::new("Under review", Tone::Warning),
            Self::Rejected => Badge::new("Rejected", Tone::Danger),
        }
    }
}

impl Badged for PackageStatus {
    fn badge(&self) -> Badge {
        match self {
            Self::Delivered => Badge::new("Delivered", Tone::Success),
            Self::InDelivery => Badge::new("Out for delivery", Tone::Progress),
            Self::Assigned => Badge::new("Being prepared", Tone::Info),
            Self::Pending => Badge::new("Waiting", Tone::Neutral),
        }
    }
}

impl Badged for AccountStatus {
    fn badge(&self) -> Badge {
        match self {
            Self::Active => Badge::new("Active", Tone::Success),
            Self::Inactive => Badge::new("Inactive", Tone::Neutral),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verification_tones() {
        assert_eq!(VerificationStatus::Verified.badge().tone, Tone::Success);
        assert_eq!(VerificationStatus::Pending.badge().tone, Tone::Warning);
        assert_eq!(VerificationStatus::Rejected.badge().tone, Tone::Danger);
    }

    #[test]
    fn package_labels_are_distinct() {
        let labels: std::collections::HashSet<_> = [
            PackageStatus::Pending,
            PackageStatus::Assigned,
            PackageStatus::InDelivery,
            PackageStatus::Delivered,
        ]
        .iter()
        .map(|s| s.badge().label)
        .collect();
        assert_eq!(labels.len(), 4);
    }

    #[test]
    fn account_badge() {
        assert_eq!(AccountStatus::Active.badge().label, "Active");
        assert_eq!(AccountStatus::Inactive.badge().tone, Tone::Neutral);
    }
}
