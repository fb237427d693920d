//! Aid packages delivered to beneficiaries.

use crate::amount::MoneyAmount;
use crate::beneficiary::BeneficiaryId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackageId(String);

impl PackageId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fulfilment stage of a package: pending → assigned → in_delivery → delivered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackageStatus {
    Pending,
    Assigned,
    InDelivery,
    Delivered,
}

impl PackageStatus {
    /// Already in the beneficiary's hands.
    pub fn is_received(&self) -> bool {
        matches!(self, Self::Delivered)
    }

    /// Still moving through fulfilment.
    pub fn is_upcoming(&self) -> bool {
        matches!(self, Self::Pending | Self::Assigned | Self::InDelivery)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AidPackage {
    pub id: PackageId,
    pub beneficiary_id: BeneficiaryId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub status: PackageStatus,
    pub value: MoneyAmount,
    #[serde(default)]
    pub funder: String,
    /// Present iff `status` is `Delivered`.
    #[serde(default)]
    pub delivered_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn received_and_upcoming_partition_every_status() {
        for status in [
            PackageStatus::Pending,
            PackageStatus::Assigned,
            PackageStatus::InDelivery,
            PackageStatus::Delivered,
        ] {
            assert_ne!(status.is_received(), status.is_upcoming());
        }
    }

    #[test]
    fn deserializes_delivered_row() {
        let json = r#"{
            "id": "p-1",
            "beneficiary_id": "b-1",
            "name": "Food basket",
            "description": "Monthly",
            "status": "delivered",
            "value": 150,
            "funder": "WFP",
            "delivered_at": "2024-01-15T10:30:00Z"
        }"#;
        let pkg: AidPackage = serde_json::from_str(json).unwrap();
        assert_eq!(pkg.status, PackageStatus::Delivered);
        assert_eq!(pkg.value.minor(), 15000);
        assert!(pkg.delivered_at.is_some());
    }

    #[test]
    fn in_delivery_uses_snake_case() {
        let status: PackageStatus = serde_json::from_str("\"in_delivery\"").unwrap();
        assert_eq!(status, PackageStatus::InDelivery);
    }
}
