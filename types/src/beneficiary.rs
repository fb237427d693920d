//! Beneficiary identity and case record.

use crate::national_id::NationalId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque, stable beneficiary identifier assigned by the backend.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BeneficiaryId(String);

impl BeneficiaryId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BeneficiaryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    #[default]
    Male,
    Female,
}

/// Review outcome for identity and eligibility checks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    Verified,
    #[default]
    Pending,
    Rejected,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    #[default]
    Active,
    Inactive,
}

impl AccountStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

/// Structured address as entered in the registration wizard.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetailedAddress {
    pub governorate: String,
    pub city: String,
    pub district: String,
    pub street: String,
    #[serde(alias = "additionalInfo")]
    pub additional_info: String,
}

impl DetailedAddress {
    /// Separator between address parts in the free-text form.
    pub const SEPARATOR: &'static str = " - ";

    /// Free-text summary: governorate, city and district joined by
    /// [`Self::SEPARATOR`], empty parts skipped.
    pub fn summary(&self) -> String {
        [&self.governorate, &self.city, &self.district]
            .into_iter()
            .map(|part| part.trim())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(Self::SEPARATOR)
    }
}

/// A beneficiary as returned by the backend.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Beneficiary {
    pub id: BeneficiaryId,
    pub national_id: NationalId,
    pub name: String,
    pub full_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub detailed_address: Option<DetailedAddress>,
    #[serde(default)]
    pub gender: Gender,
    #[serde(default)]
    pub identity_status: VerificationStatus,
    #[serde(default)]
    pub eligibility_status: VerificationStatus,
    #[serde(rename = "status", default)]
    pub account_status: AccountStatus,
    #[serde(default)]
    pub organization_id: Option<String>,
}

/// The subset of a beneficiary that self-service edits may change.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDetails {
    pub phone: String,
    pub address: String,
    pub detailed_address: Option<DetailedAddress>,
}

impl Beneficiary {
    /// Snapshot of the editable fields.
    pub fn contact(&self) -> ContactDetails {
        ContactDetails {
            phone: self.phone.clone(),
            address: self.address.clone(),
            detailed_address: self.detailed_address.clone(),
        }
    }

    /// Overwrite the editable fields. Nothing else is touched.
    pub fn apply_contact(&mut self, contact: ContactDetails) {
        self.phone = contact.phone;
        self.address = contact.address;
        self.detailed_address = contact.detailed_address;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Beneficiary {
        Beneficiary {
            id: BeneficiaryId::new("b-1"),
            national_id: NationalId::parse("123456789").unwrap(),
            name: "Mohammed".into(),
            full_name: "Mohammed Ahmed".into(),
            phone: "0591234567".into(),
            address: "Gaza - Rimal".into(),
            detailed_address: None,
            gender: Gender::Male,
            identity_status: VerificationStatus::Verified,
            eligibility_status: VerificationStatus::Pending,
            account_status: AccountStatus::Active,
            organization_id: None,
        }
    }

    #[test]
    fn address_summary_skips_empty_parts() {
        let addr = DetailedAddress {
            governorate: "Gaza".into(),
            city: "".into(),
            district: "Rimal".into(),
            ..Default::default()
        };
        assert_eq!(addr.summary(), "Gaza - Rimal");
        assert_eq!(DetailedAddress::default().summary(), "");
    }

    #[test]
    fn apply_contact_only_touches_editable_fields() {
        let mut b = sample();
        let before = b.clone();
        b.apply_contact(ContactDetails {
            phone: "0599999999".into(),
            ..before.contact()
        });
        assert_eq!(b.phone, "0599999999");
        assert_eq!(b.full_name, before.full_name);
        assert_eq!(b.identity_status, before.identity_status);
    }

    #[test]
    fn deserializes_backend_row() {
        let json = r#"{
            "id": "b-7",
            "national_id": "900123456",
            "name": "Sara",
            "full_name": "Sara Khaled",
            "phone": "0561112222",
            "address": "Rafah",
            "detailed_address": {"governorate": "Rafah", "city": "Rafah", "district": "Tal", "additionalInfo": "near school"},
            "gender": "female",
            "identity_status": "verified",
            "eligibility_status": "rejected",
            "status": "inactive",
            "organization_id": "org-3"
        }"#;
        let b: Beneficiary = serde_json::from_str(json).unwrap();
        assert_eq!(b.gender, Gender::Female);
        assert_eq!(b.account_status, AccountStatus::Inactive);
        assert_eq!(b.eligibility_status, VerificationStatus::Rejected);
        let detail = b.detailed_address.unwrap();
        assert_eq!(detail.additional_info, "near school");
        assert_eq!(detail.street, "");
    }
}
