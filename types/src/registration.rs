//! Payload for creating a beneficiary through self-registration.

use crate::beneficiary::{DetailedAddress, Gender};
use crate::credential::PinHash;
use crate::national_id::NationalId;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaritalStatus {
    #[default]
    Single,
    Married,
    Divorced,
    Widowed,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EconomicLevel {
    VeryPoor,
    #[default]
    Poor,
    Moderate,
    Good,
}

/// Everything the backend needs to create a beneficiary and its credential.
///
/// Carries the PIN only as a hash.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewBeneficiary {
    pub name: String,
    pub full_name: String,
    pub national_id: NationalId,
    pub date_of_birth: String,
    pub gender: Gender,
    pub phone: String,
    pub address: String,
    pub detailed_address: DetailedAddress,
    pub profession: String,
    pub marital_status: MaritalStatus,
    pub economic_level: EconomicLevel,
    pub members_count: u32,
    pub notes: String,
    pub pin_hash: PinHash,
}
