//! PIN-protected authentication record, one per beneficiary.

use crate::beneficiary::BeneficiaryId;
use crate::national_id::NationalId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One-way hash of a PIN in an encoded, self-describing form.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PinHash(String);

impl PinHash {
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PinHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PinHash(..)")
    }
}

/// Proof that a beneficiary has opted into edit protection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthCredential {
    pub beneficiary_id: BeneficiaryId,
    pub national_id: NationalId,
    #[serde(rename = "password_hash")]
    pub pin_hash: PinHash,
}
