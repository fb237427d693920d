//! Credential storage trait.

use crate::StoreError;
use relief_types::{AuthCredential, BeneficiaryId, NationalId, PinHash};
use std::future::Future;

/// At most one credential exists per beneficiary.
pub trait CredentialStore {
    fn get_credential(
        &self,
        national_id: &NationalId,
    ) -> impl Future<Output = Result<Option<AuthCredential>, StoreError>> + Send;

    /// Fails with [`StoreError::Duplicate`] if the beneficiary already has one.
    fn create_credential(
        &self,
        beneficiary_id: &BeneficiaryId,
        national_id: &NationalId,
        pin_hash: &PinHash,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Remove a credential. Only used to compensate a failed profile update
    /// that followed a successful creation.
    fn revoke_credential(
        &self,
        beneficiary_id: &BeneficiaryId,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}
