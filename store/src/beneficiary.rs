//! Beneficiary directory trait.

use crate::StoreError;
use relief_types::{Beneficiary, BeneficiaryId, ContactDetails, NationalId, NewBeneficiary};
use std::future::Future;

/// Lookup, creation and contact updates for beneficiary records.
pub trait BeneficiaryDirectory {
    /// `Ok(None)` means no beneficiary is registered under `national_id`.
    fn lookup_by_national_id(
        &self,
        national_id: &NationalId,
    ) -> impl Future<Output = Result<Option<Beneficiary>, StoreError>> + Send;

    /// Create the beneficiary and its credential in one backend call.
    fn create_beneficiary(
        &self,
        new: &NewBeneficiary,
    ) -> impl Future<Output = Result<BeneficiaryId, StoreError>> + Send;

    /// Persist a self-service edit of the contact fields.
    fn update_contact(
        &self,
        id: &BeneficiaryId,
        contact: &ContactDetails,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}
