//! Aid package listing trait.

use crate::StoreError;
use relief_types::{AidPackage, BeneficiaryId};
use std::future::Future;

pub trait PackageStore {
    fn list_packages(
        &self,
        beneficiary_id: &BeneficiaryId,
    ) -> impl Future<Output = Result<Vec<AidPackage>, StoreError>> + Send;
}
