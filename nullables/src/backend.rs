//! Nullable backend: thread-safe in-memory service for testing.

use relief_store::{AuditLog, BeneficiaryDirectory, CredentialStore, PackageStore, StoreError};
use relief_types::{
    AccountStatus, AidPackage, AuditEntry, AuthCredential, Beneficiary, BeneficiaryId,
    ContactDetails, NationalId, NewBeneficiary, PinHash, VerificationStatus,
};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// A backend call that can be observed, failed or stalled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    Lookup,
    CreateBeneficiary,
    UpdateContact,
    GetCredential,
    CreateCredential,
    RevokeCredential,
    ListPackages,
    RecordAudit,
}

/// An in-memory implementation of every backend trait.
///
/// Failures injected with [`NullBackend::fail`] persist until
/// [`NullBackend::recover`] is called. Stalled operations never complete,
/// which lets tests exercise the portal's timeout policy.
pub struct NullBackend {
    beneficiaries: Mutex<HashMap<NationalId, Beneficiary>>,
    credentials: Mutex<HashMap<BeneficiaryId, AuthCredential>>,
    packages: Mutex<Vec<AidPackage>>,
    audit: Mutex<Vec<AuditEntry>>,
    registrations: Mutex<Vec<NewBeneficiary>>,
    calls: Mutex<Vec<Operation>>,
    failing: Mutex<HashSet<Operation>>,
    stalled: Mutex<HashSet<Operation>>,
    next_id: AtomicU64,
}

impl NullBackend {
    pub fn new() -> Self {
        Self {
            beneficiaries: Mutex::new(HashMap::new()),
            credentials: Mutex::new(HashMap::new()),
            packages: Mutex::new(Vec::new()),
            audit: Mutex::new(Vec::new()),
            registrations: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
            failing: Mutex::new(HashSet::new()),
            stalled: Mutex::new(HashSet::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Seed a beneficiary.
    pub fn insert_beneficiary(&self, beneficiary: Beneficiary) {
        self.beneficiaries
            .lock()
            .unwrap()
            .insert(beneficiary.national_id.clone(), beneficiary);
    }

    /// Seed a credential.
    pub fn insert_credential(&self, credential: AuthCredential) {
        self.credentials
            .lock()
            .unwrap()
            .insert(credential.beneficiary_id.clone(), credential);
    }

    /// Seed a package.
    pub fn insert_package(&self, package: AidPackage) {
        self.packages.lock().unwrap().push(package);
    }

    /// Make `op` fail until recovered.
    pub fn fail(&self, op: Operation) {
        self.failing.lock().unwrap().insert(op);
    }

    /// Make `op` hang forever.
    pub fn stall(&self, op: Operation) {
        self.stalled.lock().unwrap().insert(op);
    }

    /// Clear injected failures and stalls for `op`.
    pub fn recover(&self, op: Operation) {
        self.failing.lock().unwrap().remove(&op);
        self.stalled.lock().unwrap().remove(&op);
    }

    pub fn beneficiary(&self, national_id: &NationalId) -> Option<Beneficiary> {
        self.beneficiaries.lock().unwrap().get(national_id).cloned()
    }

    pub fn credential(&self, beneficiary_id: &BeneficiaryId) -> Option<AuthCredential> {
        self.credentials.lock().unwrap().get(beneficiary_id).cloned()
    }

    pub fn credential_count(&self) -> usize {
        self.credentials.lock().unwrap().len()
    }

    /// All audit entries recorded so far, oldest first.
    pub fn audit_entries(&self) -> Vec<AuditEntry> {
        self.audit.lock().unwrap().clone()
    }

    /// All registration payloads received so far.
    pub fn registrations(&self) -> Vec<NewBeneficiary> {
        self.registrations.lock().unwrap().clone()
    }

    /// Every call made, in order, including failed ones.
    pub fn calls(&self) -> Vec<Operation> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, op: Operation) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| **c == op).count()
    }

    /// Record the call, then stall or fail it if told to.
    async fn enter(&self, op: Operation) -> Result<(), StoreError> {
        self.calls.lock().unwrap().push(op);
        let stalled = self.stalled.lock().unwrap().contains(&op);
        if stalled {
            std::future::pending::<()>().await;
        }
        if self.failing.lock().unwrap().contains(&op) {
            return Err(StoreError::Unavailable(format!("{op:?} failed (injected)")));
        }
        Ok(())
    }
}

impl Default for NullBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl BeneficiaryDirectory for NullBackend {
    async fn lookup_by_national_id(
        &self,
        national_id: &NationalId,
    ) -> Result<Option<Beneficiary>, StoreError> {
        self.enter(Operation::Lookup).await?;
        Ok(self.beneficiary(national_id))
    }

    async fn create_beneficiary(&self, new: &NewBeneficiary) -> Result<BeneficiaryId, StoreError> {
        self.enter(Operation::CreateBeneficiary).await?;
        let mut beneficiaries = self.beneficiaries.lock().unwrap();
        if beneficiaries.contains_key(&new.national_id) {
            return Err(StoreError::Duplicate(new.national_id.to_string()));
        }

        let id = BeneficiaryId::new(format!(
            "ben-{:04}",
            self.next_id.fetch_add(1, Ordering::SeqCst)
        ));
        beneficiaries.insert(
            new.national_id.clone(),
            Beneficiary {
                id: id.clone(),
                national_id: new.national_id.clone(),
                name: new.name.clone(),
                full_name: new.full_name.clone(),
                phone: new.phone.clone(),
                address: new.address.clone(),
                detailed_address: Some(new.detailed_address.clone()),
                gender: new.gender,
                identity_status: VerificationStatus::Pending,
                eligibility_status: VerificationStatus::Pending,
                account_status: AccountStatus::Active,
                organization_id: None,
            },
        );
        self.credentials.lock().unwrap().insert(
            id.clone(),
            AuthCredential {
                beneficiary_id: id.clone(),
                national_id: new.national_id.clone(),
                pin_hash: new.pin_hash.clone(),
            },
        );
        self.registrations.lock().unwrap().push(new.clone());
        Ok(id)
    }

    async fn update_contact(
        &self,
        id: &BeneficiaryId,
        contact: &ContactDetails,
    ) -> Result<(), StoreError> {
        self.enter(Operation::UpdateContact).await?;
        let mut beneficiaries = self.beneficiaries.lock().unwrap();
        let record = beneficiaries
            .values_mut()
            .find(|b| &b.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        record.apply_contact(contact.clone());
        Ok(())
    }
}

impl CredentialStore for NullBackend {
    async fn get_credential(
        &self,
        national_id: &NationalId,
    ) -> Result<Option<AuthCredential>, StoreError> {
        self.enter(Operation::GetCredential).await?;
        Ok(self
            .credentials
            .lock()
            .unwrap()
            .values()
            .find(|c| &c.national_id == national_id)
            .cloned())
    }

    async fn create_credential(
        &self,
        beneficiary_id: &BeneficiaryId,
        national_id: &NationalId,
        pin_hash: &PinHash,
    ) -> Result<(), StoreError> {
        self.enter(Operation::CreateCredential).await?;
        let mut credentials = self.credentials.lock().unwrap();
        if credentials.contains_key(beneficiary_id) {
            return Err(StoreError::Duplicate(beneficiary_id.to_string()));
        }
        credentials.insert(
            beneficiary_id.clone(),
            AuthCredential {
                beneficiary_id: beneficiary_id.clone(),
                national_id: national_id.clone(),
                pin_hash: pin_hash.clone(),
            },
        );
        Ok(())
    }

    async fn revoke_credential(&self, beneficiary_id: &BeneficiaryId) -> Result<(), StoreError> {
        self.enter(Operation::RevokeCredential).await?;
        self.credentials
            .lock()
            .unwrap()
            .remove(beneficiary_id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(beneficiary_id.to_string()))
    }
}

impl PackageStore for NullBackend {
    async fn list_packages(
        &self,
        beneficiary_id: &BeneficiaryId,
    ) -> Result<Vec<AidPackage>, StoreError> {
        self.enter(Operation::ListPackages).await?;
        Ok(self
            .packages
            .lock()
            .unwrap()
            .iter()
            .filter(|p| &p.beneficiary_id == beneficiary_id)
            .cloned()
            .collect())
    }
}

impl AuditLog for NullBackend {
    async fn record(&self, entry: &AuditEntry) -> Result<(), StoreError> {
        self.enter(Operation::RecordAudit).await?;
        self.audit.lock().unwrap().push(entry.clone());
        Ok(())
    }
}
