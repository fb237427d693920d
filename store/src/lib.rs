//! Abstract backend traits for the relief portal.
//!
//! Beneficiary lookup, credential storage, package listing and the audit
//! sink all live behind an external service. Every backend (REST, in-memory
//! for testing) implements these traits. The portal depends only on the traits.
//!
//! Methods return `Send` futures so the portal can drive them under a
//! timeout from any runtime thread.

pub mod audit;
pub mod beneficiary;
pub mod credential;
pub mod error;
pub mod package;

pub use audit::AuditLog;
pub use beneficiary::BeneficiaryDirectory;
pub use credential::CredentialStore;
pub use error::StoreError;
pub use package::PackageStore;

/// Everything the portal needs from the backend, in one bound.
pub trait Backend:
    BeneficiaryDirectory + CredentialStore + PackageStore + AuditLog + Send + Sync
{
}

impl<T> Backend for T where
    T: BeneficiaryDirectory + CredentialStore + PackageStore + AuditLog + Send + Sync
{
}
