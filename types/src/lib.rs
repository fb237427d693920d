//! Fundamental types for the relief portal.
//!
//! This crate defines the vocabulary shared across every other crate in the workspace:
//! beneficiary and package records, credentials, audit entries, national IDs and PINs,
//! timestamps, and the pure validation rules that gate every portal transition.

pub mod amount;
pub mod audit;
pub mod beneficiary;
pub mod credential;
pub mod error;
pub mod national_id;
pub mod package;
pub mod pin;
pub mod registration;
pub mod time;
pub mod validation;

pub use amount::MoneyAmount;
pub use audit::{AuditAction, AuditEntry, SubjectKind, Visibility};
pub use beneficiary::{
    AccountStatus, Beneficiary, BeneficiaryId, ContactDetails, DetailedAddress, Gender,
    VerificationStatus,
};
pub use credential::{AuthCredential, PinHash};
pub use error::Rejection;
pub use national_id::NationalId;
pub use package::{AidPackage, PackageId, PackageStatus};
pub use pin::Pin;
pub use registration::{EconomicLevel, MaritalStatus, NewBeneficiary};
pub use time::{Clock, SystemClock, Timestamp};
pub use validation::{Field, FieldErrors};
