//! Field-level rejection reasons shared across crates.

use crate::validation::Field;
use thiserror::Error;

/// Why a single piece of user input was rejected.
///
/// The `Display` output is the user-facing reason shown next to the field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("{0} is required")]
    Required(Field),

    #[error("national ID must be exactly 9 digits")]
    NationalIdFormat,

    #[error("PIN must be exactly 6 digits")]
    PinFormat,

    #[error("PIN mismatch")]
    PinMismatch,

    #[error("phone number must start with 05 and contain 10 digits")]
    PhoneFormat,

    #[error("household must have at least 1 member")]
    MembersCount,

    #[error("{0} cannot be changed")]
    Immutable(Field),
}
