//! Pure validation rules over raw user input.
//!
//! Every predicate is deterministic and has no hidden state: the same input
//! always yields the same verdict. The `check_*` forms carry the user-facing
//! reason; the `is_valid_*` forms are the plain boolean predicates.

use crate::error::Rejection;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Length of a national identity number.
pub const NATIONAL_ID_LEN: usize = 9;
/// Length of a self-service PIN.
pub const PIN_LEN: usize = 6;
/// Length of a mobile phone number, including the `05` prefix.
pub const PHONE_LEN: usize = 10;
/// Required prefix of a mobile phone number.
pub const PHONE_PREFIX: &str = "05";

/// An input field that can carry a validation error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Name,
    FullName,
    NationalId,
    DateOfBirth,
    Phone,
    Governorate,
    City,
    District,
    Profession,
    MembersCount,
    Pin,
    ConfirmPin,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Name => "name",
            Self::FullName => "full name",
            Self::NationalId => "national ID",
            Self::DateOfBirth => "date of birth",
            Self::Phone => "phone number",
            Self::Governorate => "governorate",
            Self::City => "city",
            Self::District => "district",
            Self::Profession => "profession",
            Self::MembersCount => "household members",
            Self::Pin => "PIN",
            Self::ConfirmPin => "PIN confirmation",
        };
        f.write_str(label)
    }
}

/// Field-scoped validation errors, at most one reason per field.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<Field, Rejection>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a rejection for `field`, replacing any earlier one.
    pub fn insert(&mut self, field: Field, reason: Rejection) {
        self.0.insert(field, reason);
    }

    /// Record the outcome of a check, ignoring passes.
    pub fn record(&mut self, field: Field, verdict: Result<(), Rejection>) {
        if let Err(reason) = verdict {
            self.insert(field, reason);
        }
    }

    pub fn get(&self, field: Field) -> Option<Rejection> {
        self.0.get(&field).copied()
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    pub fn remove(&mut self, field: Field) -> Option<Rejection> {
        self.0.remove(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, Rejection)> + '_ {
        self.0.iter().map(|(f, r)| (*f, *r))
    }

    /// `Ok(())` when empty, otherwise the collected errors.
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, reason) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {reason}")?;
            first = false;
        }
        Ok(())
    }
}

fn all_digits(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}

/// Exactly 9 ASCII decimal digits.
pub fn check_national_id(s: &str) -> Result<(), Rejection> {
    if s.len() == NATIONAL_ID_LEN && all_digits(s) {
        Ok(())
    } else {
        Err(Rejection::NationalIdFormat)
    }
}

pub fn is_valid_national_id(s: &str) -> bool {
    check_national_id(s).is_ok()
}

/// Exactly 6 ASCII decimal digits.
pub fn check_pin(s: &str) -> Result<(), Rejection> {
    if s.len() == PIN_LEN && all_digits(s) {
        Ok(())
    } else {
        Err(Rejection::PinFormat)
    }
}

pub fn is_valid_pin(s: &str) -> bool {
    check_pin(s).is_ok()
}

/// Ten digits beginning with `05`.
pub fn check_phone(s: &str) -> Result<(), Rejection> {
    if s.len() == PHONE_LEN && s.starts_with(PHONE_PREFIX) && all_digits(s) {
        Ok(())
    } else {
        Err(Rejection::PhoneFormat)
    }
}

pub fn is_valid_phone(s: &str) -> bool {
    check_phone(s).is_ok()
}

/// Whitespace-only input counts as missing.
pub fn check_required(field: Field, value: &str) -> Result<(), Rejection> {
    if value.trim().is_empty() {
        Err(Rejection::Required(field))
    } else {
        Ok(())
    }
}

/// A required field that must also satisfy a format rule.
///
/// Missing input reports `Required`; present but malformed input reports the
/// format rejection.
pub fn check_required_with(
    field: Field,
    value: &str,
    format: fn(&str) -> Result<(), Rejection>,
) -> Result<(), Rejection> {
    check_required(field, value)?;
    format(value)
}

/// PIN is well-formed and equals its confirmation.
///
/// Both halves are reported independently so each field shows its own reason.
pub fn check_pin_pair(pin: &str, confirm: &str) -> FieldErrors {
    let mut errors = FieldErrors::new();
    errors.record(Field::Pin, check_pin(pin));
    if pin != confirm {
        errors.insert(Field::ConfirmPin, Rejection::PinMismatch);
    }
    errors
}

/// Strip everything but ASCII digits and truncate to `max_len`.
///
/// Mirrors the masking applied to ID and PIN inputs as the user types.
pub fn sanitize_digits(input: &str, max_len: usize) -> String {
    input
        .chars()
        .filter(|c| c.is_ascii_digit())
        .take(max_len)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn national_id_accepts_nine_digits() {
        assert!(is_valid_national_id("123456789"));
        assert!(is_valid_national_id("000000000"));
    }

    #[test]
    fn national_id_rejects_wrong_shape() {
        assert!(!is_valid_national_id(""));
        assert!(!is_valid_national_id("12345678"));
        assert!(!is_valid_national_id("1234567890"));
        assert!(!is_valid_national_id("12345678a"));
        assert!(!is_valid_national_id(" 12345678"));
        // Non-ASCII digits are not decimal digits for our purposes.
        assert!(!is_valid_national_id("١٢٣٤٥٦٧٨٩"));
    }

    #[test]
    fn pin_shape() {
        assert!(is_valid_pin("111111"));
        assert!(!is_valid_pin("11111"));
        assert!(!is_valid_pin("1111111"));
        assert!(!is_valid_pin("11a111"));
        assert_eq!(check_pin("12"), Err(Rejection::PinFormat));
    }

    #[test]
    fn phone_requires_05_prefix() {
        assert!(is_valid_phone("0599999999"));
        assert!(is_valid_phone("0561234567"));
        assert!(!is_valid_phone("0699999999"));
        assert!(!is_valid_phone("059999999"));
        assert!(!is_valid_phone("05999999990"));
        assert!(!is_valid_phone("05-9999999"));
    }

    #[test]
    fn required_treats_whitespace_as_empty() {
        assert_eq!(
            check_required(Field::City, "   "),
            Err(Rejection::Required(Field::City))
        );
        assert!(check_required(Field::City, "Gaza").is_ok());
    }

    #[test]
    fn required_with_reports_missing_before_format() {
        assert_eq!(
            check_required_with(Field::Phone, "", check_phone),
            Err(Rejection::Required(Field::Phone))
        );
        assert_eq!(
            check_required_with(Field::Phone, "12345", check_phone),
            Err(Rejection::PhoneFormat)
        );
    }

    #[test]
    fn pin_pair_reports_mismatch_on_confirmation() {
        let errors = check_pin_pair("111111", "222222");
        assert_eq!(errors.get(Field::ConfirmPin), Some(Rejection::PinMismatch));
        assert!(!errors.contains(Field::Pin));
        assert_eq!(Rejection::PinMismatch.to_string(), "PIN mismatch");
    }

    #[test]
    fn pin_pair_reports_both_fields() {
        let errors = check_pin_pair("12", "34");
        assert_eq!(errors.get(Field::Pin), Some(Rejection::PinFormat));
        assert_eq!(errors.get(Field::ConfirmPin), Some(Rejection::PinMismatch));
        assert!(check_pin_pair("654321", "654321").is_empty());
    }

    #[test]
    fn sanitize_strips_and_truncates() {
        assert_eq!(sanitize_digits("12-34 56a789012", 9), "123456789");
        assert_eq!(sanitize_digits("abc", 6), "");
        assert_eq!(sanitize_digits("1234567", 6), "123456");
    }

    #[test]
    fn field_errors_display_is_ordered() {
        let mut errors = FieldErrors::new();
        errors.insert(Field::Phone, Rejection::Required(Field::Phone));
        errors.insert(Field::Name, Rejection::Required(Field::Name));
        assert_eq!(
            errors.to_string(),
            "name: name is required; phone number: phone number is required"
        );
        assert!(errors.into_result().is_err());
        assert!(FieldErrors::new().into_result().is_ok());
    }
}
