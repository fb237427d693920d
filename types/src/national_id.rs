//! National identity number: the unique lookup key for a beneficiary.

use crate::error::Rejection;
use crate::validation::check_national_id;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A well-formed 9-digit national identity number.
///
/// Can only be constructed through [`NationalId::parse`], so holding one
/// proves the shape check has passed.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NationalId(String);

impl NationalId {
    pub fn parse(raw: &str) -> Result<Self, Rejection> {
        check_national_id(raw)?;
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NationalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for NationalId {
    type Err = Rejection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for NationalId {
    type Error = Rejection;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        check_national_id(&value)?;
        Ok(Self(value))
    }
}

impl From<NationalId> for String {
    fn from(id: NationalId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid() {
        let id = NationalId::parse("123456789").unwrap();
        assert_eq!(id.as_str(), "123456789");
        assert_eq!(id.to_string(), "123456789");
    }

    #[test]
    fn parse_invalid() {
        assert_eq!(
            NationalId::parse("12345"),
            Err(Rejection::NationalIdFormat)
        );
        assert!("12345678x".parse::<NationalId>().is_err());
    }

    #[test]
    fn deserialize_checks_shape() {
        let ok: NationalId = serde_json::from_str("\"900123456\"").unwrap();
        assert_eq!(ok.as_str(), "900123456");
        assert!(serde_json::from_str::<NationalId>("\"90012\"").is_err());
    }
}
