//! Currency amount for aid package values.
//!
//! Amounts are represented as fixed-point integers (hundredths) to avoid
//! floating-point drift. The wire format is a plain JSON number in major units.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A non-negative money amount in minor units (1/100 of the currency unit).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MoneyAmount(u64);

impl MoneyAmount {
    pub const ZERO: Self = Self(0);

    pub fn from_minor(minor: u64) -> Self {
        Self(minor)
    }

    /// Convert from a major-unit decimal, rounding to the nearest hundredth.
    /// Negative and non-finite inputs clamp to zero.
    pub fn from_major(major: f64) -> Self {
        if !major.is_finite() || major <= 0.0 {
            return Self::ZERO;
        }
        Self((major * 100.0).round() as u64)
    }

    pub fn minor(&self) -> u64 {
        self.0
    }

    pub fn as_major(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl fmt::Display for MoneyAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl Serialize for MoneyAmount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_major())
    }
}

impl<'de> Deserialize<'de> for MoneyAmount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let major = f64::deserialize(deserializer)?;
        Ok(Self::from_major(major))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn major_conversion_rounds() {
        assert_eq!(MoneyAmount::from_major(150.0).minor(), 15000);
        assert_eq!(MoneyAmount::from_major(12.346).minor(), 1235);
        assert_eq!(MoneyAmount::from_major(-4.0), MoneyAmount::ZERO);
        assert_eq!(MoneyAmount::from_major(f64::NAN), MoneyAmount::ZERO);
    }

    #[test]
    fn display_two_decimals() {
        assert_eq!(MoneyAmount::from_minor(15005).to_string(), "150.05");
        assert_eq!(MoneyAmount::ZERO.to_string(), "0.00");
    }

    #[test]
    fn json_number_wire_format() {
        let amount: MoneyAmount = serde_json::from_str("250.5").unwrap();
        assert_eq!(amount.minor(), 25050);
        assert_eq!(serde_json::to_string(&amount).unwrap(), "250.5");
    }
}
