//! Self-service PIN held in memory only long enough to hash it.

use crate::error::Rejection;
use crate::validation::check_pin;
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A well-formed 6-digit PIN.
///
/// This type intentionally does not implement `Serialize`, `Display`, or a
/// revealing `Debug` so the plaintext cannot leak into logs or wire payloads.
/// The buffer is zeroized on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Pin(String);

impl Pin {
    pub fn parse(raw: &str) -> Result<Self, Rejection> {
        check_pin(raw)?;
        Ok(Self(raw.to_string()))
    }

    /// Borrow the plaintext digits. Only hashers should call this.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Pin(******)")
    }
}

impl PartialEq for Pin {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for Pin {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_is_redacted() {
        let pin = Pin::parse("123456").unwrap();
        assert_eq!(format!("{pin:?}"), "Pin(******)");
        assert_eq!(pin.expose(), "123456");
    }

    #[test]
    fn rejects_malformed() {
        assert_eq!(Pin::parse("12345").unwrap_err(), Rejection::PinFormat);
    }
}
