//! Nullable PIN hasher: cheap and deterministic, never the plaintext PIN.

use relief_crypto::{CryptoError, PinHasher};
use relief_types::{Pin, PinHash};
use std::sync::atomic::{AtomicBool, Ordering};

const PREFIX: &str = "null$";

/// Hashes a PIN to `null$` followed by its digits reversed.
///
/// Good enough to assert on in tests without paying Argon2's cost.
#[derive(Default)]
pub struct NullPinHasher {
    fail: AtomicBool,
}

impl NullPinHasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail.
    pub fn fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// The hash this hasher produces for `digits`.
    pub fn expected(digits: &str) -> PinHash {
        PinHash::new(format!("{PREFIX}{}", digits.chars().rev().collect::<String>()))
    }
}

impl PinHasher for NullPinHasher {
    fn hash_pin(&self, pin: &Pin) -> Result<PinHash, CryptoError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(CryptoError::Hashing("null hasher told to fail".to_string()));
        }
        Ok(Self::expected(pin.expose()))
    }

    fn verify_pin(&self, pin: &Pin, hash: &PinHash) -> Result<bool, CryptoError> {
        if !hash.as_str().starts_with(PREFIX) {
            return Err(CryptoError::MalformedHash("not a null hash".to_string()));
        }
        Ok(Self::expected(pin.expose()) == *hash)
    }
}
