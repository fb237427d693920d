//! Argon2id PIN hashing.
//!
//! Hashes are PHC strings (`$argon2id$v=19$m=..,t=..,p=..$<salt>$<hash>`)
//! produced and checked through the `password_hash` API, so any standard
//! Argon2 verifier on the backend reads them the same way.

use argon2::password_hash::{
    Error as PasswordHashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::rngs::OsRng;
use relief_types::{Pin, PinHash};
use serde::{Deserialize, Serialize};

use crate::error::CryptoError;

/// Digest length in bytes.
const OUTPUT_LEN: usize = 32;

/// One-way hashing of self-service PINs.
pub trait PinHasher: Send + Sync {
    /// Hash a PIN with a fresh salt.
    fn hash_pin(&self, pin: &Pin) -> Result<PinHash, CryptoError>;

    /// Check a PIN against a stored hash.
    fn verify_pin(&self, pin: &Pin, hash: &PinHash) -> Result<bool, CryptoError>;
}

/// Argon2id cost parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashParams {
    /// Memory cost in KiB.
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HashParams {
    /// 64 MB memory, 3 iterations, 1 lane.
    fn default() -> Self {
        Self {
            memory_kib: 65536,
            iterations: 3,
            parallelism: 1,
        }
    }
}

impl HashParams {
    /// Minimal cost, for tests only.
    pub fn insecure_fast() -> Self {
        Self {
            memory_kib: 64,
            iterations: 1,
            parallelism: 1,
        }
    }

    fn argon2(&self) -> Result<Argon2<'static>, CryptoError> {
        let params = Params::new(
            self.memory_kib,
            self.iterations,
            self.parallelism,
            Some(OUTPUT_LEN),
        )
        .map_err(|e| CryptoError::Params(e.to_string()))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

/// Production [`PinHasher`] backed by Argon2id.
#[derive(Clone, Debug, Default)]
pub struct Argon2PinHasher {
    params: HashParams,
}

impl Argon2PinHasher {
    pub fn new(params: HashParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> HashParams {
        self.params
    }
}

impl PinHasher for Argon2PinHasher {
    fn hash_pin(&self, pin: &Pin) -> Result<PinHash, CryptoError> {
        let argon2 = self.params.argon2()?;
        let salt = SaltString::generate(&mut OsRng);
        let hash = argon2
            .hash_password(pin.expose().as_bytes(), &salt)
            .map_err(|e| CryptoError::Hashing(e.to_string()))?;
        Ok(PinHash::new(hash.to_string()))
    }

    fn verify_pin(&self, pin: &Pin, hash: &PinHash) -> Result<bool, CryptoError> {
        let parsed = PasswordHash::new(hash.as_str())
            .map_err(|e| CryptoError::MalformedHash(e.to_string()))?;
        if parsed.hash.is_none() || parsed.salt.is_none() {
            return Err(CryptoError::MalformedHash("missing salt or digest".to_string()));
        }
        if parsed.algorithm != Algorithm::Argon2id.ident() {
            return Err(CryptoError::MalformedHash(format!(
                "unsupported algorithm {}",
                parsed.algorithm
            )));
        }
        // Cost parameters are read from the hash itself.
        match Argon2::default().verify_password(pin.expose().as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(PasswordHashError::Password) => Ok(false),
            Err(e) => Err(CryptoError::MalformedHash(e.to_string())),
        }
    }
}
