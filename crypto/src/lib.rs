//! PIN hashing for the relief portal.
//!
//! - **Argon2id** derives a slow, salted, one-way hash from a 6-digit PIN
//! - Hashes are stored as PHC strings so the parameters travel with the
//!   hash and can be tuned without a migration
//! - No reverse operation exists: a PIN can only be checked against a hash

pub mod error;
pub mod pin;

pub use error::CryptoError;
pub use pin::{Argon2PinHasher, HashParams, PinHasher};
