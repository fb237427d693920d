//! Nullable infrastructure for deterministic testing.
//!
//! All external dependencies (backend service, clock, PIN hashing) are abstracted
//! behind traits. This crate provides test-friendly implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically (including injected failures and stalls)
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod backend;
pub mod clock;
pub mod hasher;

pub use backend::{NullBackend, Operation};
pub use clock::NullClock;
pub use hasher::NullPinHasher;
