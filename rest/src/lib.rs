//! REST backend for the relief portal.
//!
//! Talks to a PostgREST-compatible service (as exposed by Supabase):
//! - `beneficiaries`, `beneficiary_auth`, `packages` and `activity_log` tables
//! - row filters as `?column=eq.value`
//! - registration through the `register_beneficiary` RPC so the beneficiary
//!   and its credential are created in one database transaction
//!
//! Every request carries the `apikey` header and a bearer token, plus its own
//! request and connect timeouts.

pub mod client;
pub mod config;

pub use client::RestBackend;
pub use config::RestConfig;
