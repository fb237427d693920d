//! Audit sink trait.

use crate::StoreError;
use relief_types::AuditEntry;
use std::future::Future;

/// Append-only activity log.
///
/// Callers treat this as fire-and-forget: an `Err` is logged, never surfaced.
pub trait AuditLog {
    fn record(&self, entry: &AuditEntry) -> impl Future<Output = Result<(), StoreError>> + Send;
}
