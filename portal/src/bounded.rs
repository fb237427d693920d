//! Timeout policy for backend calls.

use crate::error::PortalError;
use relief_store::{AuditLog, StoreError};
use relief_types::AuditEntry;
use std::future::Future;
use std::time::Duration;

/// Run a backend call under `limit`, mapping failures to [`PortalError`].
pub(crate) async fn bounded<T, F>(
    operation: &'static str,
    limit: Duration,
    call: F,
) -> Result<T, PortalError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(source)) => {
            tracing::warn!(operation, error = %source, "backend call failed");
            Err(PortalError::Operation { operation, source })
        }
        Err(_) => {
            tracing::warn!(operation, timeout_ms = limit.as_millis() as u64, "backend call timed out");
            Err(PortalError::Timeout {
                operation,
                after: limit,
            })
        }
    }
}

/// Fire-and-forget audit write: failures are logged and swallowed.
pub(crate) async fn record_audit<B: AuditLog>(backend: &B, entry: AuditEntry, limit: Duration) {
    let action = entry.action;
    if let Err(e) = bounded("record audit entry", limit, backend.record(&entry)).await {
        tracing::warn!(?action, error = %e, "audit entry dropped");
    }
}
