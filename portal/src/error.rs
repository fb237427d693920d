use relief_crypto::CryptoError;
use relief_store::StoreError;
use relief_types::FieldErrors;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PortalError {
    /// Local, field-scoped; never reaches the backend.
    #[error("validation failed: {0}")]
    Validation(FieldErrors),

    #[error("{operation} failed: {source}")]
    Operation {
        operation: &'static str,
        #[source]
        source: StoreError,
    },

    #[error("{operation} timed out after {after:?}")]
    Timeout {
        operation: &'static str,
        after: Duration,
    },

    #[error("PIN hashing failed: {0}")]
    Hashing(#[from] CryptoError),

    #[error("cannot {action} while {state}")]
    InvalidState {
        action: &'static str,
        state: &'static str,
    },
}

impl PortalError {
    /// Backend or hashing failure the user may retry.
    pub fn is_operation_error(&self) -> bool {
        matches!(
            self,
            Self::Operation { .. } | Self::Timeout { .. } | Self::Hashing(_)
        )
    }

    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}
