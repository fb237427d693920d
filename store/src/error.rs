use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found: {0}")]
    NotFound(String),

    #[error("duplicate record: {0}")]
    Duplicate(String),

    #[error("backend rejected the request: {0}")]
    Rejected(String),

    #[error("backend unreachable: {0}")]
    Unavailable(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("backend error: {0}")]
    Backend(String),
}
