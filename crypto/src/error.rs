use thiserror::Error;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("invalid hash parameters: {0}")]
    Params(String),

    #[error("hashing failed: {0}")]
    Hashing(String),

    #[error("malformed PIN hash: {0}")]
    MalformedHash(String),
}
