//! Error types for sealing and unsealing.

use thiserror::Error;

/// Result type alias using [`SealError`].
pub type Result<T> = std::result::Result<T, SealError>;

/// Every way a seal or unseal call can fail.
///
/// None of these are transient; retrying with the same input gives the same
/// error.
#[derive(Error, Debug)]
pub enum SealError {
    #[error("Secret must be exactly {expected} characters long!")]
    SecretLength { expected: usize },

    #[error("Cannot unseal: Incorrect data format.")]
    IncorrectFormat,

    #[error("Cannot unseal: Unsupported version.")]
    UnsupportedVersion,

    #[error("Cannot unseal: Invalid expiration")]
    InvalidExpiration,

    #[error("Cannot unseal: Expired seal")]
    ExpiredSeal,

    /// Wrong secret, tampered fields, undecodable base64 and bad padding all
    /// land here. Callers must not be able to tell them apart.
    #[error("Cannot unseal: Incorrect hmac seal value")]
    IncorrectHmac,

    #[error("OS random generator unavailable")]
    Random,

    #[error("Encryption error: {0}")]
    Encryption(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
