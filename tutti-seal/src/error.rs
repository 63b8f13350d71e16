//! Error types for the sealing layer.
//!
//! These describe structural problems (envelope syntax, principal ids,
//! configuration). Whenever one arises inside a [`Cryptor`] call it is
//! chained as the source of a `CryptoError::DecryptionFailed` or
//! `CryptoError::EncryptionFailed`.
//!
//! [`Cryptor`]: tutti_crypto::Cryptor

use thiserror::Error;

/// Sealing-specific errors.
#[derive(Debug, Error)]
pub enum SealError {
    /// The bytes do not follow the sealed envelope layout.
    #[error("malformed sealed envelope: {0}")]
    MalformedEnvelope(String),

    /// The envelope cannot be written in the wire format.
    #[error("envelope cannot be encoded: {0}")]
    Unencodable(String),

    /// Principal id is empty or contains a reserved delimiter.
    #[error("invalid principal id: {0:?}")]
    InvalidPrincipalId(String),

    /// Configuration could not be parsed.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type for sealing operations.
pub type SealResult<T> = Result<T, SealError>;
