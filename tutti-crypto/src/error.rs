//! Error types for the encryption layer.
//!
//! Cryptors only ever surface two kinds of failure to their callers:
//! [`CryptoError::EncryptionFailed`] and [`CryptoError::DecryptionFailed`].
//! Lower-level variants come out of the primitives (key derivation, key
//! parsing, serialization) and are chained as the `source` of one of those
//! two when they cross a cryptor boundary.

use thiserror::Error;

/// Boxed cause carried by a failed encrypt/decrypt.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type for crypto operations.
pub type CryptoResult<T> = Result<T, CryptoError>;

/// Errors that can occur in cryptographic operations.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// The underlying primitive rejected an encryption request.
    #[error("encryption failed: {reason}")]
    EncryptionFailed {
        reason: String,
        #[source]
        source: Option<BoxError>,
    },

    /// Decryption failed (malformed input, unknown principal, wrong key or
    /// tampered data).
    #[error("decryption failed: {reason}")]
    DecryptionFailed {
        reason: String,
        #[source]
        source: Option<BoxError>,
    },

    /// Key derivation failed.
    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    /// Invalid key length.
    #[error("invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CryptoError {
    /// An encryption failure with no underlying cause.
    pub fn encryption(reason: impl Into<String>) -> Self {
        Self::EncryptionFailed {
            reason: reason.into(),
            source: None,
        }
    }

    /// An encryption failure chaining the error that caused it.
    pub fn encryption_caused_by(reason: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::EncryptionFailed {
            reason: reason.into(),
            source: Some(source.into()),
        }
    }

    /// A decryption failure with no underlying cause.
    pub fn decryption(reason: impl Into<String>) -> Self {
        Self::DecryptionFailed {
            reason: reason.into(),
            source: None,
        }
    }

    /// A decryption failure chaining the error that caused it.
    pub fn decryption_caused_by(reason: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::DecryptionFailed {
            reason: reason.into(),
            source: Some(source.into()),
        }
    }

    /// Returns true for [`CryptoError::EncryptionFailed`].
    pub fn is_encryption_failure(&self) -> bool {
        matches!(self, Self::EncryptionFailed { .. })
    }

    /// Returns true for [`CryptoError::DecryptionFailed`].
    pub fn is_decryption_failure(&self) -> bool {
        matches!(self, Self::DecryptionFailed { .. })
    }
}
