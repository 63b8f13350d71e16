//! Single-key cryptor with legacy plaintext passthrough.
//!
//! Ciphertext produced here is text-safe: `base64(nonce ‖ ciphertext)`
//! followed by the two-byte format marker [`FORMAT_MARKER`]. Input to
//! [`Cryptor::decrypt`] that lacks the marker is historic plaintext written
//! before encryption was switched on and is returned unchanged, so a column
//! can hold a mix of old plaintext rows and new ciphertext rows without a
//! migration.

use crate::cipher::{self, EncryptedData};
use crate::cryptor::{Cryptor, KeyedCryptor};
use crate::error::{CryptoError, CryptoResult};
use crate::key::SymmetricKey;
use tracing::trace;
use zeroize::Zeroizing;

/// Suffix appended to every ciphertext this cryptor produces.
pub const FORMAT_MARKER: &[u8] = b"|3";

/// Cryptor backed by an optional [`SymmetricKey`].
///
/// Without a key the cryptor is an identity transform, which lets call sites
/// run the same way whether or not encryption is currently enabled.
#[derive(Clone, Debug, Default)]
pub struct SymmetricCryptor {
    key: Option<SymmetricKey>,
}

impl SymmetricCryptor {
    /// Creates a cryptor using `key`.
    pub fn new(key: SymmetricKey) -> Self {
        Self { key: Some(key) }
    }

    /// Creates an unkeyed (identity) cryptor.
    pub fn without_key() -> Self {
        Self::default()
    }

    /// Replaces the key, returning the previous one.
    pub fn set_key(&mut self, key: Option<SymmetricKey>) -> Option<SymmetricKey> {
        std::mem::replace(&mut self.key, key)
    }

    /// The current key, if any.
    pub fn key(&self) -> Option<&SymmetricKey> {
        self.key.as_ref()
    }

    /// Whether `data` carries the format marker.
    pub fn is_marked(data: &[u8]) -> bool {
        data.ends_with(FORMAT_MARKER)
    }
}

impl Cryptor for SymmetricCryptor {
    fn encrypt(&self, data: &[u8]) -> CryptoResult<Vec<u8>> {
        let Some(key) = &self.key else {
            return Ok(data.to_vec());
        };

        let encrypted = cipher::encrypt(key, data)
            .map_err(|e| CryptoError::encryption_caused_by("symmetric encryption", e))?;

        let mut out = encrypted.to_base64().into_bytes();
        out.extend_from_slice(FORMAT_MARKER);
        Ok(out)
    }

    fn decrypt(&self, data: &[u8]) -> CryptoResult<Vec<u8>> {
        let Some(body) = data.strip_suffix(FORMAT_MARKER) else {
            trace!("input has no format marker, treating as legacy plaintext");
            return Ok(data.to_vec());
        };

        let Some(key) = &self.key else {
            return Err(CryptoError::decryption("no symmetric key configured"));
        };

        let encoded = std::str::from_utf8(body)
            .map_err(|e| CryptoError::decryption_caused_by("ciphertext is not text", e))?;
        let encrypted = EncryptedData::from_base64(encoded)
            .map_err(|e| CryptoError::decryption_caused_by("malformed symmetric ciphertext", e))?;

        cipher::decrypt(key, &encrypted)
            .map_err(|e| CryptoError::decryption_caused_by("symmetric decryption", e))
    }

    fn can_encrypt(&self) -> bool {
        self.key.is_some()
    }

    fn can_decrypt(&self) -> bool {
        self.key.is_some()
    }
}

impl KeyedCryptor for SymmetricCryptor {
    fn key_bytes(&self) -> Option<Zeroizing<Vec<u8>>> {
        self.key
            .as_ref()
            .map(|key| Zeroizing::new(key.as_bytes().to_vec()))
    }
}
