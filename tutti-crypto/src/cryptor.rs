//! The capability every cryptor exposes.
//!
//! Consumers (the sealing service, secret-storage workflows) depend on the
//! [`Cryptor`] trait only; they never see raw keys except through
//! [`KeyedCryptor::key_bytes`], which hands out a zeroizing copy.

use crate::error::CryptoResult;
use zeroize::Zeroizing;

/// Encrypts and decrypts opaque byte strings and reports whether it can.
pub trait Cryptor: Send + Sync {
    /// Encrypts `data`, returning an opaque ciphertext.
    fn encrypt(&self, data: &[u8]) -> CryptoResult<Vec<u8>>;

    /// Decrypts data previously produced by [`Cryptor::encrypt`].
    fn decrypt(&self, data: &[u8]) -> CryptoResult<Vec<u8>>;

    /// Whether [`Cryptor::encrypt`] can currently produce ciphertext.
    fn can_encrypt(&self) -> bool;

    /// Whether [`Cryptor::decrypt`] can currently recover plaintext.
    fn can_decrypt(&self) -> bool;

    /// `None` in, `None` out; the primitive is not invoked.
    fn encrypt_optional(&self, data: Option<&[u8]>) -> CryptoResult<Option<Vec<u8>>> {
        data.map(|d| self.encrypt(d)).transpose()
    }

    /// `None` in, `None` out; the primitive is not invoked.
    fn decrypt_optional(&self, data: Option<&[u8]>) -> CryptoResult<Option<Vec<u8>>> {
        data.map(|d| self.decrypt(d)).transpose()
    }
}

/// A cryptor whose raw key can be exported, used for per-seal session keys.
pub trait KeyedCryptor: Cryptor {
    /// A copy of the raw key, erased when the returned buffer is dropped.
    fn key_bytes(&self) -> Option<Zeroizing<Vec<u8>>>;
}

impl<C: Cryptor + ?Sized> Cryptor for &C {
    fn encrypt(&self, data: &[u8]) -> CryptoResult<Vec<u8>> {
        (**self).encrypt(data)
    }

    fn decrypt(&self, data: &[u8]) -> CryptoResult<Vec<u8>> {
        (**self).decrypt(data)
    }

    fn can_encrypt(&self) -> bool {
        (**self).can_encrypt()
    }

    fn can_decrypt(&self) -> bool {
        (**self).can_decrypt()
    }
}

/// No-op cryptor for tests and for fields that are not encrypted yet.
/// Data passes through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughCryptor;

impl Cryptor for PassthroughCryptor {
    fn encrypt(&self, data: &[u8]) -> CryptoResult<Vec<u8>> {
        Ok(data.to_vec())
    }

    fn decrypt(&self, data: &[u8]) -> CryptoResult<Vec<u8>> {
        Ok(data.to_vec())
    }

    fn can_encrypt(&self) -> bool {
        true
    }

    fn can_decrypt(&self) -> bool {
        true
    }
}
