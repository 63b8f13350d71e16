//! Source of per-seal session cryptors.

use crate::cryptor::KeyedCryptor;
use crate::error::CryptoResult;
use crate::key::SymmetricKey;
use crate::symmetric::SymmetricCryptor;

/// Builds symmetric session cryptors for the sealing service.
pub trait CryptorFactory: Send + Sync {
    /// The cryptor type handed out.
    type Cryptor: KeyedCryptor;

    /// A cryptor with a freshly generated key from a CSPRNG.
    fn symmetric_cryptor(&self) -> CryptoResult<Self::Cryptor>;

    /// A cryptor using an existing raw key (recovered from a wrapped key).
    fn symmetric_cryptor_with_key(&self, key: &[u8]) -> CryptoResult<Self::Cryptor>;
}

/// Production factory: [`SymmetricCryptor`] keyed from the OS random source.
#[derive(Debug, Clone, Copy, Default)]
pub struct SymmetricFactory;

impl CryptorFactory for SymmetricFactory {
    type Cryptor = SymmetricCryptor;

    fn symmetric_cryptor(&self) -> CryptoResult<SymmetricCryptor> {
        Ok(SymmetricCryptor::new(SymmetricKey::generate()))
    }

    fn symmetric_cryptor_with_key(&self, key: &[u8]) -> CryptoResult<SymmetricCryptor> {
        SymmetricKey::from_slice(key).map(SymmetricCryptor::new)
    }
}
