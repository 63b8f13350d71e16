//! The closed set of cryptors a registry can hold.

use crate::seal_cryptor::SealCryptor;
use base64::{Engine, engine::general_purpose::STANDARD};
use tutti_crypto::{AsymmetricCryptor, CryptoError, CryptoResult, Cryptor, SymmetricCryptor};

/// One of the cryptor kinds, chosen when the cryptor is built.
///
/// Dispatch is a `match`, not a trait object. A `Seal` variant may itself be
/// registered as a principal (a group of principals). Its envelope ends up in
/// the outer key table, so it is base64-encoded there; the raw envelope
/// contains the `;` and `:` delimiters. A nested seal with no principals
/// cannot encrypt: sealing for nobody would return its input unchanged.
#[derive(Debug, Clone)]
pub enum AnyCryptor {
    Symmetric(SymmetricCryptor),
    Asymmetric(AsymmetricCryptor),
    Seal(SealCryptor),
}

impl AnyCryptor {
    /// Short name of the variant, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Symmetric(_) => "symmetric",
            Self::Asymmetric(_) => "asymmetric",
            Self::Seal(_) => "seal",
        }
    }
}

impl Cryptor for AnyCryptor {
    fn encrypt(&self, data: &[u8]) -> CryptoResult<Vec<u8>> {
        match self {
            Self::Symmetric(c) => c.encrypt(data),
            Self::Asymmetric(c) => c.encrypt(data),
            Self::Seal(c) => {
                if c.all().is_empty() {
                    return Err(CryptoError::encryption("nested seal has no principals"));
                }
                Ok(STANDARD.encode(c.encrypt(data)?).into_bytes())
            }
        }
    }

    fn decrypt(&self, data: &[u8]) -> CryptoResult<Vec<u8>> {
        match self {
            Self::Symmetric(c) => c.decrypt(data),
            Self::Asymmetric(c) => c.decrypt(data),
            Self::Seal(c) => {
                let sealed = STANDARD
                    .decode(data)
                    .map_err(|e| CryptoError::decryption_caused_by("nested seal is not base64", e))?;
                c.decrypt(&sealed)
            }
        }
    }

    fn can_encrypt(&self) -> bool {
        match self {
            Self::Symmetric(c) => c.can_encrypt(),
            Self::Asymmetric(c) => c.can_encrypt(),
            Self::Seal(c) => !c.all().is_empty() && c.can_encrypt(),
        }
    }

    fn can_decrypt(&self) -> bool {
        match self {
            Self::Symmetric(c) => c.can_decrypt(),
            Self::Asymmetric(c) => c.can_decrypt(),
            Self::Seal(c) => c.can_decrypt(),
        }
    }
}

impl From<SymmetricCryptor> for AnyCryptor {
    fn from(cryptor: SymmetricCryptor) -> Self {
        Self::Symmetric(cryptor)
    }
}

impl From<AsymmetricCryptor> for AnyCryptor {
    fn from(cryptor: AsymmetricCryptor) -> Self {
        Self::Asymmetric(cryptor)
    }
}

impl From<SealCryptor> for AnyCryptor {
    fn from(cryptor: SealCryptor) -> Self {
        Self::Seal(cryptor)
    }
}
