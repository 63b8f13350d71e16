//! Encryption primitives and cryptors for Tutti.
//!
//! Everything that protects a secret goes through the [`Cryptor`]
//! capability:
//!
//! - [`SymmetricCryptor`]: one ChaCha20-Poly1305 key, identity when no key is
//!   set, and passthrough for legacy plaintext that lacks the format marker.
//! - [`AsymmetricCryptor`]: a principal's X25519 keypair. The public half
//!   encrypts; the passphrase-protected private half decrypts.
//! - [`CryptorFactory`]: mints the per-seal session cryptor used by the
//!   sealing layer (`tutti-seal`).
//!
//! Keys are zeroized on drop and redacted from `Debug` output.

mod asymmetric;
mod cipher;
mod cryptor;
mod error;
mod factory;
mod key;
mod symmetric;

pub use asymmetric::{
    AsymmetricCryptor, AsymmetricKeyPair, BOX_NONCE_SIZE, PUBLIC_KEY_SIZE, PassphraseProtectedKey,
};
pub use cipher::{EncryptedData, NONCE_SIZE, TAG_SIZE, decrypt, encrypt};
pub use cryptor::{Cryptor, KeyedCryptor, PassthroughCryptor};
pub use error::{BoxError, CryptoError, CryptoResult};
pub use factory::{CryptorFactory, SymmetricFactory};
pub use key::{KEY_SIZE, KdfParams, SALT_SIZE, Salt, SymmetricKey, derive_key};
pub use symmetric::{FORMAT_MARKER, SymmetricCryptor};

pub use crypto_box::PublicKey;
