//! Symmetric key material.
//!
//! Keys come from two places: the OS random source (session keys, platform
//! keys) or Argon2id over a passphrase (principals' private keys, platform
//! secrets configured as passwords).

use crate::error::{CryptoError, CryptoResult};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::RngCore;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// ChaCha20 key length.
pub const KEY_SIZE: usize = 32;

/// Argon2 salt length.
pub const SALT_SIZE: usize = 16;

/// 256-bit key, wiped when dropped.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SymmetricKey {
    bytes: [u8; KEY_SIZE],
}

impl SymmetricKey {
    /// Wraps raw key bytes.
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self { bytes }
    }

    /// Copies a raw key received as a slice, e.g. an unwrapped session key.
    pub fn from_slice(raw: &[u8]) -> CryptoResult<Self> {
        <[u8; KEY_SIZE]>::try_from(raw)
            .map(Self::from_bytes)
            .map_err(|_| CryptoError::InvalidKeyLength {
                expected: KEY_SIZE,
                actual: raw.len(),
            })
    }

    /// Fresh key from `OsRng`.
    pub fn generate() -> Self {
        let mut key = Self::from_bytes([0u8; KEY_SIZE]);
        OsRng.fill_bytes(&mut key.bytes);
        key
    }

    /// Derives a key from a passphrase (see [`derive_key`]).
    pub fn from_passphrase(passphrase: &str, salt: &Salt, params: &KdfParams) -> CryptoResult<Self> {
        derive_key(passphrase, salt, params)
    }

    /// Returns the key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }
}

impl fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SymmetricKey([REDACTED])")
    }
}

/// Per-derivation salt. Not secret; stored beside whatever it protects.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Salt([u8; SALT_SIZE]);

impl Salt {
    /// Generates a random salt.
    pub fn random() -> Self {
        let mut bytes = [0u8; SALT_SIZE];
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Creates a salt from raw bytes.
    pub fn from_bytes(bytes: [u8; SALT_SIZE]) -> Self {
        Self(bytes)
    }

    /// Returns the salt bytes.
    pub fn as_bytes(&self) -> &[u8; SALT_SIZE] {
        &self.0
    }
}

/// Argon2id cost parameters.
///
/// Stored next to every passphrase-protected key so that changing the
/// defaults later does not lock out existing principals. Missing fields in
/// config files fall back to the defaults individually.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct KdfParams {
    /// KiB.
    pub memory_cost: u32,
    /// Passes over memory.
    pub time_cost: u32,
    /// Lanes.
    pub parallelism: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        // OWASP Argon2id baseline: m=19 MiB, t=2, p=1
        Self {
            memory_cost: 19 * 1024,
            time_cost: 2,
            parallelism: 1,
        }
    }
}

impl KdfParams {
    /// Cheap parameters for unit tests.
    #[cfg(test)]
    pub fn test() -> Self {
        Self {
            memory_cost: 1024,
            time_cost: 1,
            parallelism: 1,
        }
    }

    /// Builds the Argon2id hasher, rejecting parameters argon2 refuses.
    fn hasher(&self) -> CryptoResult<Argon2<'static>> {
        let params = Params::new(
            self.memory_cost,
            self.time_cost,
            self.parallelism,
            Some(KEY_SIZE),
        )
        .map_err(|e| CryptoError::KeyDerivation(e.to_string()))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

/// Argon2id(passphrase, salt) -> 32-byte key.
pub fn derive_key(passphrase: &str, salt: &Salt, params: &KdfParams) -> CryptoResult<SymmetricKey> {
    let mut key = SymmetricKey::from_bytes([0u8; KEY_SIZE]);
    params
        .hasher()?
        .hash_password_into(passphrase.as_bytes(), salt.as_bytes(), &mut key.bytes)
        .map_err(|e| CryptoError::KeyDerivation(e.to_string()))?;
    Ok(key)
}
