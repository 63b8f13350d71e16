//! ChaCha20-Poly1305 primitive shared by the symmetric cryptor and by
//! passphrase-protected private keys.
//!
//! Ciphertext travels as `nonce ‖ ciphertext‖tag`, base64-encoded when it has
//! to live inside text (sealed envelopes, config values).

use crate::error::{CryptoError, CryptoResult};
use crate::key::SymmetricKey;
use base64::{Engine, engine::general_purpose::STANDARD};
use chacha20poly1305::aead::{Aead, AeadCore, KeyInit, OsRng};
use chacha20poly1305::{ChaCha20Poly1305, Nonce};
use serde::{Deserialize, Serialize};

/// ChaCha20-Poly1305 nonce length.
pub const NONCE_SIZE: usize = 12;

/// Poly1305 tag length, appended to every ciphertext.
pub const TAG_SIZE: usize = 16;

/// One AEAD output: the random nonce and the tagged ciphertext.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedData {
    pub nonce: [u8; NONCE_SIZE],
    /// Ciphertext with the tag at the end.
    pub ciphertext: Vec<u8>,
}

impl EncryptedData {
    /// Length of the framed form.
    pub fn len(&self) -> usize {
        NONCE_SIZE + self.ciphertext.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ciphertext.is_empty()
    }

    /// Frames as `nonce ‖ ciphertext`.
    pub fn to_bytes(&self) -> Vec<u8> {
        [self.nonce.as_slice(), self.ciphertext.as_slice()].concat()
    }

    /// Splits a framed buffer. Anything shorter than a nonce plus a tag
    /// cannot have come from [`encrypt`].
    pub fn from_bytes(framed: &[u8]) -> CryptoResult<Self> {
        if framed.len() < NONCE_SIZE + TAG_SIZE {
            return Err(CryptoError::decryption("ciphertext too short"));
        }
        let (nonce, ciphertext) = framed.split_at(NONCE_SIZE);
        let nonce: [u8; NONCE_SIZE] = nonce
            .try_into()
            .map_err(|_| CryptoError::decryption("ciphertext too short"))?;
        Ok(Self {
            nonce,
            ciphertext: ciphertext.to_vec(),
        })
    }

    /// Standard base64 of the framed form. Never contains `|`, `:` or `;`.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.to_bytes())
    }

    pub fn from_base64(encoded: &str) -> CryptoResult<Self> {
        let framed = STANDARD
            .decode(encoded)
            .map_err(|e| CryptoError::decryption_caused_by("invalid base64", e))?;
        Self::from_bytes(&framed)
    }
}

fn aead(key: &SymmetricKey) -> ChaCha20Poly1305 {
    ChaCha20Poly1305::new(key.as_bytes().into())
}

/// Encrypts under `key` with a nonce drawn from the OS RNG.
pub fn encrypt(key: &SymmetricKey, plaintext: &[u8]) -> CryptoResult<EncryptedData> {
    let nonce = ChaCha20Poly1305::generate_nonce(&mut OsRng);
    let ciphertext = aead(key)
        .encrypt(&nonce, plaintext)
        .map_err(|e| CryptoError::encryption_caused_by("AEAD encryption failed", e))?;

    Ok(EncryptedData {
        nonce: nonce.into(),
        ciphertext,
    })
}

/// Authenticates and decrypts. A wrong key and a modified ciphertext are
/// indistinguishable here.
pub fn decrypt(key: &SymmetricKey, encrypted: &EncryptedData) -> CryptoResult<Vec<u8>> {
    aead(key)
        .decrypt(Nonce::from_slice(&encrypted.nonce), encrypted.ciphertext.as_slice())
        .map_err(|e| CryptoError::decryption_caused_by("wrong key or tampered data", e))
}
