//! Keypair-backed cryptor for individual principals.
//!
//! Encryption is an anonymous box to the principal's X25519 public key: a
//! fresh ephemeral keypair and nonce per call, XSalsa20-Poly1305 for the
//! payload. Output is `base64(ephemeral_pk ‖ nonce ‖ ciphertext)`.
//!
//! The private half never sits in the clear at rest. It is kept as a
//! [`PassphraseProtectedKey`] (Argon2id -> ChaCha20-Poly1305) and is only
//! unlocked for the duration of a single [`Cryptor::decrypt`] call.

use crate::cipher::{self, EncryptedData};
use crate::cryptor::Cryptor;
use crate::error::{CryptoError, CryptoResult};
use crate::key::{KdfParams, Salt, derive_key};
use base64::{Engine, engine::general_purpose::STANDARD};
use crypto_box::aead::Aead;
use crypto_box::{PublicKey, SalsaBox, SecretKey};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

/// Size of an X25519 public key in bytes.
pub const PUBLIC_KEY_SIZE: usize = 32;

/// Size of the XSalsa20 nonce in bytes.
pub const BOX_NONCE_SIZE: usize = 24;

const SECRET_KEY_SIZE: usize = 32;

/// X25519 keypair for a principal.
///
/// The secret key implements `ZeroizeOnDrop` (from crypto_box).
pub struct AsymmetricKeyPair {
    secret: SecretKey,
    public: PublicKey,
}

impl AsymmetricKeyPair {
    /// Generates a new keypair.
    pub fn generate() -> Self {
        let secret = SecretKey::generate(&mut rand::rngs::OsRng);
        let public = secret.public_key();
        Self { secret, public }
    }

    /// Reconstructs a keypair from raw secret key bytes.
    pub fn from_secret_bytes(bytes: [u8; SECRET_KEY_SIZE]) -> Self {
        let secret = SecretKey::from(bytes);
        let public = secret.public_key();
        Self { secret, public }
    }

    /// The public half.
    pub fn public_key(&self) -> &PublicKey {
        &self.public
    }

    /// Returns the public key as raw 32-byte array.
    pub fn public_bytes(&self) -> [u8; PUBLIC_KEY_SIZE] {
        *self.public.as_bytes()
    }

    /// Encrypts the secret half under `passphrase` for storage in a keystore.
    pub fn protect(&self, passphrase: &str, params: &KdfParams) -> CryptoResult<PassphraseProtectedKey> {
        let salt = Salt::random();
        let derived = derive_key(passphrase, &salt, params)?;
        let secret_bytes = Zeroizing::new(self.secret.to_bytes());
        let encrypted = cipher::encrypt(&derived, secret_bytes.as_slice())?;

        Ok(PassphraseProtectedKey {
            salt,
            kdf: params.clone(),
            encrypted,
        })
    }
}

impl std::fmt::Debug for AsymmetricKeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsymmetricKeyPair")
            .field("public", &STANDARD.encode(self.public.as_bytes()))
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// Private key encrypted with a passphrase (Argon2id -> ChaCha20-Poly1305).
///
/// Bundles the salt and KDF parameters with the ciphertext so the passphrase
/// is the only input needed to unlock it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassphraseProtectedKey {
    pub salt: Salt,
    pub kdf: KdfParams,
    pub encrypted: EncryptedData,
}

impl PassphraseProtectedKey {
    /// Recovers the secret key. A wrong passphrase fails authentication.
    pub fn unlock(&self, passphrase: &str) -> CryptoResult<SecretKey> {
        let derived = derive_key(passphrase, &self.salt, &self.kdf)?;
        let plaintext = Zeroizing::new(cipher::decrypt(&derived, &self.encrypted)?);

        if plaintext.len() != SECRET_KEY_SIZE {
            return Err(CryptoError::InvalidKeyLength {
                expected: SECRET_KEY_SIZE,
                actual: plaintext.len(),
            });
        }

        let mut bytes = Zeroizing::new([0u8; SECRET_KEY_SIZE]);
        bytes.copy_from_slice(&plaintext);
        Ok(SecretKey::from(*bytes))
    }

    /// Serializes for the keystore.
    pub fn to_json(&self) -> CryptoResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserializes a keystore entry.
    pub fn from_json(json: &str) -> CryptoResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Cryptor for one principal's keypair.
///
/// `can_encrypt` needs only the public key; `can_decrypt` needs the
/// protected private key and its passphrase.
#[derive(Clone)]
pub struct AsymmetricCryptor {
    public: Option<PublicKey>,
    private: Option<PassphraseProtectedKey>,
    passphrase: Option<Zeroizing<String>>,
}

impl AsymmetricCryptor {
    /// A cryptor that can wrap for the principal but never unwrap.
    pub fn public_only(public: PublicKey) -> Self {
        Self {
            public: Some(public),
            private: None,
            passphrase: None,
        }
    }

    /// A cryptor with both halves available.
    pub fn with_private(
        public: PublicKey,
        private: PassphraseProtectedKey,
        passphrase: impl Into<String>,
    ) -> Self {
        Self {
            public: Some(public),
            private: Some(private),
            passphrase: Some(Zeroizing::new(passphrase.into())),
        }
    }

    /// Protects `keypair` under `passphrase` and builds a full cryptor.
    pub fn from_keypair(
        keypair: &AsymmetricKeyPair,
        passphrase: &str,
        params: &KdfParams,
    ) -> CryptoResult<Self> {
        let protected = keypair.protect(passphrase, params)?;
        Ok(Self::with_private(
            keypair.public_key().clone(),
            protected,
            passphrase,
        ))
    }

    /// Builds a public-only cryptor from raw public key bytes.
    pub fn from_public_bytes(bytes: &[u8]) -> CryptoResult<Self> {
        let array: [u8; PUBLIC_KEY_SIZE] =
            bytes.try_into().map_err(|_| CryptoError::InvalidKeyLength {
                expected: PUBLIC_KEY_SIZE,
                actual: bytes.len(),
            })?;
        Ok(Self::public_only(PublicKey::from(array)))
    }

    /// Sets or clears the passphrase, e.g. once the principal has logged in.
    pub fn set_passphrase(&mut self, passphrase: Option<String>) {
        self.passphrase = passphrase.map(Zeroizing::new);
    }

    /// The principal's public key, if configured.
    pub fn public_key(&self) -> Option<&PublicKey> {
        self.public.as_ref()
    }

    /// The protected private key, if configured.
    pub fn private_key(&self) -> Option<&PassphraseProtectedKey> {
        self.private.as_ref()
    }
}

impl std::fmt::Debug for AsymmetricCryptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsymmetricCryptor")
            .field("public", &self.public.as_ref().map(|pk| STANDARD.encode(pk.as_bytes())))
            .field("private", &self.private.is_some())
            .field("passphrase", &self.passphrase.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl Cryptor for AsymmetricCryptor {
    fn encrypt(&self, data: &[u8]) -> CryptoResult<Vec<u8>> {
        let recipient = self
            .public
            .as_ref()
            .ok_or_else(|| CryptoError::encryption("no public key configured"))?;

        let ephemeral = SecretKey::generate(&mut rand::rngs::OsRng);
        let ephemeral_pk = ephemeral.public_key();
        let salsa_box = SalsaBox::new(recipient, &ephemeral);

        let mut nonce_bytes = [0u8; BOX_NONCE_SIZE];
        rand::rngs::OsRng.fill_bytes(&mut nonce_bytes);

        let ciphertext = salsa_box
            .encrypt(crypto_box::Nonce::from_slice(&nonce_bytes), data)
            .map_err(|e| CryptoError::encryption_caused_by("box seal failed", e))?;

        let mut out = Vec::with_capacity(PUBLIC_KEY_SIZE + BOX_NONCE_SIZE + ciphertext.len());
        out.extend_from_slice(ephemeral_pk.as_bytes());
        out.extend_from_slice(&nonce_bytes);
        out.extend_from_slice(&ciphertext);
        Ok(STANDARD.encode(out).into_bytes())
    }

    fn decrypt(&self, data: &[u8]) -> CryptoResult<Vec<u8>> {
        let (Some(private), Some(passphrase)) = (&self.private, &self.passphrase) else {
            return Err(CryptoError::decryption("private key or passphrase not configured"));
        };

        let raw = STANDARD
            .decode(data)
            .map_err(|e| CryptoError::decryption_caused_by("invalid base64", e))?;
        if raw.len() < PUBLIC_KEY_SIZE + BOX_NONCE_SIZE {
            return Err(CryptoError::decryption("data too short"));
        }
        let (ephemeral_bytes, rest) = raw.split_at(PUBLIC_KEY_SIZE);
        let (nonce_bytes, ciphertext) = rest.split_at(BOX_NONCE_SIZE);

        let mut ephemeral_pk = [0u8; PUBLIC_KEY_SIZE];
        ephemeral_pk.copy_from_slice(ephemeral_bytes);

        let secret = private
            .unlock(passphrase)
            .map_err(|e| CryptoError::decryption_caused_by("could not unlock private key", e))?;
        let salsa_box = SalsaBox::new(&PublicKey::from(ephemeral_pk), &secret);

        salsa_box
            .decrypt(crypto_box::Nonce::from_slice(nonce_bytes), ciphertext)
            .map_err(|e| {
                CryptoError::decryption_caused_by("box open failed (wrong key or tampered data)", e)
            })
    }

    fn can_encrypt(&self) -> bool {
        self.public.is_some()
    }

    fn can_decrypt(&self) -> bool {
        self.private.is_some() && self.passphrase.is_some()
    }
}
