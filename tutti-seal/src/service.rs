//! The sealing algorithm.
//!
//! A seal encrypts the payload once under a fresh session key, then wraps
//! that session key separately for every principal. Adding or removing a
//! principal therefore only means re-sealing; the bulk encryption cost does
//! not grow with the number of principals.
//!
//! The session key lives in a [`Zeroizing`] buffer for the duration of one
//! `seal`/`unseal` call and is never logged.

use crate::envelope::{self, SealedEnvelope};
use crate::error::SealResult;
use crate::principal::PrincipalId;
use crate::registry::Registry;
use tracing::{debug, warn};
use tutti_crypto::{
    CryptoError, CryptoResult, Cryptor, CryptorFactory, KeyedCryptor, SymmetricFactory,
};
use zeroize::Zeroizing;

/// Stateless sealing service; the only dependency is the session-cryptor
/// factory.
#[derive(Debug, Clone, Default)]
pub struct SealingService<F = SymmetricFactory> {
    factory: F,
}

impl SealingService<SymmetricFactory> {
    /// A service using OS-random ChaCha20-Poly1305 session keys.
    pub fn new() -> Self {
        Self::with_factory(SymmetricFactory)
    }
}

impl<F: CryptorFactory> SealingService<F> {
    /// A service using `factory` for session cryptors.
    pub fn with_factory(factory: F) -> Self {
        Self { factory }
    }

    /// The injected factory.
    pub fn factory(&self) -> &F {
        &self.factory
    }

    /// Seals `plaintext` for every principal in `principals`.
    ///
    /// An empty registry returns the plaintext unchanged. Principals whose
    /// cryptor cannot encrypt right now are left out of the envelope rather
    /// than failing the seal; they will not be able to open it. A cryptor
    /// that hands the session key back unchanged fails the seal.
    pub fn seal<C: Cryptor>(
        &self,
        plaintext: &[u8],
        principals: &Registry<C>,
    ) -> CryptoResult<Vec<u8>> {
        if principals.is_empty() {
            debug!("no principals registered, leaving data unsealed");
            return Ok(plaintext.to_vec());
        }

        let session = self
            .factory
            .symmetric_cryptor()
            .map_err(|e| CryptoError::encryption_caused_by("could not create session cryptor", e))?;
        let payload = session
            .encrypt(plaintext)
            .map_err(|e| CryptoError::encryption_caused_by("payload encryption", e))?;
        let session_key = KeyedCryptor::key_bytes(&session)
            .ok_or_else(|| CryptoError::encryption("session cryptor has no key"))?;

        let keys = wrap_session_key(&session_key, principals)?;
        drop(session_key);

        let envelope = SealedEnvelope::new(payload, keys);
        debug!(
            principals = envelope.principal_count(),
            registered = principals.len(),
            payload_len = envelope.payload().len(),
            "sealed data"
        );

        envelope
            .encode()
            .map_err(|e| CryptoError::encryption_caused_by("could not encode sealed envelope", e))
    }

    /// Parses an envelope (see [`SealedEnvelope::parse`]).
    pub fn parse_seal(&self, data: &[u8]) -> SealResult<SealedEnvelope> {
        SealedEnvelope::parse(data)
    }

    /// Structural check (see [`envelope::is_sealed_data`]).
    pub fn is_sealed_data(&self, data: &[u8]) -> bool {
        envelope::is_sealed_data(data)
    }

    /// Principals an envelope was sealed for, without decrypting anything.
    pub fn principals_of(&self, data: &[u8]) -> SealResult<Vec<PrincipalId>> {
        Ok(SealedEnvelope::parse(data)?.principals().cloned().collect())
    }

    /// Opens an envelope as `principal_id` using that principal's cryptor.
    pub fn unseal<C: Cryptor + ?Sized>(
        &self,
        data: &[u8],
        principal_id: &str,
        cryptor: &C,
    ) -> CryptoResult<Vec<u8>> {
        let envelope = SealedEnvelope::parse(data)
            .map_err(|e| CryptoError::decryption_caused_by("malformed sealed envelope", e))?;
        self.unseal_envelope(&envelope, principal_id, cryptor)
    }

    /// Opens an already parsed envelope.
    pub fn unseal_envelope<C: Cryptor + ?Sized>(
        &self,
        envelope: &SealedEnvelope,
        principal_id: &str,
        cryptor: &C,
    ) -> CryptoResult<Vec<u8>> {
        let wrapped = envelope.wrapped_key(principal_id).ok_or_else(|| {
            CryptoError::decryption(format!("no key for principal {principal_id}"))
        })?;

        if !cryptor.can_decrypt() {
            return Err(CryptoError::decryption(format!(
                "cryptor for principal {principal_id} cannot decrypt"
            )));
        }

        let session_key = Zeroizing::new(cryptor.decrypt(wrapped).map_err(|e| {
            CryptoError::decryption_caused_by(
                format!("could not unwrap session key for principal {principal_id}"),
                e,
            )
        })?);

        let session = self
            .factory
            .symmetric_cryptor_with_key(&session_key)
            .map_err(|e| CryptoError::decryption_caused_by("unwrapped session key is unusable", e))?;
        drop(session_key);

        debug!(principal = principal_id, "unsealing payload");
        session
            .decrypt(envelope.payload())
            .map_err(|e| CryptoError::decryption_caused_by("payload decryption", e))
    }
}

fn wrap_session_key<C: Cryptor>(
    session_key: &[u8],
    principals: &Registry<C>,
) -> CryptoResult<Vec<(PrincipalId, Vec<u8>)>> {
    let mut keys = Vec::with_capacity(principals.len());
    for (id, cryptor) in principals.iter() {
        if !cryptor.can_encrypt() {
            warn!(principal = %id, "cryptor cannot encrypt, principal left out of seal");
            continue;
        }
        let wrapped = cryptor.encrypt(session_key).map_err(|e| {
            CryptoError::encryption_caused_by(
                format!("could not wrap session key for principal {id}"),
                e,
            )
        })?;
        if wrapped.as_slice() == session_key {
            return Err(CryptoError::encryption(format!(
                "cryptor for principal {id} returned the session key unencrypted"
            )));
        }
        keys.push((id.clone(), wrapped));
    }
    Ok(keys)
}
