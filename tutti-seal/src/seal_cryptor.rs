//! Composite cryptor over a registry of principals.
//!
//! Build one per operation from the current authorization source and drop it
//! afterwards; there is no process-wide "current" seal cryptor. Mutating the
//! registry takes `&mut self`, so sharing an instance across threads needs
//! an external lock.

use crate::any::AnyCryptor;
use crate::config::{DecryptPolicy, SealConfig};
use crate::envelope::{self, SealedEnvelope};
use crate::principal::PrincipalId;
use crate::registry::Registry;
use crate::service::SealingService;
use tracing::debug;
use tutti_crypto::{CryptoError, CryptoResult, Cryptor, CryptorFactory, SymmetricFactory};

/// Seals for every registered principal and opens envelopes with the first
/// registered principal the envelope was sealed for.
#[derive(Debug, Clone)]
pub struct SealCryptor<C = AnyCryptor, F = SymmetricFactory> {
    registry: Registry<C>,
    service: SealingService<F>,
    decrypt_policy: DecryptPolicy,
}

impl<C> SealCryptor<C, SymmetricFactory> {
    /// An empty seal cryptor with the production session factory.
    pub fn new() -> Self {
        Self::with_service(SealingService::new())
    }

    /// An empty seal cryptor configured from `config`.
    pub fn from_config(config: &SealConfig) -> Self {
        Self::new().with_decrypt_policy(config.decrypt_policy())
    }
}

impl<C> Default for SealCryptor<C, SymmetricFactory> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C, F> SealCryptor<C, F> {
    /// An empty seal cryptor using `service`.
    pub fn with_service(service: SealingService<F>) -> Self {
        Self {
            registry: Registry::new(),
            service,
            decrypt_policy: DecryptPolicy::default(),
        }
    }

    /// Sets the `can_decrypt` policy.
    pub fn with_decrypt_policy(mut self, policy: DecryptPolicy) -> Self {
        self.decrypt_policy = policy;
        self
    }

    /// The `can_decrypt` policy.
    pub fn decrypt_policy(&self) -> DecryptPolicy {
        self.decrypt_policy
    }

    /// Replaces the whole registry.
    pub fn set_all(&mut self, registry: Registry<C>) {
        self.registry = registry;
    }

    /// The current registry.
    pub fn all(&self) -> &Registry<C> {
        &self.registry
    }

    /// Registers `cryptor` for `id`, returning the cryptor it replaces.
    pub fn add(&mut self, id: PrincipalId, cryptor: C) -> Option<C> {
        self.registry.insert(id, cryptor)
    }

    /// Unregisters `id`.
    pub fn remove(&mut self, id: &str) -> Option<C> {
        self.registry.remove(id)
    }
}

impl<C: Cryptor, F: CryptorFactory> SealCryptor<C, F> {
    /// Registered principals present in `envelope`, in registry order.
    pub fn candidates<'a>(
        &'a self,
        envelope: &'a SealedEnvelope,
    ) -> impl Iterator<Item = (&'a PrincipalId, &'a C)> {
        self.registry
            .iter()
            .filter(move |(id, _)| envelope.has_principal(id.as_str()))
    }
}

impl<C: Cryptor, F: CryptorFactory> Cryptor for SealCryptor<C, F> {
    fn encrypt(&self, data: &[u8]) -> CryptoResult<Vec<u8>> {
        self.service.seal(data, &self.registry)
    }

    fn decrypt(&self, data: &[u8]) -> CryptoResult<Vec<u8>> {
        if !envelope::is_sealed_data(data) {
            debug!("data is not sealed, returning it unchanged");
            return Ok(data.to_vec());
        }

        let envelope = self
            .service
            .parse_seal(data)
            .map_err(|e| CryptoError::decryption_caused_by("malformed sealed envelope", e))?;

        let Some((id, cryptor)) = self.candidates(&envelope).next() else {
            return Err(CryptoError::decryption("no valid candidates"));
        };

        debug!(principal = %id, "selected unseal candidate");
        self.service.unseal_envelope(&envelope, id.as_str(), cryptor)
    }

    fn can_encrypt(&self) -> bool {
        self.registry.iter().all(|(_, cryptor)| cryptor.can_encrypt())
    }

    fn can_decrypt(&self) -> bool {
        match self.decrypt_policy {
            DecryptPolicy::All => self.registry.iter().all(|(_, cryptor)| cryptor.can_decrypt()),
            DecryptPolicy::Any => self.registry.iter().any(|(_, cryptor)| cryptor.can_decrypt()),
        }
    }
}
