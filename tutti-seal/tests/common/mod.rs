//! Shared test helpers: scripted cryptors and factories.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tutti_crypto::{
    CryptoError, CryptoResult, Cryptor, CryptorFactory, KdfParams, KeyedCryptor,
    SymmetricCryptor, SymmetricFactory, SymmetricKey,
};
use tutti_seal::{PrincipalId, Registry};
use zeroize::Zeroizing;

pub fn id(s: &str) -> PrincipalId {
    PrincipalId::new(s).unwrap()
}

pub fn fast_kdf() -> KdfParams {
    KdfParams {
        memory_cost: 1024,
        time_cost: 1,
        parallelism: 1,
    }
}

/// A real symmetric cryptor per principal; cheap enough for property tests.
pub fn symmetric_principal() -> SymmetricCryptor {
    SymmetricCryptor::new(SymmetricKey::generate())
}

pub fn registry_of<C>(entries: Vec<(&str, C)>) -> Registry<C> {
    entries.into_iter().map(|(name, c)| (id(name), c)).collect()
}

/// Cryptor driven by fixed lookup tables, counting every call.
#[derive(Debug, Clone, Default)]
pub struct TableCryptor {
    encrypt_table: Vec<(Vec<u8>, Vec<u8>)>,
    decrypt_table: Vec<(Vec<u8>, Vec<u8>)>,
    key: Option<Vec<u8>>,
    can_encrypt: bool,
    can_decrypt: bool,
    calls: Arc<AtomicUsize>,
}

impl TableCryptor {
    /// Capable in both directions, with empty tables.
    pub fn new() -> Self {
        Self {
            can_encrypt: true,
            can_decrypt: true,
            ..Self::default()
        }
    }

    pub fn encrypts(mut self, from: &[u8], to: &[u8]) -> Self {
        self.encrypt_table.push((from.to_vec(), to.to_vec()));
        self
    }

    pub fn decrypts(mut self, from: &[u8], to: &[u8]) -> Self {
        self.decrypt_table.push((from.to_vec(), to.to_vec()));
        self
    }

    pub fn with_key(mut self, key: &[u8]) -> Self {
        self.key = Some(key.to_vec());
        self
    }

    pub fn unable_to_encrypt(mut self) -> Self {
        self.can_encrypt = false;
        self
    }

    pub fn unable_to_decrypt(mut self) -> Self {
        self.can_decrypt = false;
        self
    }

    /// Number of encrypt/decrypt calls made so far, across clones.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Shares the call counter so clones can be observed after moving into a registry.
    pub fn counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }

    fn lookup(table: &[(Vec<u8>, Vec<u8>)], data: &[u8]) -> Option<Vec<u8>> {
        table
            .iter()
            .find(|(from, _)| from.as_slice() == data)
            .map(|(_, to)| to.clone())
    }
}

impl Cryptor for TableCryptor {
    fn encrypt(&self, data: &[u8]) -> CryptoResult<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Self::lookup(&self.encrypt_table, data)
            .ok_or_else(|| CryptoError::encryption("no scripted ciphertext"))
    }

    fn decrypt(&self, data: &[u8]) -> CryptoResult<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Self::lookup(&self.decrypt_table, data)
            .ok_or_else(|| CryptoError::decryption("no scripted plaintext"))
    }

    fn can_encrypt(&self) -> bool {
        self.can_encrypt
    }

    fn can_decrypt(&self) -> bool {
        self.can_decrypt
    }
}

impl KeyedCryptor for TableCryptor {
    fn key_bytes(&self) -> Option<Zeroizing<Vec<u8>>> {
        self.key.clone().map(Zeroizing::new)
    }
}

/// Factory handing out a scripted session cryptor.
#[derive(Debug, Clone)]
pub struct ScriptedFactory {
    /// Returned by `symmetric_cryptor()`.
    pub fresh: TableCryptor,
    /// Returned by `symmetric_cryptor_with_key(key)` when `key` matches.
    pub keyed: Vec<(Vec<u8>, TableCryptor)>,
}

impl CryptorFactory for ScriptedFactory {
    type Cryptor = TableCryptor;

    fn symmetric_cryptor(&self) -> CryptoResult<TableCryptor> {
        Ok(self.fresh.clone())
    }

    fn symmetric_cryptor_with_key(&self, key: &[u8]) -> CryptoResult<TableCryptor> {
        self.keyed
            .iter()
            .find(|(k, _)| k.as_slice() == key)
            .map(|(_, c)| c.clone())
            .ok_or_else(|| CryptoError::decryption("unknown session key"))
    }
}

/// The factory behind the `"00000003|XYZ|alice:eA;bob:eB"` vector: session
/// key `K`, payload `secret` <-> `XYZ`.
pub fn vector_factory() -> ScriptedFactory {
    ScriptedFactory {
        fresh: TableCryptor::new().with_key(b"K").encrypts(b"secret", b"XYZ"),
        keyed: vec![(
            b"K".to_vec(),
            TableCryptor::new().with_key(b"K").decrypts(b"XYZ", b"secret"),
        )],
    }
}

pub fn vector_alice() -> TableCryptor {
    TableCryptor::new().encrypts(b"K", b"eA").decrypts(b"eA", b"K")
}

pub fn vector_bob() -> TableCryptor {
    TableCryptor::new().encrypts(b"K", b"eB").decrypts(b"eB", b"K")
}

/// Production factory that remembers the last session key it generated.
#[derive(Debug, Clone, Default)]
pub struct RecordingFactory {
    last_key: Arc<Mutex<Option<Vec<u8>>>>,
}

impl RecordingFactory {
    pub fn last_key(&self) -> Option<Vec<u8>> {
        self.last_key.lock().unwrap().clone()
    }
}

impl CryptorFactory for RecordingFactory {
    type Cryptor = SymmetricCryptor;

    fn symmetric_cryptor(&self) -> CryptoResult<SymmetricCryptor> {
        let cryptor = SymmetricFactory.symmetric_cryptor()?;
        *self.last_key.lock().unwrap() = cryptor.key_bytes().map(|k| k.to_vec());
        Ok(cryptor)
    }

    fn symmetric_cryptor_with_key(&self, key: &[u8]) -> CryptoResult<SymmetricCryptor> {
        SymmetricFactory.symmetric_cryptor_with_key(key)
    }
}

/// True when `needle` occurs anywhere in `haystack`.
pub fn contains_bytes(haystack: &[u8], needle: &[u8]) -> bool {
    !needle.is_empty() && haystack.windows(needle.len()).any(|w| w == needle)
}
