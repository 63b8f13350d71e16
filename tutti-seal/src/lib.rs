//! Multi-principal envelope sealing for Tutti secrets.
//!
//! A secret such as a database credential is sealed once and can then be
//! opened by any of a changing set of principals (administrators), without
//! the principals sharing a key and without re-encrypting the payload when
//! membership changes.
//!
//! # Scheme
//!
//! 1. A fresh session cryptor is minted by a [`CryptorFactory`] and encrypts
//!    the payload once.
//! 2. The raw session key is wrapped with each principal's own cryptor.
//! 3. Payload and wrapped keys are written as
//!    `LLLLLLLL|<payload>|id1:wrapped1;id2:wrapped2` (see [`envelope`]).
//!
//! Opening an envelope needs only one principal's cryptor: unwrap the
//! session key, rebuild the session cryptor, decrypt the payload.
//!
//! [`SealCryptor`] packages this behind the ordinary [`Cryptor`] interface,
//! and passes through data that is not sealed (legacy plaintext) unchanged.
//!
//! [`CryptorFactory`]: tutti_crypto::CryptorFactory
//! [`Cryptor`]: tutti_crypto::Cryptor

mod any;
mod config;
pub mod envelope;
mod error;
mod principal;
mod registry;
mod seal_cryptor;
mod service;

pub use any::AnyCryptor;
pub use config::{DecryptPolicy, SealConfig, SealSettings};
pub use envelope::{SealedEnvelope, is_sealed_data};
pub use error::{SealError, SealResult};
pub use principal::{PrincipalId, RESERVED_CHARS};
pub use registry::Registry;
pub use seal_cryptor::SealCryptor;
pub use service::SealingService;
