//! Sealing configuration, read from `seal.toml`.
//!
//! ```toml
//! [seal]
//! decrypt-policy = "all"   # or "any"
//!
//! [kdf]
//! memory-cost = 19456
//! time-cost = 2
//! parallelism = 1
//! ```

use crate::error::{SealError, SealResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};
use tutti_crypto::KdfParams;

/// How a seal cryptor answers `can_decrypt`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecryptPolicy {
    #[default]
    /// Every registered cryptor must be able to decrypt.
    All,
    /// At least one registered cryptor must be able to decrypt.
    Any,
}

/// Settings for seal cryptors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SealSettings {
    #[serde(default)]
    pub decrypt_policy: DecryptPolicy,
}

/// Parsed `seal.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealConfig {
    #[serde(default)]
    pub seal: SealSettings,
    /// Parameters used when protecting principals' private keys.
    #[serde(default)]
    pub kdf: KdfParams,
}

impl SealConfig {
    /// Loads configuration from `path`.
    ///
    /// A missing file yields the defaults. An unreadable or unparseable file
    /// also yields the defaults, with a warning.
    pub fn load_from(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            info!("No seal config found at {:?}, using defaults", path);
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(contents) => match Self::from_toml_str(&contents) {
                Ok(config) => {
                    info!("Loaded seal config from {:?}", path);
                    config
                }
                Err(e) => {
                    warn!("{} in {:?}. Falling back to defaults.", e, path);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read seal config {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(contents: &str) -> SealResult<Self> {
        toml::from_str(contents).map_err(|e| SealError::Config(e.to_string()))
    }

    /// Serializes to TOML.
    pub fn to_toml_string(&self) -> SealResult<String> {
        toml::to_string(self).map_err(|e| SealError::Config(e.to_string()))
    }

    /// The decrypt policy for seal cryptors.
    pub fn decrypt_policy(&self) -> DecryptPolicy {
        self.seal.decrypt_policy
    }

    /// Key derivation parameters for passphrase-protected keys.
    pub fn kdf_params(&self) -> KdfParams {
        self.kdf.clone()
    }
}
