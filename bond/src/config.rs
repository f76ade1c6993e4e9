//! Engine configuration, loaded from TOML.

use crate::engine::{BondEngine, Collaborators};
use crate::error::BondError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use vow_types::{BondParams, Identity};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Identity the engine mints as; must be authorised on every issuer and ledger.
    #[serde(default = "default_minter")]
    pub minter: Identity,

    /// Log output format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub params: BondParams,
}

fn default_minter() -> Identity {
    Identity::from_low_u64(1)
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl EngineConfig {
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, BondError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| BondError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, BondError> {
        toml::from_str(s).map_err(|e| BondError::Config(e.to_string()))
    }

    pub fn to_toml_string(&self) -> Result<String, BondError> {
        toml::to_string_pretty(self).map_err(|e| BondError::Config(e.to_string()))
    }

    /// Build an engine with empty state from this configuration.
    pub fn build_engine(&self, collaborators: Collaborators) -> Result<BondEngine, BondError> {
        BondEngine::new(self.params.clone(), self.minter, collaborators)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            minter: default_minter(),
            log_format: default_log_format(),
            log_level: default_log_level(),
            params: BondParams::default(),
        }
    }
}
