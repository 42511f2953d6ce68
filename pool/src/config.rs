//! Pool configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::Path;

use btcstake_types::{PoolParams, Principal, TokenMetadata};

use crate::ConfigError;

/// Deployment-time configuration for one pool.
///
/// Can be loaded from a TOML file via [`PoolConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig {
    /// The only principal allowed to initialize, distribute and set metadata.
    #[serde(default = "default_owner")]
    pub owner: Principal,

    /// Initial state of the insurance switch, applied at initialize.
    #[serde(default)]
    pub insurance_active: bool,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Numeric limits of the pool.
    #[serde(default)]
    pub params: PoolParams,

    /// Token name, symbol, decimals and initial URI.
    #[serde(default)]
    pub token: TokenMetadata,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_owner() -> Principal {
    Principal::new("pool-owner")
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl PoolConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// Reject parameters that would make the pool unusable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.params.validate()?;
        Ok(())
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            owner: default_owner(),
            insurance_active: false,
            log_format: default_log_format(),
            log_level: default_log_level(),
            params: PoolParams::default(),
            token: TokenMetadata::default(),
        }
    }
}
