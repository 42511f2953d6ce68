//! Pool parameters: the deployment-time constants of a staking pool.
//!
//! These are fixed for the lifetime of a pool instance. Only the yield rate
//! (chosen at initialize) and the insurance switch live in mutable pool state.

use crate::amount::{Amount, SATS_PER_BTC};
use crate::error::TypesError;
use serde::{Deserialize, Serialize};

/// Numeric limits governing every pool operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolParams {
    /// Smallest amount accepted by a single `stake` call.
    #[serde(default = "default_minimum_stake", with = "crate::amount::serde_int")]
    pub minimum_stake: Amount,

    /// Upper bound on the yield rate, in basis points.
    #[serde(default = "default_max_yield_rate", with = "crate::amount::serde_int")]
    pub max_yield_rate: Amount,

    /// Ticks that make up one accrual period (one day of blocks by default).
    #[serde(default = "default_ticks_per_period")]
    pub ticks_per_period: u64,

    /// Staked base units per risk-score point.
    #[serde(default = "default_score_unit", with = "crate::amount::serde_int")]
    pub score_unit: Amount,

    /// Longest token URI accepted, in bytes.
    #[serde(default = "default_max_uri_len")]
    pub max_uri_len: usize,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_minimum_stake() -> Amount {
    SATS_PER_BTC / 1_000
}

fn default_max_yield_rate() -> Amount {
    2_000
}

fn default_ticks_per_period() -> u64 {
    144
}

fn default_score_unit() -> Amount {
    SATS_PER_BTC / 100
}

fn default_max_uri_len() -> usize {
    256
}

impl PoolParams {
    /// Check that the parameters describe a usable pool.
    ///
    /// A zero period or zero score unit would divide by zero; a zero rate
    /// ceiling would make `initialize` impossible.
    pub fn validate(&self) -> Result<(), TypesError> {
        if self.ticks_per_period == 0 {
            return Err(TypesError::InvalidParams("ticks_per_period must be non-zero".into()));
        }
        if self.score_unit == 0 {
            return Err(TypesError::InvalidParams("score_unit must be non-zero".into()));
        }
        if self.max_yield_rate == 0 {
            return Err(TypesError::InvalidParams("max_yield_rate must be non-zero".into()));
        }
        Ok(())
    }
}

impl Default for PoolParams {
    fn default() -> Self {
        Self {
            minimum_stake: default_minimum_stake(),
            max_yield_rate: default_max_yield_rate(),
            ticks_per_period: default_ticks_per_period(),
            score_unit: default_score_unit(),
            max_uri_len: default_max_uri_len(),
        }
    }
}

/// Descriptive metadata for the staked-asset token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_symbol")]
    pub symbol: String,

    #[serde(default = "default_decimals")]
    pub decimals: u8,

    /// Initial token URI; may later be replaced via `set_token_uri`.
    #[serde(default)]
    pub uri: Option<String>,
}

fn default_name() -> String {
    "Staked Bitcoin".to_string()
}

fn default_symbol() -> String {
    "stBTC".to_string()
}

fn default_decimals() -> u8 {
    8
}

impl Default for TokenMetadata {
    fn default() -> Self {
        Self {
            name: default_name(),
            symbol: default_symbol(),
            decimals: default_decimals(),
            uri: None,
        }
    }
}
