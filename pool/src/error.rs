//! Error types for the pool controller.
//!
//! [`StakeError`] is the public error surface of every pool operation. Each
//! variant carries a stable numeric code (see [`StakeError::code`]) that hosts
//! and observers can rely on across releases.

use btcstake_ledger::LedgerError;
use btcstake_risk::RiskError;
use btcstake_store::StoreError;
use btcstake_types::{Amount, TypesError};
use btcstake_yield::YieldError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StakeError {
    #[error("caller is not the pool owner")]
    OwnerOnly,

    #[error("pool is already initialized")]
    AlreadyInitialized,

    #[error("pool is not initialized")]
    NotInitialized,

    #[error("pool is active")]
    PoolActive,

    #[error("pool is not active")]
    PoolInactive,

    #[error("invalid amount: {0}")]
    InvalidAmount(&'static str),

    #[error("insufficient balance: need {needed}, available {available}")]
    InsufficientBalance { needed: Amount, available: Amount },

    #[error("no yield available")]
    NoYieldAvailable,

    #[error("stake of {amount} is below the minimum of {minimum}")]
    MinimumStake { amount: Amount, minimum: Amount },

    #[error("caller is not authorized to act for this account")]
    Unauthorized,

    #[error("token uri is {len} bytes, limit is {max}")]
    InvalidUri { len: usize, max: usize },

    #[error("arithmetic overflow")]
    Overflow,

    #[error("storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("pool misconfigured: {0}")]
    Misconfigured(String),
}

impl StakeError {
    /// Stable numeric code for this error.
    pub fn code(&self) -> u32 {
        match self {
            StakeError::OwnerOnly => 100,
            StakeError::AlreadyInitialized => 101,
            StakeError::NotInitialized => 102,
            StakeError::PoolActive => 103,
            StakeError::PoolInactive => 104,
            StakeError::InvalidAmount(_) => 105,
            StakeError::InsufficientBalance { .. } => 106,
            StakeError::NoYieldAvailable => 107,
            StakeError::MinimumStake { .. } => 108,
            StakeError::Unauthorized => 109,
            StakeError::InvalidUri { .. } => 110,
            StakeError::Overflow => 111,
            StakeError::Storage(_) => 500,
            StakeError::Misconfigured(_) => 501,
        }
    }

    /// Whether the failure came from the backend or setup rather than from
    /// the caller's request.
    pub fn is_infrastructure(&self) -> bool {
        matches!(self, StakeError::Storage(_) | StakeError::Misconfigured(_))
    }
}

impl From<LedgerError> for StakeError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::ZeroAmount => StakeError::InvalidAmount("amount must be non-zero"),
            LedgerError::SelfTransfer => {
                StakeError::InvalidAmount("sender and recipient must differ")
            }
            LedgerError::InsufficientBalance { needed, available } => {
                StakeError::InsufficientBalance { needed, available }
            }
            LedgerError::Overflow => StakeError::Overflow,
            LedgerError::Storage(e) => StakeError::Storage(e),
        }
    }
}

impl From<YieldError> for StakeError {
    fn from(err: YieldError) -> Self {
        match err {
            YieldError::PeriodNotElapsed { .. } | YieldError::NothingToClaim => {
                StakeError::NoYieldAvailable
            }
            YieldError::ZeroPeriod => StakeError::Misconfigured(err.to_string()),
            YieldError::Overflow => StakeError::Overflow,
            YieldError::Storage(e) => StakeError::Storage(e),
        }
    }
}

impl From<RiskError> for StakeError {
    fn from(err: RiskError) -> Self {
        match err {
            RiskError::ZeroScoreUnit => StakeError::Misconfigured(err.to_string()),
            RiskError::Overflow => StakeError::Overflow,
            RiskError::Storage(e) => StakeError::Storage(e),
        }
    }
}

/// Failure to load or validate a [`PoolConfig`](crate::PoolConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("failed to serialize config: {0}")]
    Serialize(String),

    #[error("invalid pool parameters: {0}")]
    Invalid(#[from] TypesError),

    #[error("storage error during setup: {0}")]
    Storage(#[from] StoreError),
}
