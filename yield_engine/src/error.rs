//! Yield-specific errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum YieldError {
    #[error("distribution not yet eligible: {elapsed} ticks elapsed, {required} required")]
    PeriodNotElapsed { elapsed: u64, required: u64 },

    #[error("no rewards accrued for this account")]
    NothingToClaim,

    #[error("accrual period must be non-zero")]
    ZeroPeriod,

    #[error("arithmetic overflow in yield computation")]
    Overflow,

    #[error("storage error: {0}")]
    Storage(#[from] btcstake_store::StoreError),
}
