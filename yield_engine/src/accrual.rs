//! The accrual formula.

use crate::error::YieldError;
use btcstake_types::{Amount, BASIS_POINTS};

/// Yield earned by `amount` at `rate` basis points over `elapsed_ticks`.
///
/// ```text
/// time_factor = floor(elapsed_ticks / ticks_per_period)
/// base_yield  = amount * rate
/// yield       = floor(base_yield * time_factor / 10000)
/// ```
///
/// The order is fixed: floor division is lossy and non-associative, so
/// reordering changes results. Remainder ticks below a whole period
/// contribute nothing, and nothing compounds within a call. With no whole
/// period elapsed the result is zero for any amount, however large.
pub fn calculate_yield(
    amount: Amount,
    rate: Amount,
    elapsed_ticks: u64,
    ticks_per_period: u64,
) -> Result<Amount, YieldError> {
    if ticks_per_period == 0 {
        return Err(YieldError::ZeroPeriod);
    }
    let periods = elapsed_ticks / ticks_per_period;
    if periods == 0 {
        return Ok(0);
    }
    let time_factor = Amount::from(periods);
    let base_yield = amount.checked_mul(rate).ok_or(YieldError::Overflow)?;
    let scaled = base_yield
        .checked_mul(time_factor)
        .ok_or(YieldError::Overflow)?;
    Ok(scaled / BASIS_POINTS)
}
