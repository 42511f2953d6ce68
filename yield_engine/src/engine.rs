//! Distribution and claim planning.
//!
//! The engine never writes. It turns the current pool state and tick into a
//! plan (a [`Distribution`] or a [`Claim`]) that the caller stages and
//! commits, keeping all arithmetic ahead of any mutation.

use crate::accrual::calculate_yield;
use crate::error::YieldError;
use btcstake_store::{DistributionRecord, PoolState};
use btcstake_types::{Amount, Tick};
use serde::{Deserialize, Serialize};

/// A validated pool-wide distribution, ready to be applied.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Distribution {
    /// History entry to write, keyed by the distribution tick.
    pub record: DistributionRecord,
    /// Ticks since the previous distribution.
    pub elapsed: u64,
    /// `total_yield` after this distribution.
    pub total_yield: Amount,
}

impl Distribution {
    /// Fold this distribution into the pool aggregates.
    pub fn apply_to(&self, state: &mut PoolState) {
        state.total_yield = self.total_yield;
        state.last_distribution_tick = self.record.tick;
    }
}

/// A validated staker claim.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    /// Rewards carried in the pending-rewards map.
    pub pending: Amount,
    /// Rewards accrued on the balance since the pool's last distribution.
    pub accrued: Amount,
    /// `pending + accrued`; always non-zero.
    pub total: Amount,
}

/// Period-based accrual engine.
#[derive(Clone, Copy, Debug)]
pub struct YieldEngine {
    ticks_per_period: u64,
}

impl YieldEngine {
    pub fn new(ticks_per_period: u64) -> Self {
        Self { ticks_per_period }
    }

    /// Apply the accrual formula with this engine's period.
    pub fn calculate_yield(
        &self,
        amount: Amount,
        rate: Amount,
        elapsed_ticks: u64,
    ) -> Result<Amount, YieldError> {
        calculate_yield(amount, rate, elapsed_ticks, self.ticks_per_period)
    }

    /// Ticks since the pool's last distribution.
    pub fn elapsed(&self, state: &PoolState, now: Tick) -> u64 {
        state.last_distribution_tick.elapsed_since(now)
    }

    /// Plan a pool-wide distribution at `now`.
    ///
    /// Fails with [`YieldError::PeriodNotElapsed`] unless at least one full
    /// period has passed since the last distribution. The amount is computed
    /// over `total_staked`; individual staker rewards are not touched.
    pub fn plan_distribution(
        &self,
        state: &PoolState,
        now: Tick,
    ) -> Result<Distribution, YieldError> {
        let elapsed = self.elapsed(state, now);
        if !state
            .last_distribution_tick
            .has_elapsed(self.ticks_per_period, now)
        {
            return Err(YieldError::PeriodNotElapsed {
                elapsed,
                required: self.ticks_per_period,
            });
        }
        let amount = self.calculate_yield(state.total_staked, state.yield_rate, elapsed)?;
        let total_yield = state
            .total_yield
            .checked_add(amount)
            .ok_or(YieldError::Overflow)?;
        Ok(Distribution {
            record: DistributionRecord {
                tick: now,
                amount,
                apy: state.yield_rate,
            },
            elapsed,
            total_yield,
        })
    }

    /// What a claim at `now` would pay, without the zero check.
    ///
    /// Elapsed time is measured from the pool's last distribution, not from
    /// the account's last claim: two claims inside one distribution window
    /// each see the full window.
    pub fn claimable(
        &self,
        state: &PoolState,
        balance: Amount,
        pending: Amount,
        now: Tick,
    ) -> Result<Claim, YieldError> {
        let accrued = self.calculate_yield(balance, state.yield_rate, self.elapsed(state, now))?;
        let total = pending.checked_add(accrued).ok_or(YieldError::Overflow)?;
        Ok(Claim {
            pending,
            accrued,
            total,
        })
    }

    /// Plan a claim at `now`; fails with [`YieldError::NothingToClaim`] when it would pay zero.
    pub fn plan_claim(
        &self,
        state: &PoolState,
        balance: Amount,
        pending: Amount,
        now: Tick,
    ) -> Result<Claim, YieldError> {
        let claim = self.claimable(state, balance, pending, now)?;
        if claim.total == 0 {
            return Err(YieldError::NothingToClaim);
        }
        Ok(claim)
    }
}
