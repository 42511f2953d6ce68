//! Persisted record types.

use btcstake_types::{Amount, Tick};
use serde::{Deserialize, Serialize};

/// The pool-wide singleton record.
///
/// Created inactive at deployment (`Default`); flips to active exactly once.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolState {
    pub active: bool,
    /// Sum of every account balance.
    pub total_staked: Amount,
    /// Cumulative yield recorded by distributions.
    pub total_yield: Amount,
    /// Current yield rate in basis points.
    pub yield_rate: Amount,
    pub last_distribution_tick: Tick,
    pub insurance_active: bool,
    /// Reserved for payout logic that lives outside the pool; never mutated here.
    pub insurance_fund_balance: Amount,
}

/// One pool-wide yield distribution, keyed by the tick it happened at.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionRecord {
    pub tick: Tick,
    /// Yield computed over `total_staked` for the elapsed window.
    pub amount: Amount,
    /// Rate in force at distribution time, in basis points.
    pub apy: Amount,
}
