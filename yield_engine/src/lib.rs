//! Yield engine: the accrual algorithm and the pool-wide distribution ledger.
//!
//! Yield is a deterministic integer function of stake, rate and whole periods:
//! `yield = floor(amount × rate × floor(elapsed / period) / 10_000)`
//!
//! This crate handles:
//! - The accrual formula with its exact floor-division order
//! - Planning a pool-wide distribution (eligibility, amount, new aggregates)
//! - Planning a staker claim against the pool's distribution anchor
//! - Reading and writing the tick-keyed distribution history

pub mod accrual;
pub mod engine;
pub mod error;
pub mod history;

pub use accrual::calculate_yield;
pub use engine::{Claim, Distribution, YieldEngine};
pub use error::YieldError;
pub use history::DistributionLedger;
