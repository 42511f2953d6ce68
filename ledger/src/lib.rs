//! Staker ledger.
//!
//! Owns the two money-bearing account maps (balances and pending rewards)
//! and the only primitives allowed to move value between accounts. Every
//! primitive validates before it writes, so a failed call leaves the
//! backing store as it found it.

pub mod error;
pub mod ledger;

pub use error::LedgerError;
pub use ledger::Ledger;
