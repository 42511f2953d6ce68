//! Risk and insurance tracking.
//!
//! - A per-account risk score that only ever grows with cumulative stake.
//! - Per-account insurance coverage figures, overwritten (never summed)
//!   while the pool-level insurance switch is on.
//!
//! Coverage is bookkeeping only; nothing here pays out.

pub mod error;
pub mod tracker;

pub use error::RiskError;
pub use tracker::{score_increment, RiskTracker};
