//! Fundamental types for the btcstake pool.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! caller identities, logical ticks, amounts, and pool parameters.

pub mod amount;
pub mod error;
pub mod params;
pub mod principal;
pub mod tick;

pub use amount::{Amount, BASIS_POINTS, SATS_PER_BTC};
pub use error::TypesError;
pub use params::{PoolParams, TokenMetadata};
pub use principal::Principal;
pub use tick::Tick;
