//! Nullable infrastructure for deterministic testing.
//!
//! The pool's two external collaborators, the host's tick clock and the
//! key-value store, are abstracted behind traits. This crate provides
//! implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests and in the
//! scenario simulator.

pub mod clock;
pub mod store;

pub use clock::NullClock;
pub use store::NullStore;
