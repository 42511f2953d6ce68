//! Pool controller for btcstake.
//!
//! The top-level state machine (uninitialized → active) that every external
//! call enters. It checks authorization and pool state, delegates arithmetic
//! to the yield engine and balance movement to the ledger, updates risk and
//! insurance figures, and emits one [`PoolEvent`] per successful call.
//!
//! ```ignore
//! let pool = PoolController::new(NullStore::new(), &PoolConfig::default())?;
//! let owner = CallContext::new(pool.owner().clone(), Tick::GENESIS);
//! pool.initialize(&owner, 500)?;
//! ```

pub mod config;
pub mod context;
pub mod controller;
pub mod error;
pub mod event;
pub mod metadata;

pub use config::PoolConfig;
pub use context::CallContext;
pub use controller::PoolController;
pub use error::{ConfigError, StakeError};
pub use event::{EventBus, PoolEvent};
pub use metadata::validate_uri;
