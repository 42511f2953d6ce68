//! Abstract storage traits for the btcstake pool.
//!
//! Every storage backend (in-memory for testing, or whatever the host
//! provides) implements these traits. The rest of the codebase depends only
//! on the traits. Reads never fail on a missing key: absent entries read as
//! their zero/default value, exactly as an untouched map slot would.

pub mod account;
pub mod allowance;
pub mod batch;
pub mod error;
pub mod history;
pub mod meta;
pub mod pool;
pub mod state;

pub use account::{AccountField, AccountStore};
pub use allowance::AllowanceStore;
pub use batch::WriteBatch;
pub use error::StoreError;
pub use history::HistoryStore;
pub use meta::MetaStore;
pub use pool::PoolStateStore;
pub use state::{DistributionRecord, PoolState};

/// Everything the pool controller needs from a backend.
pub trait StakeStore:
    PoolStateStore + AccountStore + HistoryStore + AllowanceStore + MetaStore
{
}

impl<T> StakeStore for T where
    T: PoolStateStore + AccountStore + HistoryStore + AllowanceStore + MetaStore
{
}
