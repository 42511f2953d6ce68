//! Pool singleton storage trait.

use crate::state::PoolState;
use crate::StoreError;

pub trait PoolStateStore {
    /// Load the pool record; a fresh store yields `PoolState::default()`.
    fn get_pool_state(&self) -> Result<PoolState, StoreError>;
    fn put_pool_state(&self, state: &PoolState) -> Result<(), StoreError>;
}
