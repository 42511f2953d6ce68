//! Token metadata accessors.
//!
//! Name, symbol and decimals are fixed by configuration. The URI lives in
//! the store so the owner can replace or clear it.

use btcstake_store::{MetaStore, StakeStore};
use btcstake_types::Amount;

use crate::context::CallContext;
use crate::controller::PoolController;
use crate::error::StakeError;
use crate::event::PoolEvent;

/// Reject a URI longer than `max_len` bytes. Absence is always valid.
pub fn validate_uri(uri: Option<&str>, max_len: usize) -> Result<(), StakeError> {
    match uri {
        Some(u) if u.len() > max_len => Err(StakeError::InvalidUri {
            len: u.len(),
            max: max_len,
        }),
        _ => Ok(()),
    }
}

impl<S: StakeStore> PoolController<S> {
    pub fn name(&self) -> &str {
        &self.token.name
    }

    pub fn symbol(&self) -> &str {
        &self.token.symbol
    }

    pub fn decimals(&self) -> u8 {
        self.token.decimals
    }

    pub fn token_uri(&self) -> Result<Option<String>, StakeError> {
        Ok(self.store.get_token_uri()?)
    }

    /// Staked tokens outstanding; always equal to `total_staked`.
    pub fn total_supply(&self) -> Result<Amount, StakeError> {
        Ok(self.store.get_pool_state()?.total_staked)
    }

    /// Store or clear the token URI. Owner only.
    pub fn set_token_uri(
        &self,
        ctx: &CallContext,
        uri: Option<String>,
    ) -> Result<PoolEvent, StakeError> {
        self.execute("set_token_uri", ctx, |batch| {
            self.require_owner(ctx)?;
            validate_uri(uri.as_deref(), self.params.max_uri_len)?;
            batch.put_token_uri(uri.as_deref())?;
            Ok(PoolEvent::TokenUriUpdated { uri })
        })
    }
}
