//! Allowance storage trait.
//!
//! The (owner, spender) table is part of the persisted layout but no pool
//! operation consults or writes it; there is no delegated transfer.

use crate::StoreError;
use btcstake_types::{Amount, Principal};

pub trait AllowanceStore {
    fn get_allowance(&self, owner: &Principal, spender: &Principal) -> Result<Amount, StoreError>;
    fn put_allowance(
        &self,
        owner: &Principal,
        spender: &Principal,
        amount: Amount,
    ) -> Result<(), StoreError>;
}
