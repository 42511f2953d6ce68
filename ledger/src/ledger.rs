//! Balance and pending-reward primitives over an [`AccountStore`].

use crate::error::LedgerError;
use btcstake_store::AccountStore;
use btcstake_types::{Amount, Principal};

/// Ledger view over any account store (the backing store itself, or a
/// `WriteBatch` staging one pool call).
pub struct Ledger<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S: AccountStore + ?Sized> Ledger<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub fn get_balance(&self, who: &Principal) -> Result<Amount, LedgerError> {
        Ok(self.store.get_balance(who)?)
    }

    pub fn get_rewards(&self, who: &Principal) -> Result<Amount, LedgerError> {
        Ok(self.store.get_pending_rewards(who)?)
    }

    /// Add `amount` to `who`'s balance. Returns the new balance.
    pub fn credit(&self, who: &Principal, amount: Amount) -> Result<Amount, LedgerError> {
        let balance = self.store.get_balance(who)?;
        let updated = balance.checked_add(amount).ok_or(LedgerError::Overflow)?;
        self.store.put_balance(who, updated)?;
        Ok(updated)
    }

    /// Remove `amount` from `who`'s balance. Returns the new balance.
    pub fn debit(&self, who: &Principal, amount: Amount) -> Result<Amount, LedgerError> {
        let available = self.store.get_balance(who)?;
        let updated = available
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientBalance {
                needed: amount,
                available,
            })?;
        self.store.put_balance(who, updated)?;
        Ok(updated)
    }

    /// Move `amount` from `from` to `to` as one unit.
    ///
    /// Both sides are checked before either is written: if the debit would
    /// fail, or the credit would overflow, neither balance changes.
    /// Returns the new `(from, to)` balances.
    pub fn transfer(
        &self,
        amount: Amount,
        from: &Principal,
        to: &Principal,
    ) -> Result<(Amount, Amount), LedgerError> {
        if amount == 0 {
            return Err(LedgerError::ZeroAmount);
        }
        if from == to {
            return Err(LedgerError::SelfTransfer);
        }
        let available = self.store.get_balance(from)?;
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                needed: amount,
                available,
            });
        }
        self.store
            .get_balance(to)?
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;

        let from_balance = self.debit(from, amount)?;
        let to_balance = self.credit(to, amount)?;
        Ok((from_balance, to_balance))
    }

    /// Read and zero `who`'s pending rewards. Returns what was pending.
    pub fn take_rewards(&self, who: &Principal) -> Result<Amount, LedgerError> {
        let pending = self.store.get_pending_rewards(who)?;
        if pending != 0 {
            self.store.put_pending_rewards(who, 0)?;
        }
        Ok(pending)
    }

    /// Sum of every stored balance.
    pub fn total_balances(&self) -> Result<Amount, LedgerError> {
        self.store
            .iter_account_values(btcstake_store::AccountField::Balance)?
            .into_iter()
            .try_fold(0u128, |acc, (_, balance)| acc.checked_add(balance))
            .ok_or(LedgerError::Overflow)
    }
}
