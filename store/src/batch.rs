//! Write batching. Stages every write of one pool call in memory and applies
//! them to the backing store in a single pass.
//!
//! # Usage
//!
//! ```ignore
//! let batch = WriteBatch::new(&store);
//! batch.put_balance(&alice, 100)?;
//! batch.put_pool_state(&state)?;
//! batch.commit()?;
//! ```
//!
//! The batch implements every storage trait as a read-through overlay: reads
//! see staged writes first and fall back to the backing store. If the batch
//! is dropped without calling [`WriteBatch::commit`], nothing reaches the
//! backing store.

use std::cell::RefCell;
use std::collections::BTreeMap;

use btcstake_types::{Amount, Principal, Tick};

use crate::account::{AccountField, AccountStore};
use crate::allowance::AllowanceStore;
use crate::history::HistoryStore;
use crate::meta::MetaStore;
use crate::pool::PoolStateStore;
use crate::state::{DistributionRecord, PoolState};
use crate::{StakeStore, StoreError};

pub struct WriteBatch<'a, S: ?Sized> {
    base: &'a S,
    pool: RefCell<Option<PoolState>>,
    accounts: RefCell<BTreeMap<(AccountField, Principal), Amount>>,
    history: RefCell<BTreeMap<Tick, DistributionRecord>>,
    allowances: RefCell<BTreeMap<(Principal, Principal), Amount>>,
    token_uri: RefCell<Option<Option<String>>>,
}

impl<'a, S: ?Sized> WriteBatch<'a, S> {
    /// Begin a new, empty batch over `base`.
    pub fn new(base: &'a S) -> Self {
        Self {
            base,
            pool: RefCell::new(None),
            accounts: RefCell::new(BTreeMap::new()),
            history: RefCell::new(BTreeMap::new()),
            allowances: RefCell::new(BTreeMap::new()),
            token_uri: RefCell::new(None),
        }
    }

    /// Number of staged writes.
    pub fn len(&self) -> usize {
        usize::from(self.pool.borrow().is_some())
            + self.accounts.borrow().len()
            + self.history.borrow().len()
            + self.allowances.borrow().len()
            + usize::from(self.token_uri.borrow().is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<S: StakeStore + ?Sized> WriteBatch<'_, S> {
    /// Apply every staged write to the backing store.
    ///
    /// Returns the number of writes applied.
    pub fn commit(self) -> Result<usize, StoreError> {
        let applied = self.len();
        if let Some(state) = self.pool.into_inner() {
            self.base.put_pool_state(&state)?;
        }
        for ((field, who), value) in self.accounts.into_inner() {
            self.base.put_account_value(field, &who, value)?;
        }
        for record in self.history.into_inner().into_values() {
            self.base.put_distribution(&record)?;
        }
        for ((owner, spender), amount) in self.allowances.into_inner() {
            self.base.put_allowance(&owner, &spender, amount)?;
        }
        if let Some(uri) = self.token_uri.into_inner() {
            self.base.put_token_uri(uri.as_deref())?;
        }
        Ok(applied)
    }
}

impl<S: PoolStateStore + ?Sized> PoolStateStore for WriteBatch<'_, S> {
    fn get_pool_state(&self) -> Result<PoolState, StoreError> {
        match self.pool.borrow().as_ref() {
            Some(state) => Ok(state.clone()),
            None => self.base.get_pool_state(),
        }
    }

    fn put_pool_state(&self, state: &PoolState) -> Result<(), StoreError> {
        *self.pool.borrow_mut() = Some(state.clone());
        Ok(())
    }
}

impl<S: AccountStore + ?Sized> AccountStore for WriteBatch<'_, S> {
    fn get_account_value(&self, field: AccountField, who: &Principal) -> Result<Amount, StoreError> {
        if let Some(value) = self.accounts.borrow().get(&(field, who.clone())) {
            return Ok(*value);
        }
        self.base.get_account_value(field, who)
    }

    fn put_account_value(
        &self,
        field: AccountField,
        who: &Principal,
        value: Amount,
    ) -> Result<(), StoreError> {
        self.accounts.borrow_mut().insert((field, who.clone()), value);
        Ok(())
    }

    fn iter_account_values(&self, field: AccountField) -> Result<Vec<(Principal, Amount)>, StoreError> {
        let mut merged: BTreeMap<Principal, Amount> =
            self.base.iter_account_values(field)?.into_iter().collect();
        for ((f, who), value) in self.accounts.borrow().iter() {
            if *f == field {
                merged.insert(who.clone(), *value);
            }
        }
        Ok(merged.into_iter().collect())
    }
}

impl<S: HistoryStore + ?Sized> HistoryStore for WriteBatch<'_, S> {
    fn get_distribution(&self, tick: Tick) -> Result<Option<DistributionRecord>, StoreError> {
        if let Some(record) = self.history.borrow().get(&tick) {
            return Ok(Some(record.clone()));
        }
        self.base.get_distribution(tick)
    }

    fn put_distribution(&self, record: &DistributionRecord) -> Result<(), StoreError> {
        self.history.borrow_mut().insert(record.tick, record.clone());
        Ok(())
    }

    fn iter_distributions(&self) -> Result<Vec<DistributionRecord>, StoreError> {
        let mut merged: BTreeMap<Tick, DistributionRecord> = self
            .base
            .iter_distributions()?
            .into_iter()
            .map(|r| (r.tick, r))
            .collect();
        for (tick, record) in self.history.borrow().iter() {
            merged.insert(*tick, record.clone());
        }
        Ok(merged.into_values().collect())
    }
}

impl<S: AllowanceStore + ?Sized> AllowanceStore for WriteBatch<'_, S> {
    fn get_allowance(&self, owner: &Principal, spender: &Principal) -> Result<Amount, StoreError> {
        if let Some(amount) = self.allowances.borrow().get(&(owner.clone(), spender.clone())) {
            return Ok(*amount);
        }
        self.base.get_allowance(owner, spender)
    }

    fn put_allowance(
        &self,
        owner: &Principal,
        spender: &Principal,
        amount: Amount,
    ) -> Result<(), StoreError> {
        self.allowances
            .borrow_mut()
            .insert((owner.clone(), spender.clone()), amount);
        Ok(())
    }
}

impl<S: MetaStore + ?Sized> MetaStore for WriteBatch<'_, S> {
    fn get_token_uri(&self) -> Result<Option<String>, StoreError> {
        match self.token_uri.borrow().as_ref() {
            Some(staged) => Ok(staged.clone()),
            None => self.base.get_token_uri(),
        }
    }

    fn put_token_uri(&self, uri: Option<&str>) -> Result<(), StoreError> {
        *self.token_uri.borrow_mut() = Some(uri.map(str::to_owned));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Minimal map-backed store; the real in-memory backend lives in
    /// `btcstake-nullables`, which depends on this crate.
    #[derive(Default)]
    struct MapStore {
        pool: RefCell<PoolState>,
        accounts: RefCell<BTreeMap<(AccountField, Principal), Amount>>,
        history: RefCell<BTreeMap<Tick, DistributionRecord>>,
        allowances: RefCell<BTreeMap<(Principal, Principal), Amount>>,
        uri: RefCell<Option<String>>,
    }

    impl PoolStateStore for MapStore {
        fn get_pool_state(&self) -> Result<PoolState, StoreError> {
            Ok(self.pool.borrow().clone())
        }
        fn put_pool_state(&self, state: &PoolState) -> Result<(), StoreError> {
            *self.pool.borrow_mut() = state.clone();
            Ok(())
        }
    }

    impl AccountStore for MapStore {
        fn get_account_value(&self, field: AccountField, who: &Principal) -> Result<Amount, StoreError> {
            Ok(self.accounts.borrow().get(&(field, who.clone())).copied().unwrap_or(0))
        }
        fn put_account_value(&self, field: AccountField, who: &Principal, value: Amount) -> Result<(), StoreError> {
            self.accounts.borrow_mut().insert((field, who.clone()), value);
            Ok(())
        }
        fn iter_account_values(&self, field: AccountField) -> Result<Vec<(Principal, Amount)>, StoreError> {
            Ok(self
                .accounts
                .borrow()
                .iter()
                .filter(|((f, _), _)| *f == field)
                .map(|((_, who), v)| (who.clone(), *v))
                .collect())
        }
    }

    impl HistoryStore for MapStore {
        fn get_distribution(&self, tick: Tick) -> Result<Option<DistributionRecord>, StoreError> {
            Ok(self.history.borrow().get(&tick).cloned())
        }
        fn put_distribution(&self, record: &DistributionRecord) -> Result<(), StoreError> {
            self.history.borrow_mut().insert(record.tick, record.clone());
            Ok(())
        }
        fn iter_distributions(&self) -> Result<Vec<DistributionRecord>, StoreError> {
            Ok(self.history.borrow().values().cloned().collect())
        }
    }

    impl AllowanceStore for MapStore {
        fn get_allowance(&self, owner: &Principal, spender: &Principal) -> Result<Amount, StoreError> {
            Ok(self
                .allowances
                .borrow()
                .get(&(owner.clone(), spender.clone()))
                .copied()
                .unwrap_or(0))
        }
        fn put_allowance(&self, owner: &Principal, spender: &Principal, amount: Amount) -> Result<(), StoreError> {
            self.allowances.borrow_mut().insert((owner.clone(), spender.clone()), amount);
            Ok(())
        }
    }

    impl MetaStore for MapStore {
        fn get_token_uri(&self) -> Result<Option<String>, StoreError> {
            Ok(self.uri.borrow().clone())
        }
        fn put_token_uri(&self, uri: Option<&str>) -> Result<(), StoreError> {
            *self.uri.borrow_mut() = uri.map(str::to_owned);
            Ok(())
        }
    }

    fn alice() -> Principal {
        Principal::new("alice")
    }

    #[test]
    fn reads_see_staged_writes_before_commit() {
        let store = MapStore::default();
        store.put_balance(&alice(), 10).unwrap();

        let batch = WriteBatch::new(&store);
        assert_eq!(batch.get_balance(&alice()).unwrap(), 10);
        batch.put_balance(&alice(), 25).unwrap();
        assert_eq!(batch.get_balance(&alice()).unwrap(), 25);
        assert_eq!(store.get_balance(&alice()).unwrap(), 10, "base untouched until commit");
    }

    #[test]
    fn dropping_batch_discards_writes() {
        let store = MapStore::default();
        {
            let batch = WriteBatch::new(&store);
            batch.put_balance(&alice(), 99).unwrap();
            batch
                .put_pool_state(&PoolState {
                    active: true,
                    ..Default::default()
                })
                .unwrap();
            batch.put_token_uri(Some("ipfs://x")).unwrap();
        }
        assert_eq!(store.get_balance(&alice()).unwrap(), 0);
        assert!(!store.get_pool_state().unwrap().active);
        assert_eq!(store.get_token_uri().unwrap(), None);
    }

    #[test]
    fn commit_applies_everything() {
        let store = MapStore::default();
        let batch = WriteBatch::new(&store);
        batch.put_balance(&alice(), 7).unwrap();
        batch.put_risk_score(&alice(), 3).unwrap();
        batch
            .put_distribution(&DistributionRecord {
                tick: Tick::new(144),
                amount: 5,
                apy: 500,
            })
            .unwrap();
        batch.put_token_uri(Some("ipfs://meta")).unwrap();
        assert_eq!(batch.len(), 4);

        assert_eq!(batch.commit().unwrap(), 4);
        assert_eq!(store.get_balance(&alice()).unwrap(), 7);
        assert_eq!(store.get_risk_score(&alice()).unwrap(), 3);
        assert_eq!(store.get_distribution(Tick::new(144)).unwrap().unwrap().amount, 5);
        assert_eq!(store.get_token_uri().unwrap().as_deref(), Some("ipfs://meta"));
    }

    #[test]
    fn staged_uri_clear_shadows_base_value() {
        let store = MapStore::default();
        store.put_token_uri(Some("ipfs://old")).unwrap();
        let batch = WriteBatch::new(&store);
        batch.put_token_uri(None).unwrap();
        assert_eq!(batch.get_token_uri().unwrap(), None);
        batch.commit().unwrap();
        assert_eq!(store.get_token_uri().unwrap(), None);
    }

    #[test]
    fn iter_merges_overlay_with_base() {
        let store = MapStore::default();
        let bob = Principal::new("bob");
        store.put_balance(&alice(), 1).unwrap();
        store.put_balance(&bob, 2).unwrap();

        let batch = WriteBatch::new(&store);
        batch.put_balance(&bob, 20).unwrap();
        batch.put_balance(&Principal::new("carol"), 30).unwrap();
        batch.put_risk_score(&alice(), 100).unwrap();

        let balances = batch.iter_account_values(AccountField::Balance).unwrap();
        assert_eq!(
            balances,
            vec![
                (alice(), 1),
                (bob, 20),
                (Principal::new("carol"), 30),
            ]
        );
    }

    #[test]
    fn staged_distribution_overwrites_same_tick() {
        let store = MapStore::default();
        store
            .put_distribution(&DistributionRecord { tick: Tick::new(5), amount: 1, apy: 100 })
            .unwrap();
        let batch = WriteBatch::new(&store);
        batch
            .put_distribution(&DistributionRecord { tick: Tick::new(5), amount: 2, apy: 100 })
            .unwrap();
        let all = batch.iter_distributions().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].amount, 2);
    }
}
