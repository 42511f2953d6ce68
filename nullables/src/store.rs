//! Nullable store: thread-safe in-memory storage for testing.

use btcstake_store::{
    AccountField, AccountStore, AllowanceStore, DistributionRecord, HistoryStore, MetaStore,
    PoolState, PoolStateStore, StoreError,
};
use btcstake_types::{Amount, Principal, Tick};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

/// An in-memory implementation of every pool storage trait.
///
/// Counts writes so tests can assert that a rejected call touched nothing.
pub struct NullStore {
    pool: Mutex<PoolState>,
    accounts: Mutex<BTreeMap<(AccountField, Principal), Amount>>,
    history: Mutex<BTreeMap<Tick, DistributionRecord>>,
    allowances: Mutex<BTreeMap<(Principal, Principal), Amount>>,
    token_uri: Mutex<Option<String>>,
    writes: AtomicU64,
}

fn lock<'a, T>(m: &'a Mutex<T>, what: &str) -> Result<MutexGuard<'a, T>, StoreError> {
    m.lock().map_err(|_| StoreError::LockPoisoned(what.to_string()))
}

impl NullStore {
    pub fn new() -> Self {
        Self {
            pool: Mutex::new(PoolState::default()),
            accounts: Mutex::new(BTreeMap::new()),
            history: Mutex::new(BTreeMap::new()),
            allowances: Mutex::new(BTreeMap::new()),
            token_uri: Mutex::new(None),
            writes: AtomicU64::new(0),
        }
    }

    /// Total number of put operations applied so far.
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::Relaxed)
    }

    fn record_write(&self) {
        self.writes.fetch_add(1, Ordering::Relaxed);
    }
}

impl Default for NullStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PoolStateStore for NullStore {
    fn get_pool_state(&self) -> Result<PoolState, StoreError> {
        Ok(lock(&self.pool, "pool")?.clone())
    }

    fn put_pool_state(&self, state: &PoolState) -> Result<(), StoreError> {
        *lock(&self.pool, "pool")? = state.clone();
        self.record_write();
        Ok(())
    }
}

impl AccountStore for NullStore {
    fn get_account_value(&self, field: AccountField, who: &Principal) -> Result<Amount, StoreError> {
        Ok(lock(&self.accounts, "accounts")?
            .get(&(field, who.clone()))
            .copied()
            .unwrap_or(0))
    }

    fn put_account_value(
        &self,
        field: AccountField,
        who: &Principal,
        value: Amount,
    ) -> Result<(), StoreError> {
        lock(&self.accounts, "accounts")?.insert((field, who.clone()), value);
        self.record_write();
        Ok(())
    }

    fn iter_account_values(&self, field: AccountField) -> Result<Vec<(Principal, Amount)>, StoreError> {
        Ok(lock(&self.accounts, "accounts")?
            .iter()
            .filter(|((f, _), _)| *f == field)
            .map(|((_, who), value)| (who.clone(), *value))
            .collect())
    }
}

impl HistoryStore for NullStore {
    fn get_distribution(&self, tick: Tick) -> Result<Option<DistributionRecord>, StoreError> {
        Ok(lock(&self.history, "history")?.get(&tick).cloned())
    }

    fn put_distribution(&self, record: &DistributionRecord) -> Result<(), StoreError> {
        lock(&self.history, "history")?.insert(record.tick, record.clone());
        self.record_write();
        Ok(())
    }

    fn iter_distributions(&self) -> Result<Vec<DistributionRecord>, StoreError> {
        Ok(lock(&self.history, "history")?.values().cloned().collect())
    }
}

impl AllowanceStore for NullStore {
    fn get_allowance(&self, owner: &Principal, spender: &Principal) -> Result<Amount, StoreError> {
        Ok(lock(&self.allowances, "allowances")?
            .get(&(owner.clone(), spender.clone()))
            .copied()
            .unwrap_or(0))
    }

    fn put_allowance(
        &self,
        owner: &Principal,
        spender: &Principal,
        amount: Amount,
    ) -> Result<(), StoreError> {
        lock(&self.allowances, "allowances")?.insert((owner.clone(), spender.clone()), amount);
        self.record_write();
        Ok(())
    }
}

impl MetaStore for NullStore {
    fn get_token_uri(&self) -> Result<Option<String>, StoreError> {
        Ok(lock(&self.token_uri, "token_uri")?.clone())
    }

    fn put_token_uri(&self, uri: Option<&str>) -> Result<(), StoreError> {
        *lock(&self.token_uri, "token_uri")? = uri.map(str::to_owned);
        self.record_write();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use btcstake_store::WriteBatch;

    #[test]
    fn missing_entries_read_as_zero() {
        let store = NullStore::new();
        let who = Principal::new("nobody");
        assert_eq!(store.get_balance(&who).unwrap(), 0);
        assert_eq!(store.get_risk_score(&who).unwrap(), 0);
        assert_eq!(store.get_allowance(&who, &who).unwrap(), 0);
        assert!(store.get_distribution(Tick::new(1)).unwrap().is_none());
        assert_eq!(store.get_pool_state().unwrap(), PoolState::default());
    }

    #[test]
    fn write_count_tracks_puts() {
        let store = NullStore::new();
        assert_eq!(store.write_count(), 0);
        store.put_balance(&Principal::new("a"), 1).unwrap();
        store.put_token_uri(None).unwrap();
        assert_eq!(store.write_count(), 2);
    }

    #[test]
    fn batch_commit_lands_in_null_store() {
        let store = NullStore::new();
        let batch = WriteBatch::new(&store);
        batch.put_balance(&Principal::new("a"), 5).unwrap();
        assert_eq!(store.write_count(), 0);
        batch.commit().unwrap();
        assert_eq!(store.write_count(), 1);
        assert_eq!(store.get_balance(&Principal::new("a")).unwrap(), 5);
    }

    #[test]
    fn distributions_iterate_in_tick_order() {
        let store = NullStore::new();
        for t in [288u64, 144, 432] {
            store
                .put_distribution(&DistributionRecord {
                    tick: Tick::new(t),
                    amount: t as Amount,
                    apy: 500,
                })
                .unwrap();
        }
        let ticks: Vec<u64> = store
            .iter_distributions()
            .unwrap()
            .iter()
            .map(|r| r.tick.as_u64())
            .collect();
        assert_eq!(ticks, vec![144, 288, 432]);
    }
}
