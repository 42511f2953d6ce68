//! Tick-keyed distribution history.

use crate::error::YieldError;
use btcstake_store::{DistributionRecord, HistoryStore};
use btcstake_types::Tick;

/// Append-mostly view over a [`HistoryStore`].
pub struct DistributionLedger<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S: HistoryStore + ?Sized> DistributionLedger<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Write `record` under its tick. A record already at that tick is
    /// replaced and returned.
    pub fn record(
        &self,
        record: &DistributionRecord,
    ) -> Result<Option<DistributionRecord>, YieldError> {
        let previous = self.store.get_distribution(record.tick)?;
        self.store.put_distribution(record)?;
        Ok(previous)
    }

    pub fn get(&self, tick: Tick) -> Result<Option<DistributionRecord>, YieldError> {
        Ok(self.store.get_distribution(tick)?)
    }

    /// Every record, ascending by tick.
    pub fn list(&self) -> Result<Vec<DistributionRecord>, YieldError> {
        Ok(self.store.iter_distributions()?)
    }
}
