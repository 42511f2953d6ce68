//! Distribution history storage trait.

use crate::state::DistributionRecord;
use crate::StoreError;
use btcstake_types::Tick;

pub trait HistoryStore {
    fn get_distribution(&self, tick: Tick) -> Result<Option<DistributionRecord>, StoreError>;

    /// Write a record keyed by `record.tick`, replacing any record already at that tick.
    fn put_distribution(&self, record: &DistributionRecord) -> Result<(), StoreError>;

    /// All records, ascending by tick.
    fn iter_distributions(&self) -> Result<Vec<DistributionRecord>, StoreError>;
}
