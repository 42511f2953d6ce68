use crate::error::RiskError;
use btcstake_store::AccountStore;
use btcstake_types::{Amount, Principal};

/// Score points earned by staking `amount`: `floor(amount / score_unit)`.
pub fn score_increment(amount: Amount, score_unit: Amount) -> Result<Amount, RiskError> {
    if score_unit == 0 {
        return Err(RiskError::ZeroScoreUnit);
    }
    Ok(amount / score_unit)
}

pub struct RiskTracker<'a, S: ?Sized> {
    store: &'a S,
    score_unit: Amount,
}

impl<'a, S: AccountStore + ?Sized> RiskTracker<'a, S> {
    pub fn new(store: &'a S, score_unit: Amount) -> Self {
        Self { store, score_unit }
    }

    pub fn get_score(&self, who: &Principal) -> Result<Amount, RiskError> {
        Ok(self.store.get_risk_score(who)?)
    }

    pub fn get_coverage(&self, who: &Principal) -> Result<Amount, RiskError> {
        Ok(self.store.get_insurance_coverage(who)?)
    }

    /// Grow `who`'s score for a stake of `amount`. Returns the new score.
    ///
    /// There is no counterpart for unstaking: the score never decays.
    pub fn record_stake(&self, who: &Principal, amount: Amount) -> Result<Amount, RiskError> {
        let increment = score_increment(amount, self.score_unit)?;
        let current = self.store.get_risk_score(who)?;
        let updated = current.checked_add(increment).ok_or(RiskError::Overflow)?;
        if increment != 0 {
            self.store.put_risk_score(who, updated)?;
        }
        Ok(updated)
    }

    /// Overwrite `who`'s coverage with `value` when insurance is on.
    ///
    /// Returns the coverage written, or `None` when the switch is off and
    /// nothing was touched.
    pub fn apply_coverage(
        &self,
        who: &Principal,
        value: Amount,
        insurance_active: bool,
    ) -> Result<Option<Amount>, RiskError> {
        if !insurance_active {
            return Ok(None);
        }
        self.store.put_insurance_coverage(who, value)?;
        Ok(Some(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use btcstake_nullables::NullStore;

    fn alice() -> Principal {
        Principal::new("alice")
    }

    #[test]
    fn increment_floors() {
        assert_eq!(score_increment(2_999_999, 1_000_000).unwrap(), 2);
        assert_eq!(score_increment(999_999, 1_000_000).unwrap(), 0);
        assert!(matches!(score_increment(1, 0), Err(RiskError::ZeroScoreUnit)));
    }

    #[test]
    fn score_accumulates_across_stakes() {
        let store = NullStore::new();
        let risk = RiskTracker::new(&store, 1_000_000);
        assert_eq!(risk.record_stake(&alice(), 100_000_000).unwrap(), 100);
        assert_eq!(risk.record_stake(&alice(), 2_500_000).unwrap(), 102);
        assert_eq!(risk.get_score(&alice()).unwrap(), 102);
    }

    #[test]
    fn sub_unit_stake_writes_nothing() {
        let store = NullStore::new();
        let risk = RiskTracker::new(&store, 1_000_000);
        assert_eq!(risk.record_stake(&alice(), 500).unwrap(), 0);
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn coverage_is_overwritten_not_summed() {
        let store = NullStore::new();
        let risk = RiskTracker::new(&store, 1_000_000);
        assert_eq!(risk.apply_coverage(&alice(), 500, true).unwrap(), Some(500));
        assert_eq!(risk.apply_coverage(&alice(), 200, true).unwrap(), Some(200));
        assert_eq!(risk.get_coverage(&alice()).unwrap(), 200);
    }

    #[test]
    fn coverage_untouched_when_insurance_off() {
        let store = NullStore::new();
        let risk = RiskTracker::new(&store, 1_000_000);
        risk.apply_coverage(&alice(), 500, true).unwrap();
        assert_eq!(risk.apply_coverage(&alice(), 9, false).unwrap(), None);
        assert_eq!(risk.get_coverage(&alice()).unwrap(), 500);
    }
}
