//! Per-account storage trait.
//!
//! A staker account is four independent account-keyed maps. They share one
//! trait, addressed by [`AccountField`], so that backends and the write
//! batch only implement a single get/put pair.

use crate::StoreError;
use btcstake_types::{Amount, Principal};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which account-keyed map a value lives in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AccountField {
    Balance,
    PendingRewards,
    RiskScore,
    InsuranceCoverage,
}

impl AccountField {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountField::Balance => "balance",
            AccountField::PendingRewards => "pending_rewards",
            AccountField::RiskScore => "risk_score",
            AccountField::InsuranceCoverage => "insurance_coverage",
        }
    }
}

impl fmt::Display for AccountField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trait for account-keyed storage operations.
pub trait AccountStore {
    /// Read one account value; a missing entry reads as zero.
    fn get_account_value(&self, field: AccountField, who: &Principal) -> Result<Amount, StoreError>;

    fn put_account_value(
        &self,
        field: AccountField,
        who: &Principal,
        value: Amount,
    ) -> Result<(), StoreError>;

    /// Every stored entry of one map, in principal order.
    fn iter_account_values(&self, field: AccountField) -> Result<Vec<(Principal, Amount)>, StoreError>;

    fn get_balance(&self, who: &Principal) -> Result<Amount, StoreError> {
        self.get_account_value(AccountField::Balance, who)
    }

    fn put_balance(&self, who: &Principal, value: Amount) -> Result<(), StoreError> {
        self.put_account_value(AccountField::Balance, who, value)
    }

    fn get_pending_rewards(&self, who: &Principal) -> Result<Amount, StoreError> {
        self.get_account_value(AccountField::PendingRewards, who)
    }

    fn put_pending_rewards(&self, who: &Principal, value: Amount) -> Result<(), StoreError> {
        self.put_account_value(AccountField::PendingRewards, who, value)
    }

    fn get_risk_score(&self, who: &Principal) -> Result<Amount, StoreError> {
        self.get_account_value(AccountField::RiskScore, who)
    }

    fn put_risk_score(&self, who: &Principal, value: Amount) -> Result<(), StoreError> {
        self.put_account_value(AccountField::RiskScore, who, value)
    }

    fn get_insurance_coverage(&self, who: &Principal) -> Result<Amount, StoreError> {
        self.get_account_value(AccountField::InsuranceCoverage, who)
    }

    fn put_insurance_coverage(&self, who: &Principal, value: Amount) -> Result<(), StoreError> {
        self.put_account_value(AccountField::InsuranceCoverage, who, value)
    }
}
