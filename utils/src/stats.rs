//! Per-operation call counters.

use std::collections::BTreeMap;

use serde::Serialize;

/// Outcome counts for one operation name.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct OutcomeCount {
    pub committed: u64,
    pub rejected: u64,
}

/// Committed/rejected tallies keyed by operation name.
///
/// Rejections are further broken down by error code.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CallStats {
    ops: BTreeMap<String, OutcomeCount>,
    rejections_by_code: BTreeMap<u32, u64>,
}

impl CallStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_committed(&mut self, op: &str) {
        self.ops.entry(op.to_string()).or_default().committed += 1;
    }

    pub fn record_rejected(&mut self, op: &str, code: u32) {
        self.ops.entry(op.to_string()).or_default().rejected += 1;
        *self.rejections_by_code.entry(code).or_default() += 1;
    }

    pub fn get(&self, op: &str) -> OutcomeCount {
        self.ops.get(op).copied().unwrap_or_default()
    }

    pub fn total_committed(&self) -> u64 {
        self.ops.values().map(|c| c.committed).sum()
    }

    pub fn total_rejected(&self) -> u64 {
        self.ops.values().map(|c| c.rejected).sum()
    }

    pub fn rejections_with_code(&self, code: u32) -> u64 {
        self.rejections_by_code.get(&code).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tallies_by_op_and_code() {
        let mut stats = CallStats::new();
        stats.record_committed("stake");
        stats.record_committed("stake");
        stats.record_rejected("stake", 108);
        stats.record_rejected("claim_rewards", 107);

        assert_eq!(stats.get("stake"), OutcomeCount { committed: 2, rejected: 1 });
        assert_eq!(stats.get("unstake"), OutcomeCount::default());
        assert_eq!(stats.total_committed(), 2);
        assert_eq!(stats.total_rejected(), 2);
        assert_eq!(stats.rejections_with_code(107), 1);
        assert_eq!(stats.rejections_with_code(100), 0);
    }

    #[test]
    fn serializes_as_nested_maps() {
        let mut stats = CallStats::new();
        stats.record_rejected("transfer", 109);
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["ops"]["transfer"]["rejected"], 1);
        assert_eq!(json["rejections_by_code"]["109"], 1);
    }
}
