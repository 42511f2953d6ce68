//! Drives a [`Scenario`] through a pool over the in-memory store.

use anyhow::Context;
use btcstake_nullables::{NullClock, NullStore};
use btcstake_pool::{CallContext, PoolConfig, PoolController, PoolEvent, StakeError};
use btcstake_store::PoolState;
use btcstake_types::Amount;
use btcstake_utils::CallStats;
use serde::Serialize;
use serde_json::json;

use crate::scenario::{Call, Op, Scenario};

/// End-of-run figures.
#[derive(Debug, Serialize)]
pub struct Summary {
    pub pool: PoolState,
    pub total_supply: Amount,
    pub distributions: usize,
    pub calls: CallStats,
}

pub struct Runner {
    pool: PoolController<NullStore>,
    clock: NullClock,
    stats: CallStats,
    fail_fast: bool,
}

impl Runner {
    pub fn new(config: &PoolConfig, fail_fast: bool) -> anyhow::Result<Self> {
        let pool = PoolController::new(NullStore::new(), config)
            .context("failed to build pool from config")?;
        Ok(Self {
            pool,
            clock: NullClock::new(0),
            stats: CallStats::new(),
            fail_fast,
        })
    }

    #[cfg(test)]
    pub fn pool(&self) -> &PoolController<NullStore> {
        &self.pool
    }

    /// Run every call in order, handing one JSON report per call to `report`.
    ///
    /// Rejected calls are reported and counted, not fatal, unless running
    /// fail-fast. A broken conservation invariant always aborts the run.
    pub fn run(
        &mut self,
        scenario: &Scenario,
        mut report: impl FnMut(&serde_json::Value),
    ) -> anyhow::Result<Summary> {
        for (index, call) in scenario.calls.iter().enumerate() {
            self.clock.set(call.tick);
            let op = call.op.name();
            let line = match self.apply(call)? {
                Ok(event) => {
                    self.stats.record_committed(op);
                    let event = serde_json::to_value(&event)
                        .with_context(|| format!("failed to encode event of call {index}"))?;
                    json!({
                        "call": index,
                        "tick": call.tick,
                        "caller": call.caller,
                        "op": op,
                        "ok": true,
                        "event": event,
                    })
                }
                Err(err) => {
                    self.stats.record_rejected(op, err.code());
                    let line = json!({
                        "call": index,
                        "tick": call.tick,
                        "caller": call.caller,
                        "op": op,
                        "ok": false,
                        "code": err.code(),
                        "error": err.to_string(),
                    });
                    if self.fail_fast {
                        report(&line);
                        anyhow::bail!("call {index} ({op}) rejected with code {}: {err}", err.code());
                    }
                    line
                }
            };
            report(&line);

            if !self.pool.conservation_holds()? {
                anyhow::bail!("total_staked no longer matches balances after call {index} ({op})");
            }
        }
        self.summary()
    }

    pub fn summary(&self) -> anyhow::Result<Summary> {
        Ok(Summary {
            pool: self.pool.pool_stats()?,
            total_supply: self.pool.total_supply()?,
            distributions: self.pool.distribution_history()?.len(),
            calls: self.stats.clone(),
        })
    }

    fn apply(&self, call: &Call) -> anyhow::Result<Result<PoolEvent, StakeError>> {
        let ctx = CallContext::new(call.caller.clone(), self.clock.now());
        let result = match &call.op {
            Op::Initialize { rate } => self.pool.initialize(&ctx, *rate),
            Op::Stake { amount } => self.pool.stake(&ctx, *amount),
            Op::Unstake { amount } => self.pool.unstake(&ctx, *amount),
            Op::DistributeYield => self.pool.distribute_yield(&ctx),
            Op::ClaimRewards => self.pool.claim_rewards(&ctx),
            Op::Transfer {
                amount,
                sender,
                recipient,
                memo,
            } => {
                let memo = memo
                    .as_deref()
                    .map(hex::decode)
                    .transpose()
                    .context("transfer memo is not valid hex")?;
                self.pool.transfer(&ctx, *amount, sender, recipient, memo)
            }
            Op::SetTokenUri { uri } => self.pool.set_token_uri(&ctx, uri.clone()),
            Op::SetInsuranceActive { enabled } => self.pool.set_insurance_active(&ctx, *enabled),
        };
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE_PERIOD: &str = include_str!("../scenarios/one_period.toml");

    #[test]
    fn sample_scenario_runs_clean() {
        let scenario = Scenario::from_toml_str(ONE_PERIOD).unwrap();
        let mut runner = Runner::new(&PoolConfig::default(), false).unwrap();
        let mut lines = Vec::new();
        let summary = runner.run(&scenario, |line| lines.push(line.clone())).unwrap();

        assert_eq!(lines.len(), scenario.calls.len());
        assert!(summary.pool.active);
        assert_eq!(summary.distributions, 1);
        assert_eq!(summary.pool.total_yield, 5_000_000);
        assert_eq!(summary.calls.total_rejected(), 1);
        assert_eq!(summary.calls.rejections_with_code(107), 1);
    }

    #[test]
    fn rejected_calls_report_their_code() {
        let scenario = Scenario::from_toml_str(
            "[[calls]]\ncaller = \"alice\"\ntick = 0\nop = { kind = \"stake\", amount = 1 }\n",
        )
        .unwrap();
        let mut runner = Runner::new(&PoolConfig::default(), false).unwrap();
        let mut lines = Vec::new();
        runner.run(&scenario, |line| lines.push(line.clone())).unwrap();
        assert_eq!(lines[0]["ok"], false);
        assert_eq!(lines[0]["code"], 104);
    }

    #[test]
    fn fail_fast_stops_at_first_rejection() {
        let scenario = Scenario::from_toml_str(
            r#"
            [[calls]]
            caller = "alice"
            tick = 0
            op = { kind = "initialize", rate = 500 }

            [[calls]]
            caller = "pool-owner"
            tick = 0
            op = { kind = "initialize", rate = 500 }
            "#,
        )
        .unwrap();
        let mut runner = Runner::new(&PoolConfig::default(), true).unwrap();
        let mut lines = Vec::new();
        let err = runner.run(&scenario, |line| lines.push(line.clone())).unwrap_err();
        assert!(err.to_string().contains("code 100"));
        assert_eq!(lines.len(), 1);
        assert!(!runner.pool().pool_stats().unwrap().active);
    }

    #[test]
    fn amounts_beyond_u64_are_reported_as_strings() {
        let scenario = Scenario::from_toml_str(
            r#"
            [[calls]]
            caller = "pool-owner"
            tick = 0
            op = { kind = "initialize", rate = 500 }

            [[calls]]
            caller = "alice"
            tick = 0
            op = { kind = "stake", amount = "20000000000000000000" }
            "#,
        )
        .unwrap();
        let mut runner = Runner::new(&PoolConfig::default(), false).unwrap();
        let mut lines = Vec::new();
        let summary = runner.run(&scenario, |line| lines.push(line.clone())).unwrap();

        assert_eq!(lines[1]["ok"], true);
        assert_eq!(lines[1]["event"]["kind"], "stake");
        assert_eq!(lines[1]["event"]["amount"], "20000000000000000000");
        assert_eq!(summary.pool.total_staked, 20_000_000_000_000_000_000);
        let printed = serde_json::to_string(&summary).unwrap();
        assert!(printed.contains("20000000000000000000"));
    }

    #[test]
    fn bad_memo_is_a_scenario_error() {
        let scenario = Scenario::from_toml_str(
            r#"
            [[calls]]
            caller = "alice"
            tick = 0
            op = { kind = "transfer", amount = 1, sender = "alice", recipient = "bob", memo = "zz" }
            "#,
        )
        .unwrap();
        let mut runner = Runner::new(&PoolConfig::default(), false).unwrap();
        assert!(runner.run(&scenario, |_| {}).is_err());
    }
}
