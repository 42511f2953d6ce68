//! Scenario files: an ordered list of calls, each with a caller and a tick.
//!
//! ```toml
//! [[calls]]
//! caller = "pool-owner"
//! tick = 0
//! op = { kind = "initialize", rate = 500 }
//! ```

use std::path::Path;

use anyhow::Context;
use btcstake_types::amount::serde_int;
use btcstake_types::{Amount, Principal};
use serde::Deserialize;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub calls: Vec<Call>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Call {
    pub caller: Principal,
    pub tick: u64,
    pub op: Op,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Op {
    Initialize {
        #[serde(with = "serde_int")]
        rate: Amount,
    },
    Stake {
        #[serde(with = "serde_int")]
        amount: Amount,
    },
    Unstake {
        #[serde(with = "serde_int")]
        amount: Amount,
    },
    DistributeYield,
    ClaimRewards,
    Transfer {
        #[serde(with = "serde_int")]
        amount: Amount,
        sender: Principal,
        recipient: Principal,
        /// Hex-encoded memo bytes.
        #[serde(default)]
        memo: Option<String>,
    },
    SetTokenUri {
        #[serde(default)]
        uri: Option<String>,
    },
    SetInsuranceActive {
        enabled: bool,
    },
}

impl Op {
    pub fn name(&self) -> &'static str {
        match self {
            Op::Initialize { .. } => "initialize",
            Op::Stake { .. } => "stake",
            Op::Unstake { .. } => "unstake",
            Op::DistributeYield => "distribute_yield",
            Op::ClaimRewards => "claim_rewards",
            Op::Transfer { .. } => "transfer",
            Op::SetTokenUri { .. } => "set_token_uri",
            Op::SetInsuranceActive { .. } => "set_insurance_active",
        }
    }
}

impl Scenario {
    pub fn from_toml_str(s: &str) -> anyhow::Result<Self> {
        let scenario: Self = toml::from_str(s).context("failed to parse scenario")?;
        scenario.check_ticks()?;
        Ok(scenario)
    }

    pub fn from_toml_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario {}", path.display()))?;
        Self::from_toml_str(&content)
    }

    /// The host never hands out a tick older than the previous one.
    fn check_ticks(&self) -> anyhow::Result<()> {
        for (i, pair) in self.calls.windows(2).enumerate() {
            if pair[1].tick < pair[0].tick {
                anyhow::bail!(
                    "call {} goes back in time: tick {} after tick {}",
                    i + 1,
                    pair[1].tick,
                    pair[0].tick
                );
            }
        }
        Ok(())
    }
}
