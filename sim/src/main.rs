//! btcstake-sim: run a scenario of pool calls against the in-memory store.
//!
//! Prints one JSON line per call (the event, or the error code) followed by
//! a JSON summary of the final pool state. Exits non-zero if the scenario
//! cannot be loaded or the conservation invariant breaks.

mod runner;
mod scenario;

use std::path::PathBuf;

use anyhow::Context;
use btcstake_pool::PoolConfig;
use btcstake_utils::LogFormat;
use clap::Parser;

use crate::runner::Runner;
use crate::scenario::Scenario;

#[derive(Parser)]
#[command(name = "btcstake-sim", about = "Run btcstake pool scenarios against an in-memory store")]
struct Cli {
    /// Scenario file: a TOML list of `[[calls]]`.
    scenario: PathBuf,

    /// Path to a TOML pool configuration. Defaults apply when omitted.
    #[arg(long, env = "BTCSTAKE_CONFIG")]
    config: Option<PathBuf>,

    /// Log format: "human" or "json". Overrides the config file.
    #[arg(long, env = "BTCSTAKE_LOG_FORMAT")]
    log_format: Option<String>,

    /// Log level: "trace", "debug", "info", "warn", "error". Overrides the config file.
    #[arg(long, env = "BTCSTAKE_LOG_LEVEL")]
    log_level: Option<String>,

    /// Stop at the first rejected call.
    #[arg(long)]
    fail_fast: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => PoolConfig::from_toml_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => PoolConfig::default(),
    };

    let format: LogFormat = cli
        .log_format
        .as_deref()
        .unwrap_or(&config.log_format)
        .parse()?;
    let level = cli.log_level.as_deref().unwrap_or(&config.log_level);
    btcstake_utils::init_tracing_with(format, level)?;

    let scenario = Scenario::from_toml_file(&cli.scenario)?;
    tracing::info!(
        scenario = %cli.scenario.display(),
        calls = scenario.calls.len(),
        owner = %config.owner,
        "running scenario"
    );

    let mut runner = Runner::new(&config, cli.fail_fast)?;
    let summary = runner.run(&scenario, |line| println!("{line}"))?;
    println!("{}", serde_json::to_string_pretty(&summary)?);

    tracing::info!(
        committed = summary.calls.total_committed(),
        rejected = summary.calls.total_rejected(),
        "scenario finished"
    );
    Ok(())
}
