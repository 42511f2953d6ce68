//! Shared utilities for btcstake.

pub mod logging;
pub mod stats;

pub use logging::{init_tracing_with, LogFormat, LoggingError};
pub use stats::CallStats;
