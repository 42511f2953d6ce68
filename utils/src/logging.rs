//! Structured logging initialization via `tracing`.

use std::str::FromStr;

use thiserror::Error;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("unknown log format {0:?} (expected \"human\" or \"json\")")]
    UnknownFormat(String),

    #[error("invalid log filter: {0}")]
    InvalidFilter(String),

    #[error("a global subscriber is already installed")]
    AlreadyInitialized,
}

/// Output shape of log lines.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Human,
    Json,
}

impl FromStr for LogFormat {
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "human" | "text" | "pretty" => Ok(LogFormat::Human),
            "json" => Ok(LogFormat::Json),
            other => Err(LoggingError::UnknownFormat(other.to_string())),
        }
    }
}

/// Initialize the tracing subscriber with an explicit format and level.
///
/// `RUST_LOG`, when set, takes precedence over `level`. Log lines go to
/// stderr so stdout stays free for program output.
pub fn init_tracing_with(format: LogFormat, level: &str) -> Result<(), LoggingError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level).map_err(|e| LoggingError::InvalidFilter(e.to_string()))?,
    };

    let installed = match format {
        LogFormat::Human => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_target(true).with_writer(std::io::stderr))
            .try_init(),
    };
    installed.map_err(|_| LoggingError::AlreadyInitialized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_formats() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("Human".parse::<LogFormat>().unwrap(), LogFormat::Human);
        assert!(matches!(
            "xml".parse::<LogFormat>(),
            Err(LoggingError::UnknownFormat(_))
        ));
    }
}
