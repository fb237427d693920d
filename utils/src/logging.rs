//! Structured logging initialization via `tracing`.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Output format of the log subscriber.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Human,
    Json,
}

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log filter {filter:?}: {reason}")]
    InvalidFilter { filter: String, reason: String },

    #[error("a global subscriber is already installed")]
    AlreadyInstalled,
}

/// Initialize the tracing subscriber from configuration.
///
/// `RUST_LOG`, when set, takes precedence over `level`.
pub fn init_tracing_with(level: &str, format: LogFormat) -> Result<(), LoggingError> {
    let filter = match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(from_env) if !from_env.is_empty() => parse_filter(&from_env)?,
        _ => parse_filter(level)?,
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let installed = match format {
        LogFormat::Human => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|_| LoggingError::AlreadyInstalled)
}

fn parse_filter(directives: &str) -> Result<EnvFilter, LoggingError> {
    EnvFilter::try_new(directives).map_err(|e| LoggingError::InvalidFilter {
        filter: directives.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_format_parses_snake_case() {
        let format: LogFormat = serde_json::from_str("\"json\"").unwrap();
        assert_eq!(format, LogFormat::Json);
        assert_eq!(LogFormat::default(), LogFormat::Human);
    }

    #[test]
    fn filter_directives_are_validated() {
        assert!(parse_filter("info").is_ok());
        assert!(parse_filter("relief_portal=debug,warn").is_ok());
        assert!(matches!(
            parse_filter("relief_portal=notalevel"),
            Err(LoggingError::InvalidFilter { .. })
        ));
    }
}
