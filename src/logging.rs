//! Logging initialization for auth-gate
//!
//! Builds the `tracing-subscriber` stack from the logging section of the
//! configuration. JSON output is the default so log lines stay
//! machine-parseable in production.

use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;

/// Logging initialization errors
#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum LoggingError {
    /// Failed to install the global subscriber
    #[error("Failed to initialize tracing: {0}")]
    Init(String),
}

/// Initialize the global tracing subscriber
///
/// Must be called once at startup, before any log output.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), LoggingError> {
    let filter = tracing_subscriber::filter::LevelFilter::from_level(parse_level(&config.level));

    if config.format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
            .map_err(|e| LoggingError::Init(e.to_string()))?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init()
            .map_err(|e| LoggingError::Init(e.to_string()))?;
    }

    Ok(())
}

/// Parse a log level string, falling back to INFO for unknown values
fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" | "warning" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}
