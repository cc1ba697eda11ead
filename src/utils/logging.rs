//! Logging setup

use tracing_subscriber::EnvFilter;

use crate::error::{SceneError, SceneResult};

/// Accepted values for the configured log level
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a configured log level
pub fn validate_level(level: &str) -> SceneResult<()> {
    if LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
        Ok(())
    } else {
        Err(SceneError::Config {
            message: format!(
                "Invalid log level: {}. Valid levels: {}",
                level,
                LOG_LEVELS.join(", ")
            ),
        })
    }
}

/// Install the global subscriber.
///
/// `RUST_LOG` wins over the configured level when set.
pub fn init_logging(level: &str, json: bool) -> SceneResult<()> {
    validate_level(level)?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_lowercase()));

    let installed = if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
    };

    installed.map_err(|e| SceneError::Config {
        message: format!("Failed to initialise logging: {}", e),
    })
}
