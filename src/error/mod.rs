//! Error handling module for Sceneline

use thiserror::Error;

use crate::domain::errors::DomainError;

/// Main error type for Sceneline operations outside the domain ports
#[derive(Error, Debug)]
pub enum SceneError {
    /// Domain failure surfaced through a port or interactor
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Invalid or unreadable configuration
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parse error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML serialisation error
    #[error("TOML write error: {0}")]
    TomlWrite(#[from] toml::ser::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for Sceneline operations
pub type SceneResult<T> = std::result::Result<T, SceneError>;
