//! Error types for configuration stores.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration store errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file does not exist and the store is strict.
    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The document is not valid JSON or does not match the settings shape.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
