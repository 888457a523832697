//! Error types for gc-core

use thiserror::Error;

/// Main error type for gc-core
#[derive(Error, Debug)]
pub enum Error {
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Tool execution error: {0}")]
    ToolExecution(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for gc-core
pub type Result<T> = std::result::Result<T, Error>;
