//! Error types for gc-contacts
//!
//! These cover failures that prevent a request from completing at all.
//! Validation problems and HTTP error statuses are reported through
//! [`crate::OperationResult`] instead.

use thiserror::Error;

/// gc-contacts error type
#[derive(Error, Debug)]
pub enum ContactsError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("HTTP error: {0}")]
    HttpError(String),

    #[error("Query encoding error: {0}")]
    Encode(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, ContactsError>;
