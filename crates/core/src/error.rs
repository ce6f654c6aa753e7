//! Error types shared across the expense parser crates

use thiserror::Error;

/// Core error type
///
/// Only `Validation` is ever surfaced to a caller of the HTTP boundary;
/// everything else is recovered inside the parser and logged.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Completion error: {0}")]
    Completion(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Whether this error should be reported back to the caller as a bad request
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
