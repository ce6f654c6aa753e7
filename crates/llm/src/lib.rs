//! Completion collaborators for expense parsing
//!
//! Features:
//! - OpenAI-compatible chat completions client (ModelScope, OpenAI, local servers)
//! - Deterministic stub client for tests and offline runs
//! - Prompt construction for expense extraction
//! - Tolerant JSON extraction from model output
//! - Factory wiring a client from `CompletionConfig`

pub mod backend;
pub mod factory;
pub mod json;
pub mod prompt;
pub mod stub;

pub use backend::{OpenAICompatibleClient, OpenAIConfig};
pub use factory::{CompletionFactory, CompletionProvider};
pub use json::{extract_json_block, payload_from_content};
pub use prompt::{build_expense_parse_prompt, SYSTEM_PROMPT};
pub use stub::StaticCompletionClient;

use thiserror::Error;

/// Completion errors
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("API error: {0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::Network(err.to_string())
        }
    }
}

impl From<LlmError> for expense_parser_core::Error {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Configuration(message) => expense_parser_core::Error::Config(message),
            other => expense_parser_core::Error::Completion(other.to_string()),
        }
    }
}
