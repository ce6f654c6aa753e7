//! Configuration management for the expense parser
//!
//! Supports loading configuration from:
//! - YAML/TOML files (`config/default.*`, `config/{env}.*`)
//! - Environment variables (`EXPENSE_PARSER__` prefix, `__` separator)
//! - The completion service's own variables (`MODELSCOPE_API_KEY`,
//!   `OPENAI_API_KEY`, `MODELSCOPE_BASE_URL`, `MODELSCOPE_MODEL_ID`) as defaults

pub mod constants;
pub mod settings;

pub use settings::{
    load_settings, load_settings_from, CompletionConfig, ObservabilityConfig, RuntimeEnvironment,
    ServerConfig, Settings,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Environment error: {0}")]
    Environment(String),
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
