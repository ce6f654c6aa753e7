//! Application State
//!
//! Shared state across all handlers.

use std::sync::Arc;

use expense_parser_agent::ExpenseParserService;
use expense_parser_config::Settings;

/// Application state
#[derive(Clone, Debug)]
pub struct AppState {
    pub config: Arc<Settings>,
    pub parser: ExpenseParserService,
}

impl AppState {
    pub fn new(config: Settings, parser: ExpenseParserService) -> Self {
        Self {
            config: Arc::new(config),
            parser,
        }
    }

    /// Deterministic-only state, used when no collaborator is configured
    pub fn deterministic(config: Settings) -> Self {
        Self::new(config, ExpenseParserService::deterministic())
    }
}
