//! Completion Factory
//!
//! Builds the completion collaborator from `CompletionConfig`.
//!
//! ## Supported Providers
//! - **ModelScope**: hosted inference, OpenAI-compatible (default)
//! - **OpenAI**: api.openai.com
//! - **Local**: vLLM / Ollama OpenAI-compatible servers, no key required
//!
//! A hosted provider without an API key yields no collaborator at all; the
//! parser then runs on deterministic extraction only.
//!
//! ## Example
//! ```ignore
//! let settings = load_settings(None)?;
//! let completion = CompletionFactory::create(&settings.completion)?;
//! let service = ExpenseParserService::new(completion);
//! ```

use std::sync::Arc;

use expense_parser_config::constants::endpoints;
use expense_parser_config::CompletionConfig;
use expense_parser_core::CompletionClient;

use crate::backend::{OpenAICompatibleClient, OpenAIConfig};
use crate::LlmError;

/// Completion provider type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompletionProvider {
    /// ModelScope inference API
    #[default]
    ModelScope,
    /// OpenAI API
    OpenAI,
    /// Local OpenAI-compatible server
    Local,
}

impl CompletionProvider {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "modelscope" | "model-scope" => Some(CompletionProvider::ModelScope),
            "openai" | "gpt" => Some(CompletionProvider::OpenAI),
            "local" | "ollama" | "vllm" => Some(CompletionProvider::Local),
            _ => None,
        }
    }

    pub fn default_endpoint(&self) -> &'static str {
        match self {
            CompletionProvider::ModelScope => endpoints::MODELSCOPE_DEFAULT,
            CompletionProvider::OpenAI => endpoints::OPENAI_DEFAULT,
            CompletionProvider::Local => endpoints::LOCAL_DEFAULT,
        }
    }

    pub fn requires_api_key(&self) -> bool {
        !matches!(self, CompletionProvider::Local)
    }

    /// Endpoint to use given the configured one
    ///
    /// The configured endpoint defaults to ModelScope; when another provider
    /// is selected and the endpoint was left untouched, that provider's own
    /// default is used instead.
    pub fn resolve_endpoint(&self, configured: &str) -> String {
        let configured = configured.trim();
        if configured.is_empty()
            || (configured == endpoints::MODELSCOPE_DEFAULT
                && *self != CompletionProvider::ModelScope)
        {
            self.default_endpoint().to_string()
        } else {
            configured.to_string()
        }
    }
}

/// Factory for creating completion clients
pub struct CompletionFactory;

impl CompletionFactory {
    /// Create the configured collaborator, or `None` when completion is
    /// disabled or a hosted provider has no API key
    pub fn create(
        config: &CompletionConfig,
    ) -> Result<Option<Arc<dyn CompletionClient>>, LlmError> {
        if !config.enabled {
            tracing::info!("Completion disabled, using deterministic extraction only");
            return Ok(None);
        }

        let provider = CompletionProvider::from_str(&config.provider).ok_or_else(|| {
            LlmError::Configuration(format!("Unknown completion provider: {}", config.provider))
        })?;

        let api_key = config.api_key().unwrap_or_default();
        if api_key.is_empty() && provider.requires_api_key() {
            tracing::info!(
                provider = ?provider,
                "No completion API key configured, using deterministic extraction only"
            );
            return Ok(None);
        }

        let client_config = OpenAIConfig {
            endpoint: provider.resolve_endpoint(&config.endpoint),
            api_key: api_key.to_string(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            timeout: config.timeout(),
        };

        let client = OpenAICompatibleClient::new(client_config)?;
        tracing::info!(
            provider = ?provider,
            endpoint = %client.config().endpoint,
            model = %client.config().model,
            "Completion client configured"
        );

        Ok(Some(Arc::new(client)))
    }
}
