//! OpenAI-compatible completion client
//!
//! Works with any chat completions endpoint that accepts
//! `response_format: {"type": "json_object"}`:
//! - ModelScope inference (default)
//! - OpenAI
//! - Local servers (vLLM, Ollama) exposing `/v1/chat/completions`
//!
//! The request timeout is owned by the HTTP client; a timed out request
//! surfaces as `LlmError::Timeout`. There are no retries.

use std::time::Duration;

use async_trait::async_trait;
use expense_parser_config::constants::{endpoints, models, sampling, timeouts};
use expense_parser_core::{CompletionClient, CompletionPayload};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::json::payload_from_content;
use crate::prompt::SYSTEM_PROMPT;
use crate::LlmError;

/// Client configuration
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    /// Base URL, without the `/chat/completions` suffix
    pub endpoint: String,
    /// API key (may be empty for local servers)
    pub api_key: String,
    /// Model identifier
    pub model: String,
    /// Maximum tokens to generate
    pub max_tokens: usize,
    /// Temperature (0-2)
    pub temperature: f32,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for OpenAIConfig {
    fn default() -> Self {
        Self {
            endpoint: endpoints::MODELSCOPE_DEFAULT.to_string(),
            api_key: String::new(),
            model: models::MODELSCOPE_DEFAULT.to_string(),
            max_tokens: sampling::MAX_TOKENS,
            temperature: sampling::TEMPERATURE,
            timeout: Duration::from_secs(timeouts::COMPLETION_REQUEST_SECS),
        }
    }
}

impl OpenAIConfig {
    /// Create config for ModelScope inference
    pub fn modelscope(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    /// Create config for OpenAI
    pub fn openai(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            endpoint: endpoints::OPENAI_DEFAULT.to_string(),
            api_key: api_key.into(),
            model: model.into(),
            ..Default::default()
        }
    }

    /// Create config for local OpenAI-compatible server (vLLM, Ollama, etc.)
    pub fn local(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: String::new(),
            model: model.into(),
            ..Default::default()
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Whether the endpoint points at this machine
    pub fn is_local(&self) -> bool {
        let endpoint = self.endpoint.trim_start();
        ["http://localhost", "http://127.0.0.1", "http://[::1]"]
            .iter()
            .any(|prefix| endpoint.starts_with(prefix))
    }
}

/// Chat completions client returning JSON objects
pub struct OpenAICompatibleClient {
    config: OpenAIConfig,
    client: Client,
}

impl OpenAICompatibleClient {
    /// Create new client
    ///
    /// Remote endpoints require an API key.
    pub fn new(config: OpenAIConfig) -> Result<Self, LlmError> {
        if config.api_key.trim().is_empty() && !config.is_local() {
            return Err(LlmError::Configuration(
                "API key required for remote endpoints".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &OpenAIConfig {
        &self.config
    }

    /// Get the full API URL for chat completions
    fn chat_url(&self) -> String {
        format!("{}/chat/completions", self.config.endpoint.trim_end_matches('/'))
    }

    /// Build request headers
    fn build_headers(&self) -> reqwest::header::HeaderMap {
        use reqwest::header::HeaderValue;

        let mut headers = reqwest::header::HeaderMap::new();

        let api_key = self.config.api_key.trim();
        if !api_key.is_empty() {
            let auth_value = format!("Bearer {}", api_key);
            if let Ok(val) = HeaderValue::from_str(&auth_value) {
                headers.insert(reqwest::header::AUTHORIZATION, val);
            }
        }

        headers.insert(
            reqwest::header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );

        headers
    }

    fn build_request(&self, prompt: &str) -> ChatRequest {
        ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: Some(SYSTEM_PROMPT.to_string()),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: Some(prompt.to_string()),
                },
            ],
            temperature: Some(self.config.temperature),
            max_tokens: Some(self.config.max_tokens),
            response_format: Some(ResponseFormat {
                kind: "json_object".to_string(),
            }),
        }
    }

    /// Send one chat completion and parse the reply as a JSON object
    pub async fn complete_json(&self, prompt: &str) -> Result<CompletionPayload, LlmError> {
        let start = std::time::Instant::now();

        let response = self
            .client
            .post(self.chat_url())
            .headers(self.build_headers())
            .json(&self.build_request(prompt))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(LlmError::Api(format!("HTTP {}: {}", status, error_text)));
        }

        let response: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content);

        let payload = payload_from_content(content.as_deref())?;

        tracing::debug!(
            model = %self.config.model,
            fields = payload.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Completion received"
        );

        Ok(payload)
    }
}

#[async_trait]
impl CompletionClient for OpenAICompatibleClient {
    async fn complete(&self, prompt: &str) -> expense_parser_core::Result<CompletionPayload> {
        Ok(self.complete_json(prompt).await?)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

// Chat completions API types
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}
