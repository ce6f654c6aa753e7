//! Deterministic completion client
//!
//! Returns a fixed payload (or a fixed failure) for every prompt and records
//! the prompts it was given. Used by tests and for offline runs where the
//! network client is not configured.

use std::time::Duration;

use async_trait::async_trait;
use expense_parser_core::{CompletionClient, CompletionPayload, Error, Result};
use parking_lot::Mutex;
use serde_json::Value;

#[derive(Debug, Clone)]
enum StubResponse {
    Payload(CompletionPayload),
    Failure(String),
}

/// Completion client with a canned answer
#[derive(Debug)]
pub struct StaticCompletionClient {
    response: StubResponse,
    delay: Option<Duration>,
    prompts: Mutex<Vec<String>>,
}

impl StaticCompletionClient {
    fn with_response(response: StubResponse) -> Self {
        Self {
            response,
            delay: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Always answer with `payload`
    pub fn returning(payload: CompletionPayload) -> Self {
        Self::with_response(StubResponse::Payload(payload))
    }

    /// Always answer with a JSON value; non-objects become an empty payload
    pub fn from_json(value: Value) -> Self {
        let payload = match value {
            Value::Object(map) => map,
            _ => CompletionPayload::new(),
        };
        Self::returning(payload)
    }

    /// Always answer with an empty payload
    pub fn empty() -> Self {
        Self::returning(CompletionPayload::new())
    }

    /// Always fail with `message`
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_response(StubResponse::Failure(message.into()))
    }

    /// Sleep before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Prompts received so far
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().len()
    }
}

#[async_trait]
impl CompletionClient for StaticCompletionClient {
    async fn complete(&self, prompt: &str) -> Result<CompletionPayload> {
        self.prompts.lock().push(prompt.to_string());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.response {
            StubResponse::Payload(payload) => Ok(payload.clone()),
            StubResponse::Failure(message) => Err(Error::Completion(message.clone())),
        }
    }

    fn model_name(&self) -> &str {
        "static-stub"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_returns_payload() {
        let client = StaticCompletionClient::from_json(json!({"amount": 12.5, "currency": "USD"}));
        let payload = client.complete("prompt").await.unwrap();

        assert_eq!(payload["amount"], 12.5);
        assert_eq!(payload["currency"], "USD");
        assert_eq!(client.prompts(), vec!["prompt".to_string()]);
    }

    #[tokio::test]
    async fn test_failure() {
        let client = StaticCompletionClient::failing("boom");
        let result = client.complete("prompt").await;

        assert!(matches!(result, Err(Error::Completion(ref m)) if m == "boom"));
        assert_eq!(client.call_count(), 1);
    }

    #[tokio::test]
    async fn test_non_object_json_is_empty() {
        let client = StaticCompletionClient::from_json(json!(["not", "an", "object"]));
        assert!(client.complete("p").await.unwrap().is_empty());
        assert!(StaticCompletionClient::empty().complete("p").await.unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay() {
        let client = StaticCompletionClient::empty().with_delay(Duration::from_secs(5));
        let started = tokio::time::Instant::now();
        client.complete("p").await.unwrap();
        assert!(started.elapsed() >= Duration::from_secs(5));
    }
}
