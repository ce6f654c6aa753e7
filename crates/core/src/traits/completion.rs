//! Completion collaborator trait

use async_trait::async_trait;

use crate::Result;

/// Untrusted JSON object returned by a completion collaborator
///
/// Keys and value types are not guaranteed; consumers must type-check every
/// field they read.
pub type CompletionPayload = serde_json::Map<String, serde_json::Value>;

/// External service that turns a prompt into a JSON object
///
/// An empty payload means the collaborator answered but had nothing to say.
/// Errors cover transport failures, timeouts and unparseable output.
///
/// # Example
///
/// ```ignore
/// struct Fixed;
///
/// #[async_trait]
/// impl CompletionClient for Fixed {
///     async fn complete(&self, _prompt: &str) -> Result<CompletionPayload> {
///         Ok(CompletionPayload::new())
///     }
///
///     fn model_name(&self) -> &str {
///         "fixed"
///     }
/// }
/// ```
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send a prompt and return the parsed JSON object
    async fn complete(&self, prompt: &str) -> Result<CompletionPayload>;

    /// Model identifier, for logging and health reporting
    fn model_name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    struct Echo;

    #[async_trait]
    impl CompletionClient for Echo {
        async fn complete(&self, prompt: &str) -> Result<CompletionPayload> {
            if prompt.is_empty() {
                return Err(Error::Completion("empty prompt".to_string()));
            }
            let mut payload = CompletionPayload::new();
            payload.insert("notes".to_string(), serde_json::Value::String(prompt.to_string()));
            Ok(payload)
        }

        fn model_name(&self) -> &str {
            "echo"
        }
    }

    #[tokio::test]
    async fn test_trait_object_dispatch() {
        let client: Box<dyn CompletionClient> = Box::new(Echo);
        let payload = client.complete("hi").await.unwrap();
        assert_eq!(payload["notes"], "hi");
        assert!(client.complete("").await.is_err());
        assert_eq!(client.model_name(), "echo");
    }
}
