//! JSON extraction from model output
//!
//! Models asked for `json_object` output still occasionally wrap the object
//! in a markdown fence or a sentence of prose.

use serde_json::Value;
use expense_parser_core::CompletionPayload;

use crate::LlmError;

/// Locate the JSON object inside a model response
///
/// Checks a ```json fence, then any fence holding an object, then the span
/// from the first `{` to the last `}`.
pub fn extract_json_block(response: &str) -> Option<&str> {
    let trimmed = response.trim();

    if let Some(start) = trimmed.find("```json") {
        let after_fence = &trimmed[start + 7..];
        if let Some(end) = after_fence.find("```") {
            return Some(after_fence[..end].trim());
        }
    }

    if let Some(start) = trimmed.find("```") {
        let after_fence = &trimmed[start + 3..];
        if let Some(end) = after_fence.find("```") {
            let block = after_fence[..end].trim();
            if block.starts_with('{') {
                return Some(block);
            }
        }
    }

    match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(start), Some(end)) if start < end => Some(&trimmed[start..=end]),
        _ => None,
    }
}

/// Turn the message content of a completion into a payload
///
/// Missing or blank content is an empty payload. Valid JSON that is not an
/// object is also an empty payload. Content with no parseable object is an
/// error.
pub fn payload_from_content(content: Option<&str>) -> Result<CompletionPayload, LlmError> {
    let content = match content.map(str::trim) {
        Some(text) if !text.is_empty() => text,
        _ => return Ok(CompletionPayload::new()),
    };

    let block = extract_json_block(content).unwrap_or(content);
    let value: Value = serde_json::from_str(block)
        .map_err(|e| LlmError::InvalidResponse(format!("Completion is not valid JSON: {}", e)))?;

    match value {
        Value::Object(map) => Ok(map),
        other => {
            tracing::warn!(kind = json_kind(&other), "Completion returned non-object JSON, ignoring");
            Ok(CompletionPayload::new())
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_json_block_from_fenced() {
        let response = "Here you go:\n```json\n{\"amount\": 35}\n```\nDone.";
        assert_eq!(extract_json_block(response), Some("{\"amount\": 35}"));
    }

    #[test]
    fn extract_json_block_from_bare_fence() {
        let response = "```\n{\"amount\": 35}\n```";
        assert_eq!(extract_json_block(response), Some("{\"amount\": 35}"));
    }

    #[test]
    fn extract_json_block_from_prose() {
        let response = "结果如下 {\"currency\": \"CNY\"} 谢谢";
        assert_eq!(extract_json_block(response), Some("{\"currency\": \"CNY\"}"));
    }

    #[test]
    fn extract_json_block_no_json() {
        assert!(extract_json_block("no braces here").is_none());
        assert!(extract_json_block("} backwards {").is_none());
    }

    #[test]
    fn payload_empty_content() {
        assert!(payload_from_content(None).unwrap().is_empty());
        assert!(payload_from_content(Some("   ")).unwrap().is_empty());
    }

    #[test]
    fn payload_object() {
        let payload = payload_from_content(Some(r#"{"amount": "1,200", "extra": true}"#)).unwrap();
        assert_eq!(payload["amount"], "1,200");
        assert_eq!(payload["extra"], true);
    }

    #[test]
    fn payload_non_object_is_empty() {
        assert!(payload_from_content(Some("[1, 2, 3]")).unwrap().is_empty());
        assert!(payload_from_content(Some("42")).unwrap().is_empty());
    }

    #[test]
    fn payload_garbage_is_error() {
        let result = payload_from_content(Some("I could not parse that"));
        assert!(matches!(result, Err(LlmError::InvalidResponse(_))));
    }
}
