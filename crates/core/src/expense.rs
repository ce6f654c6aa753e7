//! Expense parse request and response types
//!
//! Field names follow the JSON boundary (`camelCase`), with `snake_case`
//! aliases accepted on input.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A single free-text expense description plus optional hints
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseRequest {
    /// Free-text description, e.g. "今天打车花了35块"
    #[serde(default)]
    pub content: String,
    /// Trip the expense belongs to; carried through, never inspected
    #[serde(default, alias = "trip_id", skip_serializing_if = "Option::is_none")]
    pub trip_id: Option<String>,
    /// Currency code or free text ("USD", "日元") used when the text has none
    #[serde(default, alias = "currency_hint", skip_serializing_if = "Option::is_none")]
    pub currency_hint: Option<String>,
    /// Date used when the text has neither an absolute nor a relative date
    #[serde(default, alias = "date_hint", skip_serializing_if = "Option::is_none")]
    pub date_hint: Option<NaiveDate>,
}

impl ParseRequest {
    /// Create a request for the given content
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Default::default()
        }
    }

    /// Builder pattern: set the trip id
    pub fn with_trip_id(mut self, trip_id: impl Into<String>) -> Self {
        self.trip_id = Some(trip_id.into());
        self
    }

    /// Builder pattern: set the currency hint
    pub fn with_currency_hint(mut self, hint: impl Into<String>) -> Self {
        self.currency_hint = Some(hint.into());
        self
    }

    /// Builder pattern: set the date hint
    pub fn with_date_hint(mut self, hint: NaiveDate) -> Self {
        self.date_hint = Some(hint);
        self
    }

    /// Reject requests without usable content
    pub fn validate(&self) -> Result<()> {
        if self.content.trim().is_empty() {
            return Err(Error::Validation("content must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Structured expense record produced by the parser
///
/// Every field except `notes` may be absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseResponse {
    pub category: Option<String>,
    /// Always non-negative when present
    pub amount: Option<f64>,
    /// 3-letter uppercase code
    pub currency: Option<String>,
    #[serde(alias = "occurred_on")]
    pub occurred_on: Option<NaiveDate>,
    pub notes: String,
    /// In [0, 1]
    pub confidence: Option<f64>,
}

impl ParseResponse {
    /// A response carrying only notes
    pub fn notes_only(notes: impl Into<String>) -> Self {
        Self {
            category: None,
            amount: None,
            currency: None,
            occurred_on: None,
            notes: notes.into(),
            confidence: None,
        }
    }

    /// Check if any structured field was resolved
    pub fn has_structured_fields(&self) -> bool {
        self.category.is_some()
            || self.amount.is_some()
            || self.currency.is_some()
            || self.occurred_on.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_accepts_camel_and_snake_case() {
        let camel: ParseRequest = serde_json::from_str(
            r#"{"content":"午餐 50","tripId":"t1","currencyHint":"JPY","dateHint":"2024-03-01"}"#,
        )
        .unwrap();
        let snake: ParseRequest = serde_json::from_str(
            r#"{"content":"午餐 50","trip_id":"t1","currency_hint":"JPY","date_hint":"2024-03-01"}"#,
        )
        .unwrap();

        assert_eq!(camel, snake);
        assert_eq!(camel.currency_hint.as_deref(), Some("JPY"));
        assert_eq!(camel.date_hint, NaiveDate::from_ymd_opt(2024, 3, 1));
    }

    #[test]
    fn test_validate_rejects_blank_content() {
        assert!(ParseRequest::new("   ").validate().unwrap_err().is_validation());
        assert!(ParseRequest::new("").validate().is_err());
        assert!(ParseRequest::new("打车 20").validate().is_ok());
    }

    #[test]
    fn test_missing_content_deserializes_then_fails_validation() {
        let request: ParseRequest = serde_json::from_str(r#"{"tripId":"t1"}"#).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_response_serializes_camel_case_with_nulls() {
        let mut response = ParseResponse::notes_only("备注");
        response.occurred_on = NaiveDate::from_ymd_opt(2024, 5, 2);
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["occurredOn"], "2024-05-02");
        assert!(json["amount"].is_null());
        assert_eq!(json["notes"], "备注");
        assert!(response.has_structured_fields());
        assert!(!ParseResponse::notes_only("x").has_structured_fields());
    }
}
