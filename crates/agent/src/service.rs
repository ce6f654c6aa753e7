//! Expense parser service
//!
//! One request moves through four stages:
//!
//! ```text
//! Start -> CompletionAttempted -> Merged -> Done
//! ```
//!
//! The completion collaborator is consulted at most once and anything it
//! does wrong (error, timeout, panic, garbage payload) degrades to an empty
//! payload. `Done` is always reached; `parse` cannot fail.

use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use chrono::NaiveDate;
use futures::FutureExt;

use expense_parser_core::{CompletionClient, CompletionPayload, ParseRequest, ParseResponse};
use expense_parser_llm::build_expense_parse_prompt;
use expense_parser_text_processing::{derive_confidence, ConfidenceSignals, ExpenseFields};

use crate::completion::CompletionFields;

/// Stage of a single parse, used for tracing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStage {
    Start,
    CompletionAttempted,
    Merged,
    Done,
}

impl fmt::Display for ParseStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseStage::Start => write!(f, "start"),
            ParseStage::CompletionAttempted => write!(f, "completion_attempted"),
            ParseStage::Merged => write!(f, "merged"),
            ParseStage::Done => write!(f, "done"),
        }
    }
}

/// Parses free-text expense descriptions into structured records
///
/// Cheap to clone; holds no per-request state.
#[derive(Clone, Default)]
pub struct ExpenseParserService {
    completion: Option<Arc<dyn CompletionClient>>,
}

impl ExpenseParserService {
    pub fn new(completion: Option<Arc<dyn CompletionClient>>) -> Self {
        Self { completion }
    }

    /// Service without a completion collaborator
    pub fn deterministic() -> Self {
        Self { completion: None }
    }

    pub fn with_completion(completion: Arc<dyn CompletionClient>) -> Self {
        Self {
            completion: Some(completion),
        }
    }

    pub fn has_completion(&self) -> bool {
        self.completion.is_some()
    }

    /// Model behind the collaborator, if one is configured
    pub fn completion_model(&self) -> Option<&str> {
        self.completion.as_deref().map(|client| client.model_name())
    }

    /// Parse relative to the local calendar date
    pub async fn parse(&self, request: &ParseRequest) -> ParseResponse {
        self.parse_on(request, chrono::Local::now().date_naive()).await
    }

    /// Parse with an explicit "today" for relative date keywords
    pub async fn parse_on(&self, request: &ParseRequest, today: NaiveDate) -> ParseResponse {
        tracing::trace!(stage = %ParseStage::Start, trip_id = ?request.trip_id, "Parsing expense");

        let payload = self.attempt_completion(request).await;
        tracing::trace!(
            stage = %ParseStage::CompletionAttempted,
            fields = payload.len(),
            "Completion stage finished"
        );

        build_response(request, &payload, today)
    }

    /// Single best-effort call to the collaborator
    async fn attempt_completion(&self, request: &ParseRequest) -> CompletionPayload {
        let Some(client) = self.completion.as_ref() else {
            return CompletionPayload::new();
        };

        let prompt = build_expense_parse_prompt(
            &request.content,
            request.currency_hint.as_deref(),
            request.date_hint,
        );

        match AssertUnwindSafe(client.complete(&prompt)).catch_unwind().await {
            Ok(Ok(payload)) => payload,
            Ok(Err(e)) => {
                tracing::warn!(
                    error = %e,
                    model = client.model_name(),
                    "Completion failed, falling back to deterministic extraction"
                );
                CompletionPayload::new()
            }
            Err(_) => {
                tracing::error!(
                    model = client.model_name(),
                    "Completion client panicked, falling back to deterministic extraction"
                );
                CompletionPayload::new()
            }
        }
    }
}

impl fmt::Debug for ExpenseParserService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExpenseParserService")
            .field("completion_model", &self.completion_model())
            .finish()
    }
}

/// Merge a completion payload with deterministic extraction
///
/// Payload values win field by field when present and well-typed; notes fall
/// back to the raw content.
pub fn build_response(
    request: &ParseRequest,
    payload: &CompletionPayload,
    today: NaiveDate,
) -> ParseResponse {
    let external = CompletionFields::from_payload(payload);

    let fields = ExpenseFields::resolve(
        &request.content,
        &external.overrides(),
        request.currency_hint.as_deref(),
        request.date_hint,
        today,
    );
    tracing::trace!(stage = %ParseStage::Merged, ?fields, "Fields merged");

    let confidence = derive_confidence(&ConfidenceSignals {
        external: external.confidence,
        used_completion: !payload.is_empty(),
        has_amount: fields.has_amount(),
        has_category: fields.has_category(),
    });

    let response = ParseResponse {
        category: fields.category,
        amount: fields.amount,
        currency: fields.currency,
        occurred_on: fields.occurred_on,
        notes: external.notes.unwrap_or_else(|| request.content.clone()),
        confidence: Some(confidence),
    };

    tracing::info!(
        stage = %ParseStage::Done,
        category = ?response.category,
        amount = ?response.amount,
        currency = ?response.currency,
        occurred_on = ?response.occurred_on,
        confidence,
        "Expense parsed"
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use expense_parser_llm::StaticCompletionClient;
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 20).unwrap()
    }

    #[tokio::test]
    async fn test_deterministic_taxi() {
        let service = ExpenseParserService::deterministic();
        let response = service
            .parse_on(&ParseRequest::new("今天打车花了35块"), today())
            .await;

        assert_eq!(response.category.as_deref(), Some("交通"));
        assert_eq!(response.amount, Some(35.0));
        assert_eq!(response.currency.as_deref(), Some("CNY"));
        assert_eq!(response.occurred_on, Some(today()));
        assert_eq!(response.notes, "今天打车花了35块");
        assert_eq!(response.confidence, Some(0.6));
    }

    #[tokio::test]
    async fn test_completion_fields_win() {
        let stub = Arc::new(StaticCompletionClient::from_json(json!({
            "category": "餐饮",
            "amount": "42",
            "currency": "usd",
            "occurredOn": "2024-05-01",
            "notes": "team lunch"
        })));
        let service = ExpenseParserService::with_completion(stub.clone());

        let response = service
            .parse_on(&ParseRequest::new("今天打车花了35块"), today())
            .await;

        assert_eq!(response.category.as_deref(), Some("餐饮"));
        assert_eq!(response.amount, Some(42.0));
        assert_eq!(response.currency.as_deref(), Some("USD"));
        assert_eq!(response.occurred_on, NaiveDate::from_ymd_opt(2024, 5, 1));
        assert_eq!(response.notes, "team lunch");
        assert_eq!(response.confidence, Some(0.85));
        assert_eq!(stub.call_count(), 1);
    }

    #[tokio::test]
    async fn test_prompt_carries_hints() {
        let stub = Arc::new(StaticCompletionClient::empty());
        let service = ExpenseParserService::with_completion(stub.clone());
        let request = ParseRequest::new("午餐")
            .with_currency_hint("JPY")
            .with_date_hint(NaiveDate::from_ymd_opt(2024, 4, 1).unwrap());

        service.parse_on(&request, today()).await;

        let prompts = stub.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("午餐"));
        assert!(prompts[0].contains("JPY"));
        assert!(prompts[0].contains("2024-04-01"));
    }

    #[test]
    fn test_build_response_empty_payload() {
        let response = build_response(&ParseRequest::new("备注"), &CompletionPayload::new(), today());
        assert_eq!(response, {
            let mut expected = ParseResponse::notes_only("备注");
            expected.confidence = Some(0.3);
            expected
        });
    }

    #[test]
    fn test_service_debug_and_model() {
        let service = ExpenseParserService::with_completion(Arc::new(StaticCompletionClient::empty()));
        assert!(service.has_completion());
        assert_eq!(service.completion_model(), Some("static-stub"));
        assert!(format!("{:?}", service).contains("static-stub"));
        assert!(ExpenseParserService::default().completion_model().is_none());
    }
}
