//! Type-checked view over an untrusted completion payload
//!
//! Every field is read defensively: wrong types, unparseable strings and
//! non-finite numbers become `None`. Unknown keys are ignored.

use chrono::NaiveDate;
use expense_parser_core::CompletionPayload;
use expense_parser_text_processing::entities::parse_date_value;
use expense_parser_text_processing::FieldOverrides;
use serde_json::Value;

/// Fields recovered from a completion payload
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompletionFields {
    pub category: Option<String>,
    pub amount: Option<f64>,
    pub currency: Option<String>,
    pub occurred_on: Option<NaiveDate>,
    pub notes: Option<String>,
    pub confidence: Option<f64>,
}

impl CompletionFields {
    pub fn from_payload(payload: &CompletionPayload) -> Self {
        Self {
            category: get_str(lookup(payload, "category")),
            amount: to_float(lookup(payload, "amount")),
            currency: get_str(lookup(payload, "currency")),
            occurred_on: to_date(lookup(payload, "occurredOn"))
                .or_else(|| to_date(lookup(payload, "occurred_on"))),
            notes: get_str(lookup(payload, "notes")),
            confidence: to_float(lookup(payload, "confidence")),
        }
    }

    /// Overrides for the deterministic extractors
    pub fn overrides(&self) -> FieldOverrides {
        FieldOverrides {
            category: self.category.clone(),
            amount: self.amount,
            currency: self.currency.clone(),
            occurred_on: self.occurred_on,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Exact key first, then a case-insensitive match
fn lookup<'a>(payload: &'a CompletionPayload, key: &str) -> Option<&'a Value> {
    payload.get(key).or_else(|| {
        payload
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(key))
            .map(|(_, value)| value)
    })
}

/// Non-blank string, trimmed
pub fn get_str(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(text)) => {
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        _ => None,
    }
}

/// Finite number, or a string that parses as one once commas are stripped
pub fn to_float(value: Option<&Value>) -> Option<f64> {
    let number = match value? {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => text.trim().replace(',', "").parse::<f64>().ok()?,
        _ => return None,
    };
    number.is_finite().then_some(number)
}

/// ISO date (leading 10 characters) or an embedded `YYYY-M-D` pattern
pub fn to_date(value: Option<&Value>) -> Option<NaiveDate> {
    match value {
        Some(Value::String(text)) => parse_date_value(text),
        _ => None,
    }
}
