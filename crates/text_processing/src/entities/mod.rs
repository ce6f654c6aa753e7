//! Expense Entity Extraction
//!
//! Deterministic recognizers for the fields of a single expense:
//! - Amounts (Arabic digits, or Chinese numerals as a fallback)
//! - Currency (symbols, keywords, ISO tokens, caller hint)
//! - Occurred-on date (absolute patterns, relative keywords, caller hint)
//! - Category (ordered keyword groups)
//!
//! Every recognizer is a pure function of its inputs. Values already
//! supplied by the completion collaborator are passed in as
//! [`FieldOverrides`] and take precedence over what is found in the text.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use expense_parser_text_processing::entities::ExpenseFields;
//!
//! let today = NaiveDate::from_ymd_opt(2024, 5, 20).unwrap();
//! let fields = ExpenseFields::extract("今天打车花了35块", None, None, today);
//!
//! assert_eq!(fields.category.as_deref(), Some("交通"));
//! assert_eq!(fields.amount, Some(35.0));
//! assert_eq!(fields.currency.as_deref(), Some("CNY"));
//! assert_eq!(fields.occurred_on, Some(today));
//! ```

mod amount;
mod category;
mod currency;
mod date;

pub use amount::{extract_amount, extract_arabic_amount, extract_numeral_amount};
pub use category::{classify_category, resolve_category, ExpenseCategory};
pub use currency::{
    currency_from_iso_token, currency_from_keyword, currency_from_symbol, normalize_currency_code,
    resolve_currency, CURRENCY_KEYWORDS, CURRENCY_SYMBOLS,
};
pub use date::{
    absolute_date, parse_date_value, relative_date, resolve_date, safe_date,
    RELATIVE_DATE_KEYWORDS,
};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Field values supplied from outside the text (already type-checked)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldOverrides {
    pub category: Option<String>,
    pub amount: Option<f64>,
    pub currency: Option<String>,
    pub occurred_on: Option<NaiveDate>,
}

/// Resolved expense fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpenseFields {
    pub category: Option<String>,
    pub amount: Option<f64>,
    pub currency: Option<String>,
    pub occurred_on: Option<NaiveDate>,
}

impl ExpenseFields {
    /// Merge overrides with what the text yields
    ///
    /// Overrides win field by field. The resolved amount is the magnitude of
    /// whatever was found.
    pub fn resolve(
        text: &str,
        overrides: &FieldOverrides,
        currency_hint: Option<&str>,
        date_hint: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Self {
        let amount = overrides
            .amount
            .filter(|value| value.is_finite())
            .or_else(|| extract_amount(text))
            .map(f64::abs);

        Self {
            category: resolve_category(text, overrides.category.as_deref()),
            amount,
            currency: resolve_currency(text, overrides.currency.as_deref(), currency_hint),
            occurred_on: overrides
                .occurred_on
                .or_else(|| resolve_date(text, date_hint, today)),
        }
    }

    /// Purely deterministic extraction with no overrides
    pub fn extract(
        text: &str,
        currency_hint: Option<&str>,
        date_hint: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Self {
        Self::resolve(text, &FieldOverrides::default(), currency_hint, date_hint, today)
    }

    /// Check if nothing was found
    pub fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.amount.is_none()
            && self.currency.is_none()
            && self.occurred_on.is_none()
    }

    pub fn has_amount(&self) -> bool {
        self.amount.is_some()
    }

    pub fn has_category(&self) -> bool {
        self.category.is_some()
    }
}
