//! Deterministic text processing for expense parsing
//!
//! This crate provides the extraction engine behind the expense parser:
//! - **Numerals**: Chinese numeral interpretation (units up to 亿, decimals, sign)
//! - **Entities**: amount, currency, date and category recognizers
//! - **Cascade**: ordered short-circuit resolution shared by the recognizers
//! - **Confidence**: bounded score from which signals fired
//!
//! Everything here is a pure function over its inputs and the static tables.

pub mod cascade;
pub mod confidence;
pub mod entities;
pub mod numerals;

pub use cascade::{Cascade, Resolved};
pub use confidence::{derive_confidence, ConfidenceSignals};
pub use entities::{ExpenseCategory, ExpenseFields, FieldOverrides};
pub use numerals::parse_chinese_numeral;
