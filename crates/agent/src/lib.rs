//! Expense Parsing Orchestrator
//!
//! Features:
//! - Best-effort consultation of a completion collaborator
//! - Defensive coercion of the untrusted completion payload
//! - Field-by-field merge with deterministic extraction
//! - Confidence scoring; a response is always produced

pub mod completion;
pub mod service;

pub use completion::CompletionFields;
pub use service::{build_response, ExpenseParserService, ParseStage};
