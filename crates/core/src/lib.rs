//! Core traits and types for the expense parser
//!
//! This crate provides foundational types used across all other crates:
//! - Request/response types for expense parsing
//! - The completion collaborator trait
//! - Error types

pub mod error;
pub mod expense;
pub mod traits;

pub use error::{Error, Result};
pub use expense::{ParseRequest, ParseResponse};
pub use traits::{CompletionClient, CompletionPayload};
