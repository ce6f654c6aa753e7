//! Core traits for the expense parser
//!
//! Collaborators that live outside the deterministic core are reached through
//! these traits so they can be swapped (network client, test stub) without
//! touching the parser.
//!
//! ```text
//! Completion:
//!   - CompletionClient: prompt -> loosely structured JSON object
//! ```

mod completion;

pub use completion::{CompletionClient, CompletionPayload};
