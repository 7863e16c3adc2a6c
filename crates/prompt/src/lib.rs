//! Prompt library storage.
//!
//! This crate owns the persisted prompt collection:
//! - Open-ended prompt records keyed by id
//! - A single JSON document on disk, re-read on every operation
//! - Partial updates with null-means-remove semantics
//! - Listings ordered newest first

pub mod store;
pub mod types;

// Re-export main types
pub use store::{PromptRepository, PromptStore};
pub use types::{Prompt, PromptDocument, CREATED_AT_FIELD, ID_FIELD, PROMPTS_FIELD};
