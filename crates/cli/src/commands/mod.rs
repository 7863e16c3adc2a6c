//! Command handlers for the prompt library CLI.
//!
//! This module organizes all CLI commands into separate submodules.

pub mod bridge;
pub mod prompts;

// Re-export command types for convenience
pub use bridge::BridgeCommand;
pub use prompts::{AddCommand, DeleteCommand, GetCommand, ListCommand, UpdateCommand};
