//! Prompt Library Core
//!
//! This crate provides the foundational utilities shared by the prompt
//! library crates:
//! - Error handling (`AppError`, `AppResult`)
//! - Logging infrastructure
//! - Configuration and on-disk path resolution

pub mod config;
pub mod error;
pub mod logging;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{AppError, AppResult};
