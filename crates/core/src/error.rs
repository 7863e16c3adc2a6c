//! Error types for the prompt library.
//!
//! This module defines a unified error enum shared by the store, the
//! request router and the CLI.

use thiserror::Error;

/// Unified error type for the prompt library.
///
/// All fallible functions return `Result<T, AppError>`. The `Display` output
/// of `Validation`, `NotFound` and `MissingField` is what the UI receives in
/// the `error` field of an operation result, so those render bare messages.
#[derive(Error, Debug)]
pub enum AppError {
    /// Missing or duplicate id, malformed payload
    #[error("{0}")]
    Validation(String),

    /// Operation targeted an unknown prompt id
    #[error("{0}")]
    NotFound(String),

    /// Required request field absent or null
    #[error("Missing '{0}' field in request")]
    MissingField(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl AppError {
    /// Short category name, used as a structured logging field.
    pub fn category(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation",
            AppError::NotFound(_) => "not_found",
            AppError::MissingField(_) => "missing_field",
            AppError::Io(_) => "io",
            AppError::Serialization(_) => "serialization",
            AppError::Config(_) => "config",
            AppError::Other(_) => "other",
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Other(format!("{:#}", err))
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
