//! Message types exchanged with the UI bridge.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Callbacks the UI exposes to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Callback {
    /// Receives the full prompt list as a JSON array string.
    UpdatePrompts,
    /// Receives a single `OperationResult` as a JSON object string.
    PromptOperationResult,
}

impl Callback {
    /// Bare callback name.
    pub fn name(&self) -> &'static str {
        match self {
            Callback::UpdatePrompts => "updatePrompts",
            Callback::PromptOperationResult => "promptOperationResult",
        }
    }

    /// Fully qualified invocation target in the UI's global scope.
    pub fn target(&self) -> &'static str {
        match self {
            Callback::UpdatePrompts => "window.updatePrompts",
            Callback::PromptOperationResult => "window.promptOperationResult",
        }
    }
}

impl fmt::Display for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One queued callback invocation.
///
/// `argument` is already escaped for use inside a JS string literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiCall {
    pub callback: Callback,
    pub argument: String,
}

impl UiCall {
    pub fn new(callback: Callback, argument: impl Into<String>) -> Self {
        Self {
            callback,
            argument: argument.into(),
        }
    }

    /// Render as a script statement, e.g. `window.updatePrompts('[]')`.
    pub fn to_script(&self) -> String {
        format!("{}('{}')", self.callback.target(), self.argument)
    }
}

/// Mutating operations reported through `promptOperationResult`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Add,
    Update,
    Delete,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Add => "add",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a mutating request as seen by the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationResult {
    pub success: bool,
    pub operation: Operation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl OperationResult {
    pub fn success(operation: Operation) -> Self {
        Self {
            success: true,
            operation,
            error: None,
        }
    }

    pub fn failure(operation: Operation, error: impl Into<String>) -> Self {
        Self {
            success: false,
            operation,
            error: Some(error.into()),
        }
    }
}

/// An inbound request in the transport's `<type>:<content>` wire form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeMessage {
    pub message_type: String,
    pub content: String,
}

impl BridgeMessage {
    /// Split at the first `:`. A message without one has empty content.
    pub fn parse(raw: &str) -> Self {
        let (message_type, content) = raw.split_once(':').unwrap_or((raw, ""));
        Self {
            message_type: message_type.trim().to_string(),
            content: content.to_string(),
        }
    }
}
