//! Prompt library request router.
//!
//! Maps the four prompt message types onto a `PromptRepository` and reports
//! outcomes through the UI dispatcher:
//!
//! | Type            | Payload                                   | Callbacks |
//! |-----------------|-------------------------------------------|-----------|
//! | `get_prompts`   | ignored                                   | `updatePrompts` |
//! | `add_prompt`    | prompt record                             | `promptOperationResult`, then `updatePrompts` on success |
//! | `update_prompt` | `{"id": "...", "updates": {...}}`         | same |
//! | `delete_prompt` | `{"id": "..."}`                           | same |
//!
//! A failed list refresh degrades to an empty list. A failed mutation is
//! always reported; no error escapes to the caller.

use promptlib_core::{AppError, AppResult};
use promptlib_prompt::{Prompt, PromptRepository};
use serde_json::{Map, Value};

use crate::dispatcher::UiDispatcher;
use crate::escape::escape_js;
use crate::handler::MessageHandler;
use crate::message::{Callback, Operation, OperationResult, UiCall};

pub const GET_PROMPTS: &str = "get_prompts";
pub const ADD_PROMPT: &str = "add_prompt";
pub const UPDATE_PROMPT: &str = "update_prompt";
pub const DELETE_PROMPT: &str = "delete_prompt";

const SUPPORTED_TYPES: &[&str] = &[GET_PROMPTS, ADD_PROMPT, UPDATE_PROMPT, DELETE_PROMPT];

/// Error reported when `delete_prompt` targets an unknown id.
const PROMPT_NOT_FOUND: &str = "Prompt not found";

/// Routes prompt requests to storage and reports back to the UI.
pub struct PromptRequestRouter<R, D> {
    store: R,
    ui: D,
}

impl<R, D> PromptRequestRouter<R, D>
where
    R: PromptRepository,
    D: UiDispatcher,
{
    pub fn new(store: R, ui: D) -> Self {
        Self { store, ui }
    }

    pub fn store(&self) -> &R {
        &self.store
    }

    /// Send the current list to `updatePrompts`, or `[]` if it cannot be read.
    pub fn refresh(&self) {
        let listed = self
            .store
            .list()
            .and_then(|prompts| serde_json::to_string(&prompts).map_err(AppError::from));

        let payload = match listed {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(category = e.category(), "Failed to get prompts: {}", e);
                "[]".to_string()
            }
        };

        self.emit(Callback::UpdatePrompts, &payload);
    }

    fn add_prompt(&self, content: &str) -> AppResult<()> {
        let prompt = Prompt::from_value(parse_json(content)?)?;
        self.store.add(prompt)
    }

    fn update_prompt(&self, content: &str) -> AppResult<()> {
        let request = parse_object(content)?;
        let id = required_string(&request, "id")?;
        let updates = required_object(&request, "updates")?;
        self.store.update(id, updates)
    }

    fn delete_prompt(&self, content: &str) -> AppResult<()> {
        let request = parse_object(content)?;
        let id = required_string(&request, "id")?;

        if self.store.delete(id)? {
            Ok(())
        } else {
            Err(AppError::NotFound(PROMPT_NOT_FOUND.to_string()))
        }
    }

    /// Report the outcome of a mutation; refresh the list after a success.
    ///
    /// An unknown id is an expected outcome and logs at `warn`; other
    /// failures log at `error`.
    fn finish(&self, operation: Operation, outcome: AppResult<()>) {
        match outcome {
            Ok(()) => {
                tracing::debug!(%operation, "Prompt operation succeeded");
                self.emit_result(&OperationResult::success(operation));
                self.refresh();
            }
            Err(e) => {
                if matches!(e, AppError::NotFound(_)) {
                    tracing::warn!(%operation, "Cannot {} prompt: {}", operation, e);
                } else {
                    tracing::error!(
                        %operation,
                        category = e.category(),
                        "Failed to {} prompt: {}",
                        operation,
                        e
                    );
                }
                self.emit_result(&OperationResult::failure(operation, e.to_string()));
            }
        }
    }

    fn emit_result(&self, result: &OperationResult) {
        match serde_json::to_string(result) {
            Ok(json) => self.emit(Callback::PromptOperationResult, &json),
            Err(e) => tracing::error!("Failed to serialize operation result: {}", e),
        }
    }

    fn emit(&self, callback: Callback, payload: &str) {
        self.ui.dispatch(UiCall::new(callback, escape_js(payload)));
    }
}

impl<R, D> MessageHandler for PromptRequestRouter<R, D>
where
    R: PromptRepository,
    D: UiDispatcher,
{
    fn supported_types(&self) -> &'static [&'static str] {
        SUPPORTED_TYPES
    }

    fn handle(&self, message_type: &str, content: &str) -> bool {
        tracing::debug!("Handling {} request", message_type);

        match message_type {
            GET_PROMPTS => self.refresh(),
            ADD_PROMPT => self.finish(Operation::Add, self.add_prompt(content)),
            UPDATE_PROMPT => self.finish(Operation::Update, self.update_prompt(content)),
            DELETE_PROMPT => self.finish(Operation::Delete, self.delete_prompt(content)),
            _ => return false,
        }
        true
    }
}

fn parse_json(content: &str) -> AppResult<Value> {
    Ok(serde_json::from_str(content)?)
}

fn parse_object(content: &str) -> AppResult<Map<String, Value>> {
    match parse_json(content)? {
        Value::Object(map) => Ok(map),
        _ => Err(AppError::Validation(
            "Request payload must be a JSON object".to_string(),
        )),
    }
}

fn required_string<'a>(request: &'a Map<String, Value>, field: &str) -> AppResult<&'a str> {
    match request.get(field) {
        None | Some(Value::Null) => Err(AppError::MissingField(field.to_string())),
        Some(Value::String(s)) => Ok(s),
        Some(_) => Err(AppError::Validation(format!(
            "'{}' field must be a string",
            field
        ))),
    }
}

fn required_object<'a>(
    request: &'a Map<String, Value>,
    field: &str,
) -> AppResult<&'a Map<String, Value>> {
    match request.get(field) {
        None | Some(Value::Null) => Err(AppError::MissingField(field.to_string())),
        Some(Value::Object(map)) => Ok(map),
        Some(_) => Err(AppError::Validation(format!(
            "'{}' field must be a JSON object",
            field
        ))),
    }
}
