//! JSON-file backed prompt store.
//!
//! Every operation reads the whole document from disk, mutates it, and writes
//! it back. Nothing is cached between calls, so each call sees the latest file
//! contents.
//!
//! Mutations through one `PromptStore` value are serialized by an internal
//! mutex. Separate store values or other processes writing the same file are
//! not coordinated: concurrent writers can lose each other's updates (last
//! writer wins).

use crate::types::{json_type_name, merge_fields, Prompt, PromptDocument, ID_FIELD};
use promptlib_core::{AppConfig, AppError, AppResult};
use serde_json::{Map, Value};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tempfile::NamedTempFile;

/// Record-level operations over a prompt collection.
///
/// The request router talks to storage only through this trait.
pub trait PromptRepository: Send + Sync {
    /// All prompts, newest `createdAt` first.
    fn list(&self) -> AppResult<Vec<Prompt>>;

    /// A single prompt, or `None` if the id is unknown.
    fn get(&self, id: &str) -> AppResult<Option<Prompt>>;

    /// Insert a new prompt. Fails if the id is missing or already taken.
    fn add(&self, prompt: Prompt) -> AppResult<()>;

    /// Merge `updates` into an existing prompt.
    fn update(&self, id: &str, updates: &Map<String, Value>) -> AppResult<()>;

    /// Remove a prompt. Returns `false` if the id was unknown.
    fn delete(&self, id: &str) -> AppResult<bool>;
}

/// Prompt store persisted as a single JSON document.
#[derive(Debug)]
pub struct PromptStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl PromptStore {
    /// Create a store over the document at `path`. The file need not exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Create a store over the prompt file configured for the workspace.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.prompt_file_path())
    }

    /// Path of the backing document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the document.
    ///
    /// A missing or unreadable file yields an empty document rather than an
    /// error: "can't read" is treated as "no prompts yet". Malformed entries
    /// under `prompts` do not count as unreadable; they are kept as-is.
    pub fn read_document(&self) -> PromptDocument {
        if !self.path.exists() {
            return PromptDocument::new();
        }

        let parsed = std::fs::read_to_string(&self.path)
            .map_err(AppError::from)
            .and_then(|text| PromptDocument::from_json(&text));

        match parsed {
            Ok(doc) => doc,
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    "Failed to read prompt document, starting empty: {}",
                    e
                );
                PromptDocument::new()
            }
        }
    }

    /// Replace the document on disk.
    ///
    /// The parent directory is created if needed. Content is written to a
    /// temporary file next to the target and renamed over it.
    pub fn write_document(&self, doc: &PromptDocument) -> AppResult<()> {
        self.persist(doc).inspect_err(|e| {
            tracing::warn!(
                path = %self.path.display(),
                "Failed to write prompt document: {}",
                e
            );
        })
    }

    fn persist(&self, doc: &PromptDocument) -> AppResult<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;

        let json = doc.to_json()?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| AppError::Io(e.error))?;

        tracing::debug!(path = %self.path.display(), "Wrote prompt document");
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        // The guarded value is `()`, so a poisoned lock carries no broken state.
        self.write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl PromptRepository for PromptStore {
    fn list(&self) -> AppResult<Vec<Prompt>> {
        let mut prompts = self.read_document().records();

        // Stable: equal timestamps keep document order.
        prompts.sort_by(|a, b| b.sort_key().cmp(&a.sort_key()));

        tracing::debug!("Loaded {} prompts", prompts.len());
        Ok(prompts)
    }

    fn get(&self, id: &str) -> AppResult<Option<Prompt>> {
        Ok(self.read_document().record(id))
    }

    fn add(&self, mut prompt: Prompt) -> AppResult<()> {
        let id = match prompt.get(ID_FIELD) {
            None | Some(Value::Null) => {
                return Err(AppError::Validation("Prompt must have an id".to_string()))
            }
            Some(Value::String(id)) => id.clone(),
            Some(_) => {
                return Err(AppError::Validation(
                    "Prompt id must be a string".to_string(),
                ))
            }
        };

        let _guard = self.lock();
        let mut doc = self.read_document();

        if doc.prompts.contains_key(&id) {
            return Err(AppError::Validation(format!(
                "Prompt with id '{}' already exists",
                id
            )));
        }

        prompt.ensure_created_at(chrono::Utc::now().timestamp_millis());
        doc.insert(id.clone(), prompt);

        self.write_document(&doc)?;
        tracing::debug!("Added prompt: {}", id);
        Ok(())
    }

    fn update(&self, id: &str, updates: &Map<String, Value>) -> AppResult<()> {
        let _guard = self.lock();
        let mut doc = self.read_document();

        match doc.prompts.get_mut(id) {
            Some(Value::Object(fields)) => merge_fields(fields, updates),
            Some(other) => {
                return Err(AppError::Validation(format!(
                    "Prompt with id '{}' is a {}, not an object",
                    id,
                    json_type_name(other)
                )))
            }
            None => {
                return Err(AppError::NotFound(format!(
                    "Prompt with id '{}' not found",
                    id
                )))
            }
        }

        self.write_document(&doc)?;
        tracing::debug!("Updated prompt: {}", id);
        Ok(())
    }

    fn delete(&self, id: &str) -> AppResult<bool> {
        let _guard = self.lock();
        let mut doc = self.read_document();

        if doc.prompts.shift_remove(id).is_none() {
            tracing::debug!("Prompt not found: {}", id);
            return Ok(false);
        }

        self.write_document(&doc)?;
        tracing::debug!("Deleted prompt: {}", id);
        Ok(true)
    }
}
