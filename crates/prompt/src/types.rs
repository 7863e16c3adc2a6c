//! Prompt types for the prompt library.
//!
//! A prompt record is an open JSON object: `id` and `createdAt` are the only
//! fields the library interprets, everything else belongs to the caller.

use indexmap::IndexMap;
use promptlib_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key holding the prompt identifier.
pub const ID_FIELD: &str = "id";

/// Key holding the creation timestamp (milliseconds since epoch).
pub const CREATED_AT_FIELD: &str = "createdAt";

/// Root key holding the id-to-record map.
pub const PROMPTS_FIELD: &str = "prompts";

/// A single prompt record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Prompt(Map<String, Value>);

impl Prompt {
    /// Create a record holding only an id.
    pub fn new(id: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert(ID_FIELD.to_string(), Value::String(id.into()));
        Self(fields)
    }

    /// Builder-style field setter.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Interpret an arbitrary JSON value as a prompt record.
    pub fn from_value(value: Value) -> AppResult<Self> {
        match value {
            Value::Object(fields) => Ok(Self(fields)),
            other => Err(AppError::Validation(format!(
                "Prompt must be a JSON object, got {}",
                json_type_name(&other)
            ))),
        }
    }

    /// The record's id, if present and a string.
    pub fn id(&self) -> Option<&str> {
        self.0.get(ID_FIELD).and_then(Value::as_str)
    }

    /// The creation timestamp, if present and numeric.
    ///
    /// Numeric strings are accepted for hand-edited documents.
    pub fn created_at(&self) -> Option<i64> {
        match self.0.get(CREATED_AT_FIELD)? {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_u64().map(|v| i64::try_from(v).unwrap_or(i64::MAX)))
                .or_else(|| n.as_f64().map(|v| v as i64)),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Ordering key for listings; records without a timestamp sort last.
    pub fn sort_key(&self) -> i64 {
        self.created_at().unwrap_or(0)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// Backfill `id` from the document key when the stored record lacks one.
    pub(crate) fn ensure_id(&mut self, key: &str) {
        if !self.0.contains_key(ID_FIELD) {
            self.0
                .insert(ID_FIELD.to_string(), Value::String(key.to_string()));
        }
    }

    /// Stamp `createdAt` if absent or null.
    pub(crate) fn ensure_created_at(&mut self, now_millis: i64) {
        let missing = matches!(self.0.get(CREATED_AT_FIELD), None | Some(Value::Null));
        if missing {
            self.0
                .insert(CREATED_AT_FIELD.to_string(), Value::from(now_millis));
        }
    }
}

/// Merge a partial update into a stored record's fields.
///
/// `id` and `createdAt` are immutable and skipped. A `null` value removes
/// the field; any other value replaces it. Only top-level fields are
/// considered; nested objects are replaced as a whole.
pub(crate) fn merge_fields(fields: &mut Map<String, Value>, updates: &Map<String, Value>) {
    for (key, value) in updates {
        if key == ID_FIELD || key == CREATED_AT_FIELD {
            continue;
        }

        if value.is_null() {
            fields.shift_remove(key);
        } else {
            fields.insert(key.clone(), value.clone());
        }
    }
}

/// The on-disk root document.
///
/// `prompts` maps id to record in insertion order. Entries are kept as raw
/// JSON so a hand-edited entry that is not an object survives a rewrite; it
/// is skipped when records are read. Unknown root keys are carried through
/// `extra` so a rewrite does not drop them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PromptDocument {
    pub prompts: IndexMap<String, Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PromptDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a document from its JSON text.
    ///
    /// Fails only when the text is not JSON or the root is not an object. A
    /// missing or null `prompts` reads as empty; any other non-object value
    /// there is dropped with a warning.
    pub fn from_json(text: &str) -> AppResult<Self> {
        let mut root = match serde_json::from_str::<Value>(text)? {
            Value::Object(root) => root,
            other => {
                return Err(AppError::Validation(format!(
                    "Prompt document must be a JSON object, got {}",
                    json_type_name(&other)
                )))
            }
        };

        let prompts = match root.shift_remove(PROMPTS_FIELD) {
            None | Some(Value::Null) => IndexMap::new(),
            Some(Value::Object(records)) => records.into_iter().collect(),
            Some(other) => {
                tracing::warn!(
                    "Ignoring '{}' of type {}, expected an object",
                    PROMPTS_FIELD,
                    json_type_name(&other)
                );
                IndexMap::new()
            }
        };

        Ok(Self {
            prompts,
            extra: root,
        })
    }

    /// Serialize the document as pretty-printed JSON.
    pub fn to_json(&self) -> AppResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Store a record under `id`, replacing any previous entry.
    pub fn insert(&mut self, id: impl Into<String>, prompt: Prompt) {
        self.prompts.insert(id.into(), prompt.into_value());
    }

    /// Copy of the record stored under `id`, with `id` backfilled.
    pub fn record(&self, id: &str) -> Option<Prompt> {
        self.prompts.get(id).and_then(|entry| to_record(id, entry))
    }

    /// All records with `id` backfilled, in document order.
    pub fn records(&self) -> Vec<Prompt> {
        self.prompts
            .iter()
            .filter_map(|(key, entry)| to_record(key, entry))
            .collect()
    }
}

fn to_record(key: &str, entry: &Value) -> Option<Prompt> {
    match entry {
        Value::Object(fields) => {
            let mut prompt = Prompt(fields.clone());
            prompt.ensure_id(key);
            Some(prompt)
        }
        other => {
            tracing::warn!(
                "Skipping prompt '{}': expected an object, got {}",
                key,
                json_type_name(other)
            );
            None
        }
    }
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_document_deserialization() {
        let doc = PromptDocument::from_json(
            r#"{"prompts":{"a":{"id":"a","name":"First","createdAt":5}},"version":2}"#,
        )
        .unwrap();

        assert_eq!(doc.prompts.len(), 1);
        assert_eq!(doc.record("a").unwrap().created_at(), Some(5));
        assert_eq!(doc.extra.get("version"), Some(&json!(2)));
    }

    #[test]
    fn test_document_without_prompts_key() {
        let doc = PromptDocument::from_json(r#"{"other":true}"#).unwrap();
        assert!(doc.prompts.is_empty());

        let value: Value = serde_json::from_str(&doc.to_json().unwrap()).unwrap();
        assert_eq!(value, json!({"prompts": {}, "other": true}));
    }

    #[test]
    fn test_document_keeps_non_object_entries() {
        let doc = PromptDocument::from_json(
            r#"{"prompts":{"good":{"content":"x"},"bad":"junk"},"schema":"v1"}"#,
        )
        .unwrap();

        let records = doc.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id(), Some("good"));
        assert!(doc.record("bad").is_none());

        let value: Value = serde_json::from_str(&doc.to_json().unwrap()).unwrap();
        assert_eq!(
            value,
            json!({"prompts": {"good": {"content": "x"}, "bad": "junk"}, "schema": "v1"})
        );
    }

    #[test]
    fn test_document_null_or_invalid_prompts() {
        let doc = PromptDocument::from_json(r#"{"prompts":null,"schema":"v1"}"#).unwrap();
        assert!(doc.prompts.is_empty());
        assert_eq!(doc.extra.get("schema"), Some(&json!("v1")));

        let doc = PromptDocument::from_json(r#"{"prompts":[1,2],"schema":"v1"}"#).unwrap();
        assert!(doc.prompts.is_empty());
        assert_eq!(doc.extra.get("schema"), Some(&json!("v1")));
    }

    #[test]
    fn test_document_root_must_be_object() {
        assert!(PromptDocument::from_json("[]").is_err());
        assert!(PromptDocument::from_json("not json").is_err());
    }

    #[test]
    fn test_record_backfills_id() {
        let doc = PromptDocument::from_json(r#"{"prompts":{"legacy":{"content":"x"}}}"#).unwrap();

        let prompt = doc.record("legacy").unwrap();
        assert_eq!(prompt.id(), Some("legacy"));
        assert!(doc.record("missing").is_none());
        // the stored record itself is untouched
        assert!(doc.prompts["legacy"].get(ID_FIELD).is_none());
    }

    #[test]
    fn test_record_keeps_explicit_id() {
        let doc =
            PromptDocument::from_json(r#"{"prompts":{"key":{"id":"explicit"}}}"#).unwrap();
        assert_eq!(doc.record("key").unwrap().id(), Some("explicit"));
    }

    #[test]
    fn test_created_at_variants() {
        assert_eq!(Prompt::new("a").with_field("createdAt", 42).created_at(), Some(42));
        assert_eq!(
            Prompt::new("a").with_field("createdAt", 42.9).created_at(),
            Some(42)
        );
        assert_eq!(
            Prompt::new("a").with_field("createdAt", "17").created_at(),
            Some(17)
        );
        assert_eq!(Prompt::new("a").with_field("createdAt", true).created_at(), None);
        assert_eq!(Prompt::new("a").sort_key(), 0);
    }

    #[test]
    fn test_ensure_created_at_only_when_missing() {
        let mut stamped = Prompt::new("a");
        stamped.ensure_created_at(1000);
        assert_eq!(stamped.created_at(), Some(1000));

        let mut null_stamp = Prompt::new("b").with_field("createdAt", Value::Null);
        null_stamp.ensure_created_at(1000);
        assert_eq!(null_stamp.created_at(), Some(1000));

        let mut existing = Prompt::new("c").with_field("createdAt", 7);
        existing.ensure_created_at(1000);
        assert_eq!(existing.created_at(), Some(7));
    }

    #[test]
    fn test_merge_rules() {
        let mut prompt = Prompt::new("a")
            .with_field("createdAt", 10)
            .with_field("name", "old")
            .with_field("tags", json!(["x"]));

        let updates = json!({
            "id": "hijack",
            "createdAt": 99,
            "name": "new",
            "tags": null,
            "content": "body"
        });
        merge_fields(&mut prompt.0, updates.as_object().unwrap());

        assert_eq!(prompt.id(), Some("a"));
        assert_eq!(prompt.created_at(), Some(10));
        assert_eq!(prompt.get("name"), Some(&json!("new")));
        assert_eq!(prompt.get("content"), Some(&json!("body")));
        assert!(prompt.get("tags").is_none());
    }

    #[test]
    fn test_merge_does_not_recurse_into_objects() {
        let mut prompt = Prompt::new("a").with_field("meta", json!({"keep": 1, "drop": 2}));
        let updates = json!({"meta": {"drop": null}});
        merge_fields(&mut prompt.0, updates.as_object().unwrap());

        assert_eq!(prompt.get("meta"), Some(&json!({"drop": null})));
    }

    #[test]
    fn test_from_value_rejects_non_objects() {
        let err = Prompt::from_value(json!(["a"])).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(err.to_string().contains("array"));
    }
}
