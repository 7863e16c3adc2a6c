//! Direct prompt management commands.
//!
//! These talk to the store without going through the UI bridge.

use anyhow::Context;
use clap::Args;
use promptlib_core::{AppError, AppResult};
use promptlib_prompt::{Prompt, PromptRepository, PromptStore};
use serde_json::{Map, Value};

/// List prompts, newest first
#[derive(Args, Debug)]
pub struct ListCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl ListCommand {
    pub fn execute(&self, store: &PromptStore) -> AppResult<()> {
        let prompts = store.list()?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&prompts)?);
            return Ok(());
        }

        if prompts.is_empty() {
            println!("No prompts in {}", store.path().display());
            return Ok(());
        }

        for prompt in &prompts {
            let created = prompt
                .created_at()
                .map(|ts| ts.to_string())
                .unwrap_or_else(|| "-".to_string());
            println!(
                "{}\t{}\t{}",
                prompt.id().unwrap_or("?"),
                created,
                summary(prompt)
            );
        }

        Ok(())
    }
}

/// Show a single prompt
#[derive(Args, Debug)]
pub struct GetCommand {
    /// Prompt ID
    pub id: String,
}

impl GetCommand {
    pub fn execute(&self, store: &PromptStore) -> AppResult<()> {
        let prompt = store
            .get(&self.id)?
            .ok_or_else(|| AppError::NotFound(format!("Prompt with id '{}' not found", self.id)))?;

        println!("{}", serde_json::to_string_pretty(&prompt)?);
        Ok(())
    }
}

/// Add a new prompt
#[derive(Args, Debug)]
pub struct AddCommand {
    /// Prompt ID (required unless --json carries one)
    #[arg(long, required_unless_present = "json")]
    pub id: Option<String>,

    /// Display name
    #[arg(long, conflicts_with = "json")]
    pub name: Option<String>,

    /// Prompt text
    #[arg(long, conflicts_with = "json")]
    pub content: Option<String>,

    /// Extra field as key=value (value parsed as JSON, else taken as text)
    #[arg(long = "field", value_name = "KEY=VALUE", conflicts_with = "json")]
    pub fields: Vec<String>,

    /// Full prompt record as a JSON object
    #[arg(long, conflicts_with = "id")]
    pub json: Option<String>,
}

impl AddCommand {
    pub fn execute(&self, store: &PromptStore) -> AppResult<()> {
        let prompt = self.build_prompt()?;
        let id = prompt.id().unwrap_or_default().to_string();

        store.add(prompt)?;
        println!("Added prompt '{}'", id);
        Ok(())
    }

    fn build_prompt(&self) -> AppResult<Prompt> {
        if let Some(ref json) = self.json {
            return Prompt::from_value(serde_json::from_str(json)?);
        }

        let id = self
            .id
            .clone()
            .ok_or_else(|| AppError::Validation("Prompt must have an id".to_string()))?;
        let mut prompt = Prompt::new(id);

        if let Some(ref name) = self.name {
            prompt = prompt.with_field("name", name.as_str());
        }
        if let Some(ref content) = self.content {
            prompt = prompt.with_field("content", content.as_str());
        }
        for raw in &self.fields {
            let (key, value) = parse_assignment(raw)?;
            prompt = prompt.with_field(key, value);
        }

        Ok(prompt)
    }
}

/// Update fields of an existing prompt
#[derive(Args, Debug)]
pub struct UpdateCommand {
    /// Prompt ID
    pub id: String,

    /// Field to set as key=value (value parsed as JSON, else taken as text)
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub set: Vec<String>,

    /// Field to remove
    #[arg(long = "unset", value_name = "KEY")]
    pub unset: Vec<String>,
}

impl UpdateCommand {
    pub fn execute(&self, store: &PromptStore) -> AppResult<()> {
        let updates = self.build_updates()?;
        if updates.is_empty() {
            return Err(AppError::Validation(
                "Nothing to update: pass --set or --unset".to_string(),
            ));
        }

        store.update(&self.id, &updates)?;
        println!("Updated prompt '{}'", self.id);
        Ok(())
    }

    fn build_updates(&self) -> AppResult<Map<String, Value>> {
        let mut updates = Map::new();
        for raw in &self.set {
            let (key, value) = parse_assignment(raw)?;
            updates.insert(key, value);
        }
        for key in &self.unset {
            updates.insert(key.clone(), Value::Null);
        }
        Ok(updates)
    }
}

/// Delete a prompt
#[derive(Args, Debug)]
pub struct DeleteCommand {
    /// Prompt ID
    pub id: String,
}

impl DeleteCommand {
    pub fn execute(&self, store: &PromptStore) -> AppResult<()> {
        if !store.delete(&self.id)? {
            return Err(AppError::NotFound(format!(
                "Prompt with id '{}' not found",
                self.id
            )));
        }

        println!("Deleted prompt '{}'", self.id);
        Ok(())
    }
}

/// Split `key=value`; the value is parsed as JSON, falling back to a string.
fn parse_assignment(raw: &str) -> anyhow::Result<(String, Value)> {
    let (key, value) = raw
        .split_once('=')
        .with_context(|| format!("Expected KEY=VALUE, got '{}'", raw))?;

    let key = key.trim();
    anyhow::ensure!(!key.is_empty(), "Empty field name in '{}'", raw);

    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

/// One-line label: name, then title, then the start of the content.
fn summary(prompt: &Prompt) -> String {
    let label = ["name", "title", "content"]
        .iter()
        .find_map(|key| prompt.get(key).and_then(Value::as_str))
        .unwrap_or("");

    let first_line = label.lines().next().unwrap_or("");
    if first_line.chars().count() > 60 {
        let truncated: String = first_line.chars().take(57).collect();
        format!("{}...", truncated)
    } else {
        first_line.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_assignment_json_and_text() {
        assert_eq!(
            parse_assignment("tags=[\"a\",\"b\"]").unwrap(),
            ("tags".to_string(), json!(["a", "b"]))
        );
        assert_eq!(
            parse_assignment("name=Code review").unwrap(),
            ("name".to_string(), json!("Code review"))
        );
        assert_eq!(
            parse_assignment("eq=a=b").unwrap(),
            ("eq".to_string(), json!("a=b"))
        );
    }

    #[test]
    fn test_parse_assignment_errors() {
        assert!(parse_assignment("no-equals").is_err());
        assert!(parse_assignment("=value").is_err());

        let err: AppError = parse_assignment("no-equals").unwrap_err().into();
        assert!(err.to_string().contains("KEY=VALUE"));
    }

    #[test]
    fn test_update_builds_nulls_for_unset() {
        let cmd = UpdateCommand {
            id: "p1".to_string(),
            set: vec!["title=New".to_string()],
            unset: vec!["tags".to_string()],
        };

        let updates = cmd.build_updates().unwrap();
        assert_eq!(Value::Object(updates), json!({"title": "New", "tags": null}));
    }

    #[test]
    fn test_add_builds_prompt_from_flags() {
        let cmd = AddCommand {
            id: Some("p1".to_string()),
            name: Some("Review".to_string()),
            content: Some("Check this".to_string()),
            fields: vec!["priority=2".to_string()],
            json: None,
        };

        let prompt = cmd.build_prompt().unwrap();
        assert_eq!(
            prompt.into_value(),
            json!({"id": "p1", "name": "Review", "content": "Check this", "priority": 2})
        );
    }

    #[test]
    fn test_summary_truncates() {
        let long = "x".repeat(80);
        let prompt = Prompt::new("p").with_field("content", long.as_str());
        assert_eq!(summary(&prompt).chars().count(), 60);

        let named = Prompt::new("p")
            .with_field("name", "Short")
            .with_field("content", "ignored");
        assert_eq!(summary(&named), "Short");
    }
}
