//! Configuration management for the prompt library.
//!
//! Configuration is merged from several sources, lowest precedence first:
//! - Built-in defaults
//! - Config file (`.promptlib/config.yaml` in the workspace)
//! - Environment variables
//! - Command-line flags
//!
//! The configuration also owns on-disk path resolution: where the data
//! directory lives and which file holds the prompt document.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Name of the per-workspace data directory.
pub const DATA_DIR_NAME: &str = ".promptlib";

/// File name of the prompt document inside the data directory.
pub const PROMPT_FILE_NAME: &str = "prompt.json";

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the workspace root (contains .promptlib/)
    pub workspace: PathBuf,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Explicit prompt document path; defaults to `.promptlib/prompt.json`
    pub prompt_file: Option<PathBuf>,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,
}

/// Full configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    storage: Option<StorageConfig>,
    logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StorageConfig {
    #[serde(rename = "promptFile")]
    prompt_file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingConfig {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workspace: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_file: None,
            prompt_file: None,
            log_level: None,
            verbose: false,
            no_color: false,
        }
    }
}

impl AppConfig {
    /// Create a configuration rooted at `workspace` with everything else defaulted.
    pub fn for_workspace(workspace: impl Into<PathBuf>) -> Self {
        Self {
            workspace: workspace.into(),
            ..Self::default()
        }
    }

    /// Load configuration from environment variables, config file and defaults.
    ///
    /// Environment variables:
    /// - `PROMPTLIB_WORKSPACE`: Override workspace path
    /// - `PROMPTLIB_CONFIG`: Path to config file
    /// - `PROMPTLIB_FILE`: Path to the prompt document
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    ///
    /// # Example
    /// ```no_run
    /// use promptlib_core::config::AppConfig;
    ///
    /// let config = AppConfig::load().expect("Failed to load config");
    /// println!("Prompt file: {:?}", config.prompt_file_path());
    /// ```
    pub fn load() -> AppResult<Self> {
        let mut config = Self::default();

        if let Ok(workspace) = std::env::var("PROMPTLIB_WORKSPACE") {
            config.workspace = PathBuf::from(workspace);
        }

        if let Ok(config_file) = std::env::var("PROMPTLIB_CONFIG") {
            config.config_file = Some(PathBuf::from(config_file));
        }

        if !config.workspace.exists() {
            return Err(AppError::Config(format!(
                "Workspace directory does not exist: {:?}",
                config.workspace
            )));
        }

        let config_path = match config.config_file {
            Some(ref cf) => cf.clone(),
            None => config.data_dir().join("config.yaml"),
        };

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        }

        // Environment variables override YAML config
        if let Ok(prompt_file) = std::env::var("PROMPTLIB_FILE") {
            config.prompt_file = Some(PathBuf::from(prompt_file));
        }

        if let Ok(level) = std::env::var("RUST_LOG") {
            config.log_level = Some(level);
        }

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge YAML configuration file into this config.
    fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();

        if let Some(storage) = config_file.storage {
            if let Some(file) = storage.prompt_file {
                result.prompt_file = Some(PathBuf::from(file));
            }
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// CLI flags take precedence over environment variables and the config file.
    pub fn with_overrides(
        mut self,
        workspace: Option<PathBuf>,
        config_file: Option<PathBuf>,
        prompt_file: Option<PathBuf>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(workspace) = workspace {
            self.workspace = workspace;
        }

        if let Some(config_file) = config_file {
            self.config_file = Some(config_file);
        }

        if let Some(prompt_file) = prompt_file {
            self.prompt_file = Some(prompt_file);
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Get the path to the .promptlib directory.
    pub fn data_dir(&self) -> PathBuf {
        self.workspace.join(DATA_DIR_NAME)
    }

    /// Resolve the prompt document path.
    ///
    /// Relative explicit paths are resolved against the workspace.
    pub fn prompt_file_path(&self) -> PathBuf {
        match self.prompt_file {
            Some(ref file) if file.is_absolute() => file.clone(),
            Some(ref file) => self.workspace.join(file),
            None => self.data_dir().join(PROMPT_FILE_NAME),
        }
    }

    /// Ensure the directory holding the prompt document exists.
    pub fn ensure_data_dir(&self) -> AppResult<()> {
        let path = self.prompt_file_path();
        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        if !dir.exists() {
            std::fs::create_dir_all(dir).map_err(|e| {
                AppError::Config(format!("Failed to create data directory {:?}: {}", dir, e))
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.prompt_file.is_none());
        assert!(!config.verbose);
        assert!(!config.no_color);
    }

    #[test]
    fn test_default_prompt_file_path() {
        let config = AppConfig::for_workspace("/tmp/ws");
        assert_eq!(
            config.prompt_file_path(),
            PathBuf::from("/tmp/ws/.promptlib/prompt.json")
        );
    }

    #[test]
    fn test_relative_prompt_file_resolves_against_workspace() {
        let mut config = AppConfig::for_workspace("/tmp/ws");
        config.prompt_file = Some(PathBuf::from("data/lib.json"));
        assert_eq!(config.prompt_file_path(), PathBuf::from("/tmp/ws/data/lib.json"));
    }

    #[test]
    fn test_with_overrides() {
        let config = AppConfig::for_workspace("/tmp/ws");
        let overridden = config.with_overrides(
            None,
            None,
            Some(PathBuf::from("/elsewhere/p.json")),
            None,
            true,
            false,
        );

        assert_eq!(overridden.prompt_file_path(), PathBuf::from("/elsewhere/p.json"));
        assert!(overridden.verbose);
        assert_eq!(overridden.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_merge_yaml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yaml");
        std::fs::write(
            &path,
            "storage:\n  promptFile: lib/prompts.json\nlogging:\n  level: trace\n  color: false\n",
        )
        .unwrap();

        let config = AppConfig::for_workspace(temp_dir.path())
            .merge_yaml(&path)
            .unwrap();
        assert_eq!(
            config.prompt_file_path(),
            temp_dir.path().join("lib/prompts.json")
        );
        assert_eq!(config.log_level, Some("trace".to_string()));
        assert!(config.no_color);
    }

    #[test]
    fn test_merge_invalid_yaml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yaml");
        std::fs::write(&path, "storage: [unclosed").unwrap();

        let result = AppConfig::for_workspace(temp_dir.path()).merge_yaml(&path);
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_ensure_data_dir_creates_parent() {
        let temp_dir = TempDir::new().unwrap();
        let config = AppConfig::for_workspace(temp_dir.path());
        config.ensure_data_dir().unwrap();
        assert!(temp_dir.path().join(DATA_DIR_NAME).is_dir());
    }
}
