use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use crate::chat::DEFAULT_SYSTEM_PROMPT;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no configuration directory available on this platform")]
    NoConfigDir,
    #[error("config I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("config is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Program that answers a conversation (history on stdin, reply on stdout).
    pub backend_command: String,
    pub backend_args: Vec<String>,
    pub system_prompt: String,
    pub transcript_font: String,
    pub transcript_font_size: u32,
    pub code_font: String,
    pub code_font_size: u32,
    pub window_width: i32,
    pub window_height: i32,
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            backend_command: String::new(),
            backend_args: Vec::new(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            transcript_font: "Helvetica".to_string(),
            transcript_font_size: 14,
            code_font: "Courier".to_string(),
            code_font_size: 13,
            window_width: 1000,
            window_height: 760,
        }
    }

    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut path| {
            path.push("sql_chat");
            path.push("config.json");
            path
        })
    }

    /// Loads the user configuration, falling back to defaults when it is
    /// missing or unreadable. A missing file is written out with defaults so
    /// the backend command can be filled in.
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::new();
        };
        if !path.exists() {
            let config = Self::new();
            match config.save() {
                Ok(()) => info!(path = %path.display(), "wrote default config"),
                Err(err) => warn!(path = %path.display(), %err, "could not write default config"),
            }
            return config;
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(err) => {
                warn!(path = %path.display(), %err, "ignoring unreadable config");
                Self::new()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::config_path().ok_or(ConfigError::NoConfigDir)?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("sql_chat_config_{}_{}", name, std::process::id()))
            .join("config.json")
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"backend_command":"ask-sql"}"#).unwrap();
        assert_eq!(config.backend_command, "ask-sql");
        assert_eq!(config.code_font_size, 13);
        assert_eq!(config.system_prompt, DEFAULT_SYSTEM_PROMPT);
    }

    #[test]
    fn test_save_then_load() {
        let path = scratch_path("roundtrip");
        let mut config = AppConfig::new();
        config.backend_command = "python3".to_string();
        config.backend_args = vec!["agent.py".to_string()];

        config.save_to(&path).unwrap();
        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let path = scratch_path("invalid");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            AppConfig::load_from(&path),
            Err(ConfigError::Json(_))
        ));

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }
}
