// src/infrastructure/config.rs
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::application::EditorSettings;
use crate::constants::{AUTOSAVE_DELAY_MS, DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS};

/// TOML configuration for the snappad client
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub editor: EditorConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct EditorConfig {
    #[serde(default = "default_autosave_delay_ms")]
    pub autosave_delay_ms: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
pub struct StorageConfig {
    /// Session file location; empty means the platform data directory
    #[serde(default)]
    pub session_file: String,
}

fn default_base_url() -> String { DEFAULT_API_URL.to_string() }
fn default_timeout_secs() -> u64 { DEFAULT_TIMEOUT_SECS }
fn default_autosave_delay_ms() -> u64 { AUTOSAVE_DELAY_MS }

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            autosave_delay_ms: default_autosave_delay_ms(),
        }
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file {}", path.as_ref().display()))?;

        let config: Config = toml::from_str(&content)
            .context("Failed to parse TOML config")?;

        Ok(config)
    }

    /// Load `path` if given, else the default location if it exists, else defaults
    pub fn discover(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(path) if path.exists() => {
                debug!(?path, "Loading config");
                Self::load(path)
            }
            _ => {
                debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// `<config dir>/snappad/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("snappad").join("config.toml"))
    }

    /// Save configuration to TOML file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let toml_string = toml::to_string_pretty(self)
            .context("Failed to serialize config to TOML")?;

        std::fs::write(path.as_ref(), toml_string)
            .context("Failed to write config file")?;

        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    pub fn editor_settings(&self) -> EditorSettings {
        EditorSettings {
            autosave_delay: Duration::from_millis(self.editor.autosave_delay_ms),
        }
    }

    pub fn session_file(&self) -> Option<PathBuf> {
        let path = self.storage.session_file.trim();
        (!path.is_empty()).then(|| PathBuf::from(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn given_empty_file_when_loading_then_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, "").unwrap();

        let config = Config::load(&config_path).unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.api.base_url, DEFAULT_API_URL);
        assert_eq!(
            config.editor_settings().autosave_delay,
            Duration::from_millis(1000)
        );
        assert_eq!(config.session_file(), None);
    }

    #[test]
    fn given_partial_file_when_loading_then_merges_with_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(
            &config_path,
            r#"
[api]
base_url = "https://notes.example.com/api/"

[editor]
autosave_delay_ms = 250
"#,
        )
        .unwrap();

        let config = Config::load(&config_path).unwrap();

        assert_eq!(config.api.base_url, "https://notes.example.com/api/");
        assert_eq!(config.api.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.editor.autosave_delay_ms, 250);
    }

    #[test]
    fn given_saved_config_when_loading_then_roundtrips() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        let mut config = Config::default();
        config.storage.session_file = "/tmp/snappad-session.json".to_string();

        config.save(&config_path).unwrap();
        let loaded = Config::load(&config_path).unwrap();

        assert_eq!(loaded, config);
        assert_eq!(
            loaded.session_file(),
            Some(PathBuf::from("/tmp/snappad-session.json"))
        );
    }

    #[test]
    fn given_invalid_toml_when_loading_then_returns_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, "[api\nbase_url = ").unwrap();

        assert!(Config::load(&config_path).is_err());
    }

    #[test]
    fn given_explicit_missing_path_when_discovering_then_returns_error() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope.toml");

        assert!(Config::discover(Some(missing.as_path())).is_err());
    }
}
