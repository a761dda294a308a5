//! Engine configuration
//!
//! A small TOML file controls where the database lives and whether
//! membership notices are dispatched. Every field has a default, so a
//! missing file is not an error for callers that use
//! [`EngineConfig::default`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub notifications: NotificationConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database; the platform data directory is used
    /// when unset
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Master switch for membership-approved notices
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl EngineConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML content
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// The effective database path
    pub fn database_path(&self) -> PathBuf {
        self.database
            .path
            .clone()
            .unwrap_or_else(default_database_path)
    }
}

/// Platform default location for the engine database
pub fn default_database_path() -> PathBuf {
    directories::ProjectDirs::from("", "", "rally")
        .map(|dirs| dirs.data_dir().join("rally.db"))
        .unwrap_or_else(|| PathBuf::from("rally.db"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert!(config.database.path.is_none());
        assert!(config.notifications.enabled);
        assert!(config.database_path().ends_with("rally.db"));
    }

    #[test]
    fn test_from_toml() {
        let config = EngineConfig::from_toml(
            r#"
            [database]
            path = "/tmp/rally-test.db"

            [notifications]
            enabled = false
            "#,
        )
        .unwrap();

        assert_eq!(
            config.database_path(),
            PathBuf::from("/tmp/rally-test.db")
        );
        assert!(!config.notifications.enabled);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = EngineConfig::from_toml("[database]\n").unwrap();
        assert!(config.notifications.enabled);
    }

    #[test]
    fn test_bad_toml_is_an_error() {
        assert!(matches!(
            EngineConfig::from_toml("not = [valid"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(matches!(
            EngineConfig::load(&missing),
            Err(ConfigError::NotFound(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rally.toml");
        std::fs::write(&path, "[notifications]\nenabled = false\n").unwrap();

        let config = EngineConfig::load(&path).unwrap();
        assert!(!config.notifications.enabled);
    }
}
