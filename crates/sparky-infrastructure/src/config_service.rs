//! Application configuration loading.

use crate::paths::SparkyPaths;
use sparky_core::config::AppConfig;
use sparky_core::error::{Result, SparkyError};
use std::path::PathBuf;

/// Loads `config.toml`, falling back to defaults when absent.
pub struct ConfigService {
    config_path: PathBuf,
}

impl ConfigService {
    /// Creates a service reading the default config file.
    pub fn default_location() -> Result<Self> {
        let config_path = SparkyPaths::config_file()
            .map_err(|e| SparkyError::config(format!("Failed to resolve config file: {}", e)))?;
        Ok(Self { config_path })
    }

    /// Creates a service reading the given file.
    pub fn new(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    /// Loads the configuration.
    ///
    /// A missing file yields `AppConfig::default()`; a malformed file is an
    /// error so a typo is not silently ignored.
    pub async fn load(&self) -> Result<AppConfig> {
        if !self.config_path.exists() {
            tracing::debug!(
                "No config file at {}, using defaults",
                self.config_path.display()
            );
            return Ok(AppConfig::default());
        }

        let content = tokio::fs::read_to_string(&self.config_path).await?;
        let config: AppConfig = toml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let service = ConfigService::new(temp_dir.path().join("config.toml"));

        let config = service.load().await.unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[tokio::test]
    async fn test_file_overrides_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "tts_voice = \"Kore\"\n").unwrap();

        let service = ConfigService::new(path);
        let config = service.load().await.unwrap();
        assert_eq!(config.tts_voice, "Kore");
        assert_eq!(config.chat_model, AppConfig::default().chat_model);
    }

    #[tokio::test]
    async fn test_malformed_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "chat_model = [not toml").unwrap();

        let service = ConfigService::new(path);
        assert!(service.load().await.is_err());
    }
}
