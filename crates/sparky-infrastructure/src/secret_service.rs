//! File-backed SecretService implementation.
//!
//! Reads API keys from `secret.json` under the Sparky config directory.
//! Error messages name the file, never the key material.

use crate::paths::SparkyPaths;
use async_trait::async_trait;
use sparky_core::config::SecretConfig;
use sparky_core::error::{Result, SparkyError};
use sparky_core::secret::SecretService;
use std::path::PathBuf;

/// Loads secrets from a JSON file on disk.
pub struct SecretServiceImpl {
    secret_path: PathBuf,
}

impl SecretServiceImpl {
    /// Creates a service reading the default secret file, creating a
    /// template (600 permissions) when it doesn't exist yet.
    pub fn default_location() -> Result<Self> {
        let secret_path = SparkyPaths::ensure_secret_file()
            .map_err(|e| SparkyError::config(format!("Failed to prepare secret file: {}", e)))?;
        Ok(Self { secret_path })
    }

    /// Creates a service reading the given file.
    pub fn new(secret_path: PathBuf) -> Self {
        Self { secret_path }
    }
}

#[async_trait]
impl SecretService for SecretServiceImpl {
    async fn load_secrets(&self) -> Result<SecretConfig> {
        if !self.secret_path.exists() {
            return Err(SparkyError::config(format!(
                "Secret file not found at: {}",
                self.secret_path.display()
            )));
        }

        let content = tokio::fs::read_to_string(&self.secret_path)
            .await
            .map_err(|e| {
                SparkyError::config(format!(
                    "Failed to read secret file at {}: {}",
                    self.secret_path.display(),
                    e
                ))
            })?;

        serde_json::from_str(&content).map_err(|e| {
            SparkyError::config(format!(
                "Failed to parse secret file at {}: {}",
                self.secret_path.display(),
                e
            ))
        })
    }

    async fn secret_file_exists(&self) -> bool {
        self.secret_path.exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_load_secrets() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("secret.json");
        std::fs::write(
            &path,
            r#"{"gemini": {"api_key": "test-key", "model_name": "gemini-2.5-flash"}}"#,
        )
        .unwrap();

        let service = SecretServiceImpl::new(path);
        assert!(service.secret_file_exists().await);

        let secrets = service.load_secrets().await.unwrap();
        let gemini = secrets.gemini.unwrap();
        assert_eq!(gemini.api_key, "test-key");
        assert_eq!(gemini.model_name.as_deref(), Some("gemini-2.5-flash"));
    }

    #[tokio::test]
    async fn test_missing_file_is_a_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let service = SecretServiceImpl::new(temp_dir.path().join("missing.json"));

        assert!(!service.secret_file_exists().await);
        let error = service.load_secrets().await.unwrap_err();
        assert!(error.is_config());
    }

    #[tokio::test]
    async fn test_malformed_file_does_not_leak_content() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("secret.json");
        std::fs::write(&path, "{ not json").unwrap();

        let service = SecretServiceImpl::new(path);
        let error = service.load_secrets().await.unwrap_err();
        assert!(error.is_config());
        assert!(!error.to_string().contains("not json"));
    }
}
