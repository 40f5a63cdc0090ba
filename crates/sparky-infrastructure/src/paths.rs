//! Unified path management for Sparky configuration and state files.
//!
//! All configuration, secrets, and conversation state live under a single
//! per-user directory so that every storage component resolves locations the
//! same way.

use std::path::PathBuf;

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Unified path management for Sparky.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/sparky/            # Config directory
/// ├── config.toml              # Application configuration
/// ├── secret.json              # API keys
/// ├── state/                   # Conversation state
/// │   ├── transcript.json      # Persisted transcript
/// │   ├── intake.json          # Accepted intake data
/// │   └── intake_draft.json    # In-progress intake draft
/// └── logs/                    # Application logs
/// ```
pub struct SparkyPaths;

impl SparkyPaths {
    /// Returns the Sparky configuration directory.
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join("sparky"))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the path to the main configuration file.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the path to the secrets file.
    ///
    /// # Security Note
    ///
    /// Ensure this file has appropriate permissions (e.g., 600) to prevent
    /// unauthorized access.
    pub fn secret_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("secret.json"))
    }

    /// Returns the path to the conversation state directory.
    pub fn state_dir() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("state"))
    }

    /// Returns the path to the logs directory.
    pub fn logs_dir() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("logs"))
    }

    /// Ensures the secret file exists, creating it with a template if it
    /// doesn't.
    ///
    /// The template is a typed `SecretConfig` with an empty API key so the
    /// user only has to fill in the value. On Unix the file is created with
    /// 600 permissions.
    ///
    /// # Returns
    ///
    /// The path to the secret file (existing or newly created).
    pub fn ensure_secret_file() -> Result<PathBuf, std::io::Error> {
        let secret_path = Self::secret_file()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e.to_string()))?;

        if secret_path.exists() {
            return Ok(secret_path);
        }

        if let Some(parent) = secret_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        use sparky_core::config::{GeminiConfig, SecretConfig, DEFAULT_CHAT_MODEL};

        let template_config = SecretConfig {
            gemini: Some(GeminiConfig {
                api_key: String::new(),
                model_name: Some(DEFAULT_CHAT_MODEL.to_string()),
            }),
        };

        let template_json = serde_json::to_string_pretty(&template_config)
            .map_err(|e| std::io::Error::other(e))?;

        std::fs::write(&secret_path, template_json)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&secret_path, permissions)?;
        }

        Ok(secret_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_dir() {
        let config_dir = SparkyPaths::config_dir().unwrap();
        assert!(config_dir.ends_with("sparky"));
    }

    #[test]
    fn test_config_file() {
        let config_file = SparkyPaths::config_file().unwrap();
        assert!(config_file.ends_with("config.toml"));
        let config_dir = SparkyPaths::config_dir().unwrap();
        assert!(config_file.starts_with(&config_dir));
    }

    #[test]
    fn test_secret_file() {
        let secret_file = SparkyPaths::secret_file().unwrap();
        assert!(secret_file.ends_with("secret.json"));
    }

    #[test]
    fn test_state_dir() {
        let state_dir = SparkyPaths::state_dir().unwrap();
        assert!(state_dir.ends_with("state"));
        let config_dir = SparkyPaths::config_dir().unwrap();
        assert!(state_dir.starts_with(&config_dir));
    }

    #[test]
    fn test_logs_dir() {
        let logs_dir = SparkyPaths::logs_dir().unwrap();
        assert!(logs_dir.ends_with("logs"));
    }
}
