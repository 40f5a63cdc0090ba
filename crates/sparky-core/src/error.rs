//! Error types for the Sparky application.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire Sparky application.
///
/// This provides typed, structured error variants with automatic conversion
/// from common error types via the `From` trait.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum SparkyError {
    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Data access error (repository/storage layer)
    #[error("Data access error: {0}")]
    DataAccess(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "JSON", "TOML", etc.
        message: String,
    },

    /// Configuration error (missing or invalid config/secret files)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Remote API error, optionally carrying the HTTP status code
    #[error("{message}")]
    Api {
        status_code: Option<u16>,
        message: String,
    },

    /// Error raised while consuming a streamed response
    #[error("Stream error: {0}")]
    Stream(String),

    /// Chat session construction or seeding failure
    #[error("Session error: {0}")]
    Session(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SparkyError {
    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a DataAccess error
    pub fn data_access(message: impl Into<String>) -> Self {
        Self::DataAccess(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Api error without a status code
    pub fn api(message: impl Into<String>) -> Self {
        Self::Api {
            status_code: None,
            message: message.into(),
        }
    }

    /// Creates an Api error with an HTTP status code
    pub fn api_with_status(status_code: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status_code: Some(status_code),
            message: message.into(),
        }
    }

    /// Creates a Stream error
    pub fn stream(message: impl Into<String>) -> Self {
        Self::Stream(message.into())
    }

    /// Creates a Session error
    pub fn session(message: impl Into<String>) -> Self {
        Self::Session(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this is a Config error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Check if this is an Api error
    pub fn is_api(&self) -> bool {
        matches!(self, Self::Api { .. })
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for SparkyError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for SparkyError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for SparkyError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<String> for SparkyError {
    fn from(err: String) -> Self {
        Self::Internal(err)
    }
}

/// A type alias for `Result<T, SparkyError>`.
pub type Result<T> = std::result::Result<T, SparkyError>;
