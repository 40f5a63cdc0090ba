//! Configuration types for secrets and application settings.

use serde::{Deserialize, Serialize};

pub const DEFAULT_CHAT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_TTS_MODEL: &str = "gemini-2.5-flash-preview-tts";
pub const DEFAULT_TTS_VOICE: &str = "Puck";

/// Root structure for secret.json.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecretConfig {
    #[serde(default)]
    pub gemini: Option<GeminiConfig>,
}

/// Gemini API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    pub api_key: String,
    #[serde(default)]
    pub model_name: Option<String>,
}

/// Application settings loaded from config.toml.
///
/// Every field has a default so a missing file yields a working
/// configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Model used for the streaming chat session.
    #[serde(default = "default_chat_model")]
    pub chat_model: String,
    /// Model used for speech synthesis.
    #[serde(default = "default_tts_model")]
    pub tts_model: String,
    /// Prebuilt voice name for speech synthesis.
    #[serde(default = "default_tts_voice")]
    pub tts_voice: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            chat_model: default_chat_model(),
            tts_model: default_tts_model(),
            tts_voice: default_tts_voice(),
        }
    }
}

fn default_chat_model() -> String {
    DEFAULT_CHAT_MODEL.to_string()
}

fn default_tts_model() -> String {
    DEFAULT_TTS_MODEL.to_string()
}

fn default_tts_voice() -> String {
    DEFAULT_TTS_VOICE.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_yields_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.chat_model, DEFAULT_CHAT_MODEL);
    }

    #[test]
    fn test_partial_toml_overrides_one_field() {
        let config: AppConfig = toml::from_str("chat_model = \"gemini-2.5-pro\"").unwrap();
        assert_eq!(config.chat_model, "gemini-2.5-pro");
        assert_eq!(config.tts_voice, DEFAULT_TTS_VOICE);
    }
}
