//! Builds seeded Gemini chat sessions.

use crate::gemini_chat::GeminiChatSession;
use crate::prompts;
use async_trait::async_trait;
use sparky_core::chat::{ChatSession, SessionFactory, Transcript};
use sparky_core::config::AppConfig;
use sparky_core::error::{Result, SparkyError};
use sparky_core::intake::IntakeData;
use sparky_core::secret::SecretService;
use std::sync::Arc;

/// Session factory backed by the Gemini API.
///
/// A new session object is constructed for every resumed-or-fresh
/// conversation; existing sessions are never reconfigured in place.
pub struct GeminiSessionFactory {
    secret_service: Arc<dyn SecretService>,
    config: AppConfig,
}

impl GeminiSessionFactory {
    /// Creates a factory reading credentials from the given secret service.
    pub fn new(secret_service: Arc<dyn SecretService>, config: AppConfig) -> Self {
        Self {
            secret_service,
            config,
        }
    }

    /// Creates a factory reading the default secret.json location, creating
    /// a template file when missing.
    pub fn default_location(config: AppConfig) -> Result<Self> {
        let service = sparky_infrastructure::SecretServiceImpl::default_location()?;
        Ok(Self::new(Arc::new(service), config))
    }
}

#[async_trait]
impl SessionFactory for GeminiSessionFactory {
    async fn create(
        &self,
        intake: &IntakeData,
        history: &Transcript,
    ) -> Result<Arc<dyn ChatSession>> {
        let secrets = self.secret_service.load_secrets().await?;

        let gemini = secrets
            .gemini
            .ok_or_else(|| SparkyError::session("Gemini configuration not found in secret.json"))?;

        if gemini.api_key.trim().is_empty() {
            return Err(SparkyError::session(
                "Gemini API key is empty; fill in secret.json",
            ));
        }

        let model = gemini
            .model_name
            .unwrap_or_else(|| self.config.chat_model.clone());

        let context = prompts::intake_context(intake)?;

        tracing::debug!(model = %model, "Creating Gemini chat session");

        let session = GeminiChatSession::new(gemini.api_key, model)
            .with_system_instruction(prompts::SYSTEM_PROMPT)
            .with_context(context)
            .with_history(history);

        Ok(Arc::new(session))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sparky_core::config::{GeminiConfig, SecretConfig};

    struct FixedSecrets(SecretConfig);

    #[async_trait]
    impl SecretService for FixedSecrets {
        async fn load_secrets(&self) -> Result<SecretConfig> {
            Ok(self.0.clone())
        }

        async fn secret_file_exists(&self) -> bool {
            true
        }
    }

    fn intake() -> IntakeData {
        IntakeData {
            full_name: "Jane Doe".to_string(),
            job_title: "Founder".to_string(),
            industry: "tech".to_string(),
            experience: "3-5".to_string(),
            project_idea: "AI scheduling tool".to_string(),
            goal: "Launch a New Product".to_string(),
            budget: "$5k - $15k".to_string(),
        }
    }

    #[tokio::test]
    async fn test_missing_gemini_config_is_a_session_error() {
        let factory = GeminiSessionFactory::new(
            Arc::new(FixedSecrets(SecretConfig::default())),
            AppConfig::default(),
        );

        let error = match factory.create(&intake(), &Transcript::new()).await {
            Ok(_) => panic!("expected an error"),
            Err(e) => e,
        };
        assert!(matches!(error, SparkyError::Session(_)));
    }

    #[tokio::test]
    async fn test_empty_api_key_is_a_session_error() {
        let secrets = SecretConfig {
            gemini: Some(GeminiConfig {
                api_key: "  ".to_string(),
                model_name: None,
            }),
        };
        let factory =
            GeminiSessionFactory::new(Arc::new(FixedSecrets(secrets)), AppConfig::default());

        let error = match factory.create(&intake(), &Transcript::new()).await {
            Ok(_) => panic!("expected an error"),
            Err(e) => e,
        };
        assert!(matches!(error, SparkyError::Session(_)));
    }

    #[tokio::test]
    async fn test_valid_config_builds_a_session() {
        let secrets = SecretConfig {
            gemini: Some(GeminiConfig {
                api_key: "test-key".to_string(),
                model_name: None,
            }),
        };
        let factory =
            GeminiSessionFactory::new(Arc::new(FixedSecrets(secrets)), AppConfig::default());

        assert!(factory.create(&intake(), &Transcript::new()).await.is_ok());
    }
}
