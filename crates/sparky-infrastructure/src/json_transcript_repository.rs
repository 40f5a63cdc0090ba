//! JSON-file-backed TranscriptRepository implementation.

use crate::paths::SparkyPaths;
use crate::storage::AtomicJsonFile;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sparky_core::chat::{Transcript, TranscriptRepository};
use std::path::Path;

const TRANSCRIPT_FILE: &str = "transcript.json";

/// Stores the conversation transcript as a single JSON array file.
pub struct JsonTranscriptRepository {
    file: AtomicJsonFile<Transcript>,
}

impl JsonTranscriptRepository {
    /// Creates a repository at the default location (~/.config/sparky/state).
    pub fn default_location() -> Result<Self> {
        let state_dir = SparkyPaths::state_dir()
            .map_err(|e| anyhow::anyhow!("Failed to get state directory: {}", e))?;
        Ok(Self::new(state_dir))
    }

    /// Creates a repository rooted at `state_dir`.
    pub fn new(state_dir: impl AsRef<Path>) -> Self {
        Self {
            file: AtomicJsonFile::new(state_dir.as_ref().join(TRANSCRIPT_FILE)),
        }
    }
}

#[async_trait]
impl TranscriptRepository for JsonTranscriptRepository {
    async fn load(&self) -> Result<Option<Transcript>> {
        self.file.load().context("Failed to load transcript")
    }

    async fn save(&self, transcript: &Transcript) -> Result<()> {
        self.file
            .save(transcript)
            .context("Failed to save transcript")
    }

    async fn clear(&self) -> Result<()> {
        self.file.remove().context("Failed to clear transcript")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sparky_core::chat::ChatMessage;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_save_and_load_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let repository = JsonTranscriptRepository::new(temp_dir.path());

        let mut transcript = Transcript::new();
        transcript.push(ChatMessage::user("Hello"));
        transcript.push(ChatMessage::model("Hi there!"));

        repository.save(&transcript).await.unwrap();

        let loaded = repository.load().await.unwrap().unwrap();
        assert_eq!(loaded, transcript);
    }

    #[tokio::test]
    async fn test_load_when_absent_returns_none() {
        let temp_dir = TempDir::new().unwrap();
        let repository = JsonTranscriptRepository::new(temp_dir.path());

        assert!(repository.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_clear_removes_transcript() {
        let temp_dir = TempDir::new().unwrap();
        let repository = JsonTranscriptRepository::new(temp_dir.path());

        let mut transcript = Transcript::new();
        transcript.push(ChatMessage::user("Hello"));
        repository.save(&transcript).await.unwrap();

        repository.clear().await.unwrap();
        assert!(repository.load().await.unwrap().is_none());

        // Clearing an already-empty store is fine
        repository.clear().await.unwrap();
    }

    #[tokio::test]
    async fn test_save_replaces_previous_value() {
        let temp_dir = TempDir::new().unwrap();
        let repository = JsonTranscriptRepository::new(temp_dir.path());

        let mut first = Transcript::new();
        first.push(ChatMessage::user("one"));
        repository.save(&first).await.unwrap();

        let mut second = Transcript::new();
        second.push(ChatMessage::user("one"));
        second.push(ChatMessage::model("two"));
        repository.save(&second).await.unwrap();

        let loaded = repository.load().await.unwrap().unwrap();
        assert_eq!(loaded.len(), 2);
    }
}
