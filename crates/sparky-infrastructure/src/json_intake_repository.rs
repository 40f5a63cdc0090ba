//! JSON-file-backed IntakeRepository implementation.
//!
//! Two files under the state directory back the two logical records: the
//! accepted intake data and the in-progress draft.

use crate::paths::SparkyPaths;
use crate::storage::AtomicJsonFile;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sparky_core::intake::{IntakeData, IntakeDraft, IntakeRepository};
use std::path::Path;

const INTAKE_FILE: &str = "intake.json";
const DRAFT_FILE: &str = "intake_draft.json";

/// Stores accepted intake data and the form draft as JSON files.
pub struct JsonIntakeRepository {
    accepted: AtomicJsonFile<IntakeData>,
    draft: AtomicJsonFile<IntakeDraft>,
}

impl JsonIntakeRepository {
    /// Creates a repository at the default location (~/.config/sparky/state).
    pub fn default_location() -> Result<Self> {
        let state_dir = SparkyPaths::state_dir()
            .map_err(|e| anyhow::anyhow!("Failed to get state directory: {}", e))?;
        Ok(Self::new(state_dir))
    }

    /// Creates a repository rooted at `state_dir`.
    pub fn new(state_dir: impl AsRef<Path>) -> Self {
        let state_dir = state_dir.as_ref();
        Self {
            accepted: AtomicJsonFile::new(state_dir.join(INTAKE_FILE)),
            draft: AtomicJsonFile::new(state_dir.join(DRAFT_FILE)),
        }
    }
}

#[async_trait]
impl IntakeRepository for JsonIntakeRepository {
    async fn load(&self) -> Result<Option<IntakeData>> {
        self.accepted.load().context("Failed to load intake data")
    }

    async fn save(&self, data: &IntakeData) -> Result<()> {
        self.accepted
            .save(data)
            .context("Failed to save intake data")
    }

    async fn clear(&self) -> Result<()> {
        self.accepted
            .remove()
            .context("Failed to clear intake data")
    }

    async fn load_draft(&self) -> Result<Option<IntakeDraft>> {
        self.draft.load().context("Failed to load intake draft")
    }

    async fn save_draft(&self, draft: &IntakeDraft) -> Result<()> {
        self.draft.save(draft).context("Failed to save intake draft")
    }

    async fn clear_draft(&self) -> Result<()> {
        self.draft.remove().context("Failed to clear intake draft")
    }
}
