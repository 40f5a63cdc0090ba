//! Intake repository trait.

use super::model::{IntakeData, IntakeDraft};
use anyhow::Result;
use async_trait::async_trait;

/// An abstract repository for intake persistence.
///
/// Two logical records are managed: the accepted intake data (written once
/// on submit, cleared only by a full reset) and the in-progress draft
/// (rewritten on every form change, cleared on successful submit or
/// explicit clear).
#[async_trait]
pub trait IntakeRepository: Send + Sync {
    /// Loads the accepted intake record, if one exists.
    async fn load(&self) -> Result<Option<IntakeData>>;

    /// Saves the accepted intake record.
    async fn save(&self, data: &IntakeData) -> Result<()>;

    /// Deletes the accepted intake record (no-op if absent).
    async fn clear(&self) -> Result<()>;

    /// Loads the in-progress draft, if one exists.
    async fn load_draft(&self) -> Result<Option<IntakeDraft>>;

    /// Saves the in-progress draft, replacing any previous value.
    async fn save_draft(&self, draft: &IntakeDraft) -> Result<()>;

    /// Deletes the in-progress draft (no-op if absent).
    async fn clear_draft(&self) -> Result<()>;
}
