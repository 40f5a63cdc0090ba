//! Transcript repository trait.
//!
//! Defines the interface for transcript persistence operations.

use super::transcript::Transcript;
use anyhow::Result;
use async_trait::async_trait;

/// An abstract repository for the persisted conversation transcript.
///
/// This trait defines the contract for persisting and retrieving the single
/// active conversation, decoupling the application's core logic from the
/// specific storage mechanism (e.g., JSON files, a browser-local store).
///
/// The transcript is owned exclusively by the active session; there are no
/// concurrent writers.
#[async_trait]
pub trait TranscriptRepository: Send + Sync {
    /// Loads the persisted transcript.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Transcript))`: A transcript exists
    /// - `Ok(None)`: No transcript has been persisted
    /// - `Err(_)`: Error occurred during retrieval
    async fn load(&self) -> Result<Option<Transcript>>;

    /// Saves the transcript, replacing any previous value.
    async fn save(&self, transcript: &Transcript) -> Result<()>;

    /// Deletes the persisted transcript (no-op if absent).
    async fn clear(&self) -> Result<()>;
}
