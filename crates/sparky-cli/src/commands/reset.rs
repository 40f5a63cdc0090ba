use anyhow::Result;
use sparky_core::chat::TranscriptRepository;
use sparky_core::intake::IntakeRepository;
use sparky_infrastructure::{JsonIntakeRepository, JsonTranscriptRepository, SparkyPaths};
use std::path::PathBuf;

/// Non-interactive full reset: clears the persisted transcript, the accepted
/// intake data, and the draft.
pub async fn run(state_dir: Option<PathBuf>) -> Result<()> {
    let state_dir = match state_dir {
        Some(dir) => dir,
        None => SparkyPaths::state_dir().map_err(|e| anyhow::anyhow!(e.to_string()))?,
    };

    let transcript_repository = JsonTranscriptRepository::new(&state_dir);
    let intake_repository = JsonIntakeRepository::new(&state_dir);

    transcript_repository.clear().await?;
    intake_repository.clear().await?;
    intake_repository.clear_draft().await?;

    println!("Conversation, intake data, and draft cleared.");
    Ok(())
}
