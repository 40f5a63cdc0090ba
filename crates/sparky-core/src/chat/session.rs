//! Remote chat session traits.
//!
//! The remote model is opaque to the rest of the system: the only
//! assumptions are that streamed fragments arrive in order, the end of the
//! stream signals completion, and errors surface as failed items or a failed
//! call. Implementations live in the interaction crate; tests use scripted
//! mocks.

use super::stream::StreamFragment;
use super::transcript::Transcript;
use crate::error::Result;
use crate::intake::IntakeData;
use async_trait::async_trait;
use futures::stream::BoxStream;
use std::sync::Arc;

/// An ordered stream of reply fragments for one model turn.
pub type FragmentStream = BoxStream<'static, Result<StreamFragment>>;

/// An open conversation handle against the remote model.
///
/// A session owns the remote-side history. The handle lives for one
/// resumed-or-fresh conversation; a full reset constructs a new session
/// rather than mutating this one.
#[async_trait]
pub trait ChatSession: Send + Sync {
    /// Requests a streamed reply to `text` given the session history.
    ///
    /// Only one stream may be in flight per session; the caller gates new
    /// input until the current stream settles.
    async fn send_message_stream(&self, text: &str) -> Result<FragmentStream>;

    /// Records a settled exchange into the session history.
    ///
    /// Called only after a stream completed successfully, so a failed stream
    /// leaves the remote history unchanged.
    async fn commit_turn(&self, user_text: &str, model_text: &str);
}

/// Builds a chat session seeded with intake context and prior history.
#[async_trait]
pub trait SessionFactory: Send + Sync {
    /// Creates a session for the given client context.
    ///
    /// `history` is the persisted transcript to replay into the remote
    /// session; it is empty for a fresh conversation.
    async fn create(
        &self,
        intake: &IntakeData,
        history: &Transcript,
    ) -> Result<Arc<dyn ChatSession>>;
}
