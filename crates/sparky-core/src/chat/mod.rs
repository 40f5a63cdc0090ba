//! Chat domain module.
//!
//! This module contains the conversation domain models, the streaming
//! response accumulator, and the seams to the remote model and to
//! transcript persistence.
//!
//! # Module Structure
//!
//! - `message`: Message types (`MessageRole`, `Citation`, `ChatMessage`)
//! - `transcript`: Append-only conversation history (`Transcript`)
//! - `stream`: Streamed fragment types and the accumulator reducer
//! - `session`: Remote chat session traits (`ChatSession`, `SessionFactory`)
//! - `repository`: Repository trait for transcript persistence

mod message;
mod repository;
mod session;
mod stream;
mod transcript;

// Re-export public API
pub use message::{ChatMessage, Citation, MessageRole};
pub use repository::TranscriptRepository;
pub use session::{ChatSession, FragmentStream, SessionFactory};
pub use stream::{FinalizedReply, StreamAccumulator, StreamFragment, SENTINEL};
pub use transcript::Transcript;
