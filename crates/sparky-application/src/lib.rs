//! Application services for Sparky.
//!
//! Orchestrates the domain core against the repositories and the remote
//! model: session bootstrapping, the streaming chat loop, the lead capture
//! gate, flow navigation, and speech playback.

pub mod chat_service;
pub mod events;
pub mod speech_service;

pub use chat_service::{ChatService, EntryPoint, FormOutcome};
pub use events::{EventBus, UiEvent};
pub use speech_service::{AudioSink, NullSink, SpeechService};
