//! Remote model integration for Sparky.
//!
//! Implements the core `ChatSession`, `SessionFactory`, and `SpeechBackend`
//! traits against the Gemini REST API: a streaming chat session with search
//! grounding, and a text-to-speech client.

pub mod factory;
pub mod gemini_chat;
pub mod prompts;
pub mod speech;

pub use factory::GeminiSessionFactory;
pub use gemini_chat::GeminiChatSession;
pub use speech::GeminiSpeech;
