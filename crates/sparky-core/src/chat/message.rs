//! Conversation message types.
//!
//! This module contains types for representing messages in a conversation,
//! including roles, grounding citations, and message content.

use serde::{Deserialize, Serialize};

/// Represents the author of a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Message from the user.
    User,
    /// Message from the AI model.
    Model,
}

/// A source the model grounded part of its answer in.
///
/// Citations are deduplicated by `url`; the title from the first occurrence
/// of a url wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    /// Source URL.
    pub url: String,
    /// Human-readable page title (may be empty).
    pub title: String,
}

impl Citation {
    /// Creates a new citation.
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
        }
    }
}

/// A single message in a conversation.
///
/// Messages are immutable once finalized; the only mutation the transcript
/// ever performs is replacing its last element while a model reply is
/// streaming in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// The role of the message author.
    pub role: MessageRole,
    /// The content of the message.
    pub text: String,
    /// Grounding citations attached to the message, in first-appearance order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub citations: Vec<Citation>,
    /// Timestamp when the message was created (ISO 8601 format).
    pub timestamp: String,
}

impl ChatMessage {
    /// Creates a user message with the current timestamp.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            text: text.into(),
            citations: Vec::new(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Creates a finalized model message with the current timestamp.
    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Model,
            text: text.into(),
            citations: Vec::new(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Creates an empty model message used as the placeholder while a
    /// reply is streaming in.
    pub fn placeholder() -> Self {
        Self::model("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serializes_lowercase() {
        let message = ChatMessage::user("hi");
        let json = serde_json::to_string(&message).unwrap();
        assert!(json.contains("\"role\":\"user\""));
    }

    #[test]
    fn test_empty_citations_are_omitted() {
        let message = ChatMessage::model("hello");
        let json = serde_json::to_string(&message).unwrap();
        assert!(!json.contains("citations"));
    }

    #[test]
    fn test_citations_round_trip() {
        let mut message = ChatMessage::model("grounded");
        message.citations.push(Citation::new("https://a.example", "A"));
        let json = serde_json::to_string(&message).unwrap();
        let back: ChatMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(back, message);
    }
}
