//! Append-only conversation history.

use super::message::ChatMessage;
use serde::{Deserialize, Serialize};

/// The ordered sequence of messages for one conversation.
///
/// A transcript is never reordered: it is only appended to, or has its last
/// element replaced while a model reply is streaming in. It serializes as a
/// plain JSON array of messages, which is also its persisted shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
}

impl Transcript {
    /// Creates an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message to the end of the transcript.
    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    /// Replaces the last message in place.
    ///
    /// Returns `false` if the transcript is empty; the caller is expected to
    /// have appended a placeholder before streaming into it.
    pub fn replace_last(&mut self, message: ChatMessage) -> bool {
        match self.messages.last_mut() {
            Some(last) => {
                *last = message;
                true
            }
            None => false,
        }
    }

    /// Returns the last message, if any.
    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    /// Returns all messages in conversation order.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Returns the number of messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns `true` if the transcript holds no messages.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl From<Vec<ChatMessage>> for Transcript {
    fn from(messages: Vec<ChatMessage>) -> Self {
        Self { messages }
    }
}
