//! UI event publishing.
//!
//! Services publish every observable state change to a broadcast channel;
//! the shell renders exclusively from these events so it never needs to
//! poll service internals.

use sparky_core::chat::ChatMessage;
use sparky_core::flow::FlowState;
use tokio::sync::broadcast;

const CHANNEL_CAPACITY: usize = 256;

/// High-level events published while a session is running.
#[derive(Debug, Clone)]
pub enum UiEvent {
    /// The active flow state changed.
    FlowChanged(FlowState),
    /// A streaming call started or settled; input is gated while `true`.
    LoadingChanged(bool),
    /// A message was appended to the transcript.
    MessageAppended { index: usize, message: ChatMessage },
    /// The message at `index` was replaced in place (streaming snapshot,
    /// finalization, or error replacement).
    MessageUpdated { index: usize, message: ChatMessage },
    /// The transcript was cleared by a full reset.
    TranscriptCleared,
    /// Speech playback started or stopped.
    PlaybackChanged(bool),
}

/// Shared broadcast bus for `UiEvent`s.
///
/// Publishing never blocks and never fails: events published with no
/// subscriber are simply dropped.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<UiEvent>,
}

impl EventBus {
    /// Creates a new event bus.
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Subscribes to all future events.
    pub fn subscribe(&self) -> broadcast::Receiver<UiEvent> {
        self.sender.subscribe()
    }

    /// Publishes an event to all current subscribers.
    pub fn publish(&self, event: UiEvent) {
        let _ = self.sender.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
