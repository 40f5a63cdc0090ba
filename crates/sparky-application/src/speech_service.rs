//! Speech playback management.
//!
//! Wraps a `SpeechBackend` and an output sink: one playback at a time,
//! stoppable mid-flight. Synthesis and playback failures reset the playback
//! state silently and never touch the transcript.

use crate::events::{EventBus, UiEvent};
use async_trait::async_trait;
use sparky_core::error::Result;
use sparky_core::speech::{AudioClip, SpeechBackend};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Plays decoded audio until the clip ends or the token is cancelled.
#[async_trait]
pub trait AudioSink: Send + Sync {
    async fn play(&self, clip: AudioClip, cancel: CancellationToken) -> Result<()>;
}

/// Sink that discards audio immediately; used where no device is available.
pub struct NullSink;

#[async_trait]
impl AudioSink for NullSink {
    async fn play(&self, _clip: AudioClip, _cancel: CancellationToken) -> Result<()> {
        Ok(())
    }
}

struct Playback {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

/// Reads finalized messages aloud.
pub struct SpeechService {
    backend: Arc<dyn SpeechBackend>,
    sink: Arc<dyn AudioSink>,
    playback: Mutex<Option<Playback>>,
    events: EventBus,
}

impl SpeechService {
    /// Creates a new speech service.
    pub fn new(backend: Arc<dyn SpeechBackend>, sink: Arc<dyn AudioSink>, events: EventBus) -> Self {
        Self {
            backend,
            sink,
            playback: Mutex::new(None),
            events,
        }
    }

    /// Returns `true` while audio is playing.
    pub async fn is_playing(&self) -> bool {
        match &*self.playback.lock().await {
            Some(playback) => !playback.task.is_finished(),
            None => false,
        }
    }

    /// Synthesizes `text` and starts playback, stopping any prior playback
    /// first.
    ///
    /// A synthesis failure is logged and leaves the state as "not playing".
    pub async fn speak(self: &Arc<Self>, text: &str) {
        self.stop().await;

        let clip = match self.backend.synthesize(text).await {
            Ok(clip) => clip,
            Err(e) => {
                tracing::warn!("Speech synthesis failed: {e}");
                return;
            }
        };

        let cancel = CancellationToken::new();
        self.events.publish(UiEvent::PlaybackChanged(true));

        let service = Arc::clone(self);
        let token = cancel.clone();
        let task = tokio::spawn(async move {
            if let Err(e) = service.sink.play(clip, token).await {
                tracing::warn!("Audio playback failed: {e}");
            }
            service.events.publish(UiEvent::PlaybackChanged(false));
        });

        *self.playback.lock().await = Some(Playback { cancel, task });
    }

    /// Stops the current playback, if any.
    pub async fn stop(&self) {
        let playback = self.playback.lock().await.take();
        if let Some(playback) = playback {
            playback.cancel.cancel();
            let _ = playback.task.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sparky_core::error::SparkyError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn clip() -> AudioClip {
        AudioClip {
            sample_rate: 24_000,
            channels: 1,
            samples: vec![0; 240],
        }
    }

    struct FixedBackend;

    #[async_trait]
    impl SpeechBackend for FixedBackend {
        async fn synthesize(&self, _text: &str) -> Result<AudioClip> {
            Ok(clip())
        }
    }

    struct FailingBackend;

    #[async_trait]
    impl SpeechBackend for FailingBackend {
        async fn synthesize(&self, _text: &str) -> Result<AudioClip> {
            Err(SparkyError::api("synthesis unavailable"))
        }
    }

    /// Sink that plays until cancelled, counting how often it was started.
    struct BlockingSink {
        starts: AtomicUsize,
    }

    impl BlockingSink {
        fn new() -> Self {
            Self {
                starts: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl AudioSink for BlockingSink {
        async fn play(&self, _clip: AudioClip, cancel: CancellationToken) -> Result<()> {
            self.starts.fetch_add(1, Ordering::SeqCst);
            cancel.cancelled().await;
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_speak_then_stop() {
        let service = Arc::new(SpeechService::new(
            Arc::new(FixedBackend),
            Arc::new(BlockingSink::new()),
            EventBus::new(),
        ));

        service.speak("hello").await;
        assert!(service.is_playing().await);

        service.stop().await;
        assert!(!service.is_playing().await);
    }

    #[tokio::test]
    async fn test_synthesis_failure_leaves_not_playing() {
        let service = Arc::new(SpeechService::new(
            Arc::new(FailingBackend),
            Arc::new(BlockingSink::new()),
            EventBus::new(),
        ));

        service.speak("hello").await;
        assert!(!service.is_playing().await);
    }

    #[tokio::test]
    async fn test_new_speak_stops_previous_playback() {
        let sink = Arc::new(BlockingSink::new());
        let service = Arc::new(SpeechService::new(
            Arc::new(FixedBackend),
            sink.clone(),
            EventBus::new(),
        ));

        service.speak("first").await;
        service.speak("second").await;

        assert!(service.is_playing().await);
        assert_eq!(sink.starts.load(Ordering::SeqCst), 2);

        service.stop().await;
        assert!(!service.is_playing().await);
    }

    #[tokio::test]
    async fn test_stop_without_playback_is_a_no_op() {
        let service = Arc::new(SpeechService::new(
            Arc::new(FixedBackend),
            Arc::new(BlockingSink::new()),
            EventBus::new(),
        ));
        service.stop().await;
        assert!(!service.is_playing().await);
    }
}
