//! Text-to-speech seam.

use crate::error::Result;
use async_trait::async_trait;

/// Decoded speech audio for one message.
///
/// The synthesis endpoint returns 16-bit PCM, mono, 24kHz; the clip keeps
/// the raw samples so playback backends can feed them to any sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    /// Samples per second (24000 for the Gemini TTS endpoint).
    pub sample_rate: u32,
    /// Channel count (1 = mono).
    pub channels: u16,
    /// Interleaved signed 16-bit samples.
    pub samples: Vec<i16>,
}

impl AudioClip {
    /// Returns the playback duration in seconds.
    pub fn duration_secs(&self) -> f32 {
        if self.sample_rate == 0 || self.channels == 0 {
            return 0.0;
        }
        let frames = self.samples.len() / self.channels as usize;
        frames as f32 / self.sample_rate as f32
    }
}

/// Synthesizes finalized message text into playable audio.
#[async_trait]
pub trait SpeechBackend: Send + Sync {
    /// Synthesizes `text` into an audio clip.
    async fn synthesize(&self, text: &str) -> Result<AudioClip>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_mono() {
        let clip = AudioClip {
            sample_rate: 24_000,
            channels: 1,
            samples: vec![0; 48_000],
        };
        assert!((clip.duration_secs() - 2.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_duration_degenerate_clip_is_zero() {
        let clip = AudioClip {
            sample_rate: 0,
            channels: 1,
            samples: vec![0; 100],
        };
        assert_eq!(clip.duration_secs(), 0.0);
    }
}
