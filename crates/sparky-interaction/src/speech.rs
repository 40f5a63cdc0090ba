//! GeminiSpeech - text-to-speech via the Gemini REST API.
//!
//! The TTS model returns base64-encoded 16-bit PCM at 24kHz mono; the
//! backend decodes it into an `AudioClip` ready for any playback sink.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use sparky_core::error::{Result, SparkyError};
use sparky_core::speech::{AudioClip, SpeechBackend};

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

const SAMPLE_RATE: u32 = 24_000;
const CHANNELS: u16 = 1;

/// Speech backend implementation that talks to the Gemini TTS endpoint.
pub struct GeminiSpeech {
    client: Client,
    api_key: String,
    model: String,
    voice: String,
}

impl GeminiSpeech {
    /// Creates a new backend with the provided API key, model, and voice.
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        voice: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            voice: voice.into(),
        }
    }
}

#[async_trait]
impl SpeechBackend for GeminiSpeech {
    async fn synthesize(&self, text: &str) -> Result<AudioClip> {
        let url = format!(
            "{}/{model}:generateContent?key={api_key}",
            BASE_URL,
            model = self.model,
            api_key = self.api_key
        );

        let request = SpeechRequest {
            contents: vec![SpeechContent {
                parts: vec![SpeechPart {
                    text: format!("Say with a professional and helpful tone: {text}"),
                }],
            }],
            generation_config: GenerationConfig {
                response_modalities: vec!["AUDIO".to_string()],
                speech_config: SpeechConfig {
                    voice_config: VoiceConfig {
                        prebuilt_voice_config: PrebuiltVoiceConfig {
                            voice_name: self.voice.clone(),
                        },
                    },
                },
            },
        };

        let response = self
            .client
            .post(url)
            .json(&request)
            .send()
            .await
            .map_err(|err| SparkyError::api(format!("Gemini TTS request failed: {err}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SparkyError::api_with_status(
                status.as_u16(),
                format!("Gemini TTS returned an error: {body}"),
            ));
        }

        let parsed: SpeechResponse = response
            .json()
            .await
            .map_err(|err| SparkyError::api(format!("Failed to parse Gemini TTS response: {err}")))?;

        let base64_audio = extract_audio_data(parsed)
            .ok_or_else(|| SparkyError::api("No audio data received from the TTS endpoint"))?;

        let bytes = BASE64_STANDARD
            .decode(base64_audio)
            .map_err(|err| SparkyError::api(format!("Failed to decode TTS audio: {err}")))?;

        Ok(AudioClip {
            sample_rate: SAMPLE_RATE,
            channels: CHANNELS,
            samples: decode_pcm16(&bytes),
        })
    }
}

/// Reinterprets raw bytes as little-endian signed 16-bit samples.
///
/// A trailing odd byte is dropped.
fn decode_pcm16(bytes: &[u8]) -> Vec<i16> {
    bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect()
}

fn extract_audio_data(response: SpeechResponse) -> Option<String> {
    response
        .candidates
        .and_then(|mut candidates| {
            if candidates.is_empty() {
                None
            } else {
                Some(candidates.remove(0))
            }
        })
        .and_then(|candidate| candidate.content)
        .and_then(|content| {
            content
                .parts
                .into_iter()
                .find_map(|part| part.inline_data.map(|data| data.data))
        })
}

#[derive(Serialize)]
struct SpeechRequest {
    contents: Vec<SpeechContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct SpeechContent {
    parts: Vec<SpeechPart>,
}

#[derive(Serialize)]
struct SpeechPart {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_modalities: Vec<String>,
    speech_config: SpeechConfig,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SpeechConfig {
    voice_config: VoiceConfig,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceConfig {
    prebuilt_voice_config: PrebuiltVoiceConfig,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PrebuiltVoiceConfig {
    voice_name: String,
}

#[derive(Deserialize)]
struct SpeechResponse {
    candidates: Option<Vec<SpeechCandidate>>,
}

#[derive(Deserialize)]
struct SpeechCandidate {
    content: Option<SpeechContentResponse>,
}

#[derive(Deserialize)]
struct SpeechContentResponse {
    #[serde(default)]
    parts: Vec<SpeechPartResponse>,
}

#[derive(Deserialize)]
struct SpeechPartResponse {
    #[serde(rename = "inlineData")]
    inline_data: Option<InlineData>,
}

#[derive(Deserialize)]
struct InlineData {
    data: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_pcm16_little_endian() {
        // 0x0001 and -1 (0xFFFF) in little-endian byte order
        let bytes = [0x01, 0x00, 0xFF, 0xFF];
        assert_eq!(decode_pcm16(&bytes), vec![1, -1]);
    }

    #[test]
    fn test_decode_pcm16_drops_trailing_odd_byte() {
        let bytes = [0x01, 0x00, 0x7F];
        assert_eq!(decode_pcm16(&bytes), vec![1]);
    }

    #[test]
    fn test_extract_audio_data() {
        let json = r#"{"candidates":[{"content":{"parts":[{"inlineData":{"data":"AQA="}}]}}]}"#;
        let response: SpeechResponse = serde_json::from_str(json).unwrap();
        assert_eq!(extract_audio_data(response).as_deref(), Some("AQA="));
    }

    #[test]
    fn test_extract_audio_data_missing_inline_data() {
        let json = r#"{"candidates":[{"content":{"parts":[{"text":"no audio"}]}}]}"#;
        let response: SpeechResponse = serde_json::from_str(json).unwrap();
        assert!(extract_audio_data(response).is_none());
    }

    #[test]
    fn test_request_serializes_camel_case_config() {
        let request = SpeechRequest {
            contents: vec![],
            generation_config: GenerationConfig {
                response_modalities: vec!["AUDIO".to_string()],
                speech_config: SpeechConfig {
                    voice_config: VoiceConfig {
                        prebuilt_voice_config: PrebuiltVoiceConfig {
                            voice_name: "Puck".to_string(),
                        },
                    },
                },
            },
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("responseModalities"));
        assert!(json.contains("prebuiltVoiceConfig"));
        assert!(json.contains("voiceName"));
    }
}
