//! GeminiChatSession - streaming chat against the Gemini REST API.
//!
//! One session owns the remote-side conversation history and a system
//! instruction. Replies are requested through `streamGenerateContent` with
//! SSE framing; search grounding is enabled so fragments can carry
//! citations.

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use sparky_core::chat::{
    ChatMessage, ChatSession, Citation, FragmentStream, MessageRole, StreamFragment, Transcript,
};
use sparky_core::error::{Result, SparkyError};
use tokio::sync::Mutex;

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Chat session implementation backed by the Gemini HTTP API.
pub struct GeminiChatSession {
    client: Client,
    api_key: String,
    model: String,
    system_instruction: Option<String>,
    history: Mutex<Vec<Content>>,
}

impl GeminiChatSession {
    /// Creates a new session with the provided API key and model.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            system_instruction: None,
            history: Mutex::new(Vec::new()),
        }
    }

    /// Adds a system instruction that is sent alongside every request.
    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    /// Seeds the history with a hidden user-role context message.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.history
            .get_mut()
            .push(Content::user(context.into()));
        self
    }

    /// Replays a persisted transcript into the session history.
    ///
    /// Empty messages (unfinished placeholders) are skipped; the API rejects
    /// contents without parts.
    pub fn with_history(mut self, transcript: &Transcript) -> Self {
        let history = self.history.get_mut();
        history.extend(transcript.messages().iter().filter_map(Content::from_message));
        self
    }

    fn stream_url(&self) -> String {
        format!(
            "{}/{model}:streamGenerateContent?alt=sse&key={api_key}",
            BASE_URL,
            model = self.model,
            api_key = self.api_key
        )
    }
}

#[async_trait]
impl ChatSession for GeminiChatSession {
    async fn send_message_stream(&self, text: &str) -> Result<FragmentStream> {
        let mut contents = self.history.lock().await.clone();
        contents.push(Content::user(text.to_string()));

        let request = GenerateContentRequest {
            contents,
            system_instruction: self.system_instruction.as_ref().map(|text| Content {
                role: "system".to_string(),
                parts: vec![Part {
                    text: text.clone(),
                }],
            }),
            tools: vec![Tool {
                google_search: GoogleSearch {},
            }],
        };

        let response = self
            .client
            .post(self.stream_url())
            .json(&request)
            .send()
            .await
            .map_err(|err| SparkyError::api(format!("Gemini API request failed: {err}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Gemini error body".to_string());
            return Err(map_http_error(status, body_text));
        }

        Ok(sse_fragment_stream(response))
    }

    async fn commit_turn(&self, user_text: &str, model_text: &str) {
        let mut history = self.history.lock().await;
        history.push(Content::user(user_text.to_string()));
        history.push(Content::model(model_text.to_string()));
    }
}

/// Wraps the HTTP response body in a stream of parsed fragments.
///
/// SSE events may split across network chunks, so complete lines are
/// carved out of a carry-over buffer before parsing.
fn sse_fragment_stream(response: reqwest::Response) -> FragmentStream {
    struct State {
        chunks: futures::stream::BoxStream<'static, reqwest::Result<String>>,
        buffer: String,
        failed: bool,
    }

    let state = State {
        chunks: response
            .bytes_stream()
            .map(|chunk| chunk.map(|bytes| String::from_utf8_lossy(&bytes).into_owned()))
            .boxed(),
        buffer: String::new(),
        failed: false,
    };

    Box::pin(futures::stream::unfold(state, |mut state| async move {
        if state.failed {
            return None;
        }

        loop {
            // Drain complete lines already buffered
            while let Some(newline) = state.buffer.find('\n') {
                let line: String = state.buffer.drain(..=newline).collect();
                match parse_sse_line(line.trim_end()) {
                    Ok(Some(fragment)) => return Some((Ok(fragment), state)),
                    Ok(None) => continue,
                    Err(e) => {
                        state.failed = true;
                        return Some((Err(e), state));
                    }
                }
            }

            match state.chunks.next().await {
                Some(Ok(chunk)) => {
                    state.buffer.push_str(&chunk);
                }
                Some(Err(err)) => {
                    state.failed = true;
                    return Some((
                        Err(SparkyError::stream(format!(
                            "Gemini stream transport error: {err}"
                        ))),
                        state,
                    ));
                }
                None => {
                    // End of stream; a final unterminated line is still an event
                    let rest = std::mem::take(&mut state.buffer);
                    state.failed = true;
                    return match parse_sse_line(rest.trim_end()) {
                        Ok(Some(fragment)) => Some((Ok(fragment), state)),
                        Ok(None) => None,
                        Err(e) => Some((Err(e), state)),
                    };
                }
            }
        }
    }))
}

/// Parses one SSE line into a fragment.
///
/// Returns `Ok(None)` for keep-alives, empty lines, and non-data fields.
fn parse_sse_line(line: &str) -> Result<Option<StreamFragment>> {
    let Some(payload) = line.strip_prefix("data:") else {
        return Ok(None);
    };
    let payload = payload.trim();
    if payload.is_empty() {
        return Ok(None);
    }

    let chunk: StreamChunk = serde_json::from_str(payload)
        .map_err(|e| SparkyError::stream(format!("Malformed Gemini stream chunk: {e}")))?;

    Ok(Some(chunk_to_fragment(chunk)))
}

fn chunk_to_fragment(chunk: StreamChunk) -> StreamFragment {
    let mut fragment = StreamFragment::default();

    let Some(candidate) = chunk.candidates.and_then(|mut c| {
        if c.is_empty() {
            None
        } else {
            Some(c.remove(0))
        }
    }) else {
        return fragment;
    };

    if let Some(content) = candidate.content {
        for part in content.parts {
            if let Some(text) = part.text {
                fragment.text.push_str(&text);
            }
        }
    }

    if let Some(metadata) = candidate.grounding_metadata {
        fragment.citations = metadata
            .grounding_chunks
            .into_iter()
            .filter_map(|chunk| chunk.web)
            .map(|web| Citation::new(web.uri, web.title))
            .collect();
    }

    fragment
}

#[derive(Debug, Clone, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Tool>,
}

#[derive(Debug, Clone, Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

impl Content {
    fn user(text: String) -> Self {
        Self {
            role: "user".to_string(),
            parts: vec![Part { text }],
        }
    }

    fn model(text: String) -> Self {
        Self {
            role: "model".to_string(),
            parts: vec![Part { text }],
        }
    }

    fn from_message(message: &ChatMessage) -> Option<Self> {
        if message.text.trim().is_empty() {
            return None;
        }
        Some(match message.role {
            MessageRole::User => Self::user(message.text.clone()),
            MessageRole::Model => Self::model(message.text.clone()),
        })
    }
}

#[derive(Debug, Clone, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Clone, Serialize)]
struct Tool {
    #[serde(rename = "googleSearch")]
    google_search: GoogleSearch,
}

#[derive(Debug, Clone, Serialize)]
struct GoogleSearch {}

#[derive(Deserialize)]
struct StreamChunk {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
    #[serde(rename = "groundingMetadata")]
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct GroundingMetadata {
    #[serde(rename = "groundingChunks", default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Deserialize)]
struct GroundingChunk {
    web: Option<WebSource>,
}

#[derive(Deserialize)]
struct WebSource {
    uri: String,
    #[serde(default)]
    title: String,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

fn map_http_error(status: StatusCode, body: String) -> SparkyError {
    let message = serde_json::from_str::<ErrorWrapper>(&body)
        .map(|wrapper| {
            let status_text = wrapper.error.status.unwrap_or_default();
            let msg = wrapper.error.message.unwrap_or_else(|| body.clone());
            if status_text.is_empty() {
                msg
            } else {
                format!("{status_text}: {msg}")
            }
        })
        .unwrap_or_else(|_| body.clone());

    SparkyError::api_with_status(status.as_u16(), message)
}
