//! Chat session orchestration.
//!
//! `ChatService` owns the conversation for the lifetime of the process: it
//! bootstraps (resume or fresh), runs streaming replies into the transcript,
//! gates input while a stream is in flight, detects the lead-form sentinel,
//! accepts the lead, and drives flow navigation and the full reset.

use crate::events::{EventBus, UiEvent};
use anyhow::Result;
use futures::StreamExt;
use sparky_core::chat::{
    ChatMessage, ChatSession, FinalizedReply, SessionFactory, StreamAccumulator, Transcript,
    TranscriptRepository,
};
use sparky_core::flow::{FlowState, NavTarget};
use sparky_core::intake::{IntakeData, IntakeDraft, IntakeRepository};
use sparky_core::lead::{Lead, CONFIRMATION};
use sparky_interaction::prompts::INTRO_PROMPT;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Synthetic model message shown when the session cannot be constructed or
/// seeded.
pub const BOOTSTRAP_ERROR_MESSAGE: &str = "Sorry, I'm having trouble connecting to my brain right now. Please check the API key configuration and reload.";

/// Replacement model message shown when a stream fails mid-flight.
pub const STREAM_ERROR_MESSAGE: &str = "I encountered an error. Please try again.";

/// Where the application was entered from.
///
/// Decides where a bootstrap without intake data lands: the site shell shows
/// the landing page first, the chat surface goes straight to the intake
/// form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryPoint {
    /// Entering through the marketing site shell.
    Site,
    /// Entering directly into the chat surface.
    Chat,
}

/// Result of submitting a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormOutcome {
    /// The record was accepted.
    Accepted,
    /// Required fields are missing; submission was blocked.
    Invalid(Vec<&'static str>),
}

/// Orchestrates one conversation against the remote model.
///
/// All state mutation happens through `&self` behind async locks; the
/// transcript's last element is always replaced atomically within one write
/// lock.
pub struct ChatService {
    transcript: RwLock<Transcript>,
    flow: RwLock<FlowState>,
    is_loading: RwLock<bool>,
    session: RwLock<Option<Arc<dyn ChatSession>>>,
    factory: Arc<dyn SessionFactory>,
    transcript_repository: Arc<dyn TranscriptRepository>,
    intake_repository: Arc<dyn IntakeRepository>,
    events: EventBus,
}

impl ChatService {
    /// Creates a new service; call [`ChatService::bootstrap`] before use.
    pub fn new(
        factory: Arc<dyn SessionFactory>,
        transcript_repository: Arc<dyn TranscriptRepository>,
        intake_repository: Arc<dyn IntakeRepository>,
        events: EventBus,
    ) -> Self {
        Self {
            transcript: RwLock::new(Transcript::new()),
            flow: RwLock::new(FlowState::Loading),
            is_loading: RwLock::new(false),
            session: RwLock::new(None),
            factory,
            transcript_repository,
            intake_repository,
            events,
        }
    }

    /// Returns the event bus services publish to.
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Returns the current flow state.
    pub async fn flow_state(&self) -> FlowState {
        self.flow.read().await.clone()
    }

    /// Returns a snapshot of the transcript.
    pub async fn transcript(&self) -> Transcript {
        self.transcript.read().await.clone()
    }

    /// Returns `true` while a streaming call is in flight.
    pub async fn is_loading(&self) -> bool {
        *self.is_loading.read().await
    }

    /// Decides whether to resume a prior conversation or start fresh.
    ///
    /// With no accepted intake data the flow lands on the intake form (or
    /// the landing page for the site shell). With intake data a session is
    /// constructed and seeded; a persisted transcript is loaded without
    /// contacting the remote service, otherwise one introduce-yourself
    /// request is streamed as the first model message.
    pub async fn bootstrap(&self, entry: EntryPoint) -> Result<()> {
        let intake = match self.intake_repository.load().await {
            Ok(intake) => intake,
            Err(e) => {
                tracing::warn!("Failed to read intake data, treating as absent: {e}");
                None
            }
        };

        match intake {
            None => {
                let landing = match entry {
                    EntryPoint::Site => FlowState::Landing,
                    EntryPoint::Chat => FlowState::Intake,
                };
                self.set_flow(landing).await;
            }
            Some(data) => self.start_session(&data).await,
        }

        Ok(())
    }

    /// Submits the intake form, starting a fresh conversation on success.
    pub async fn submit_intake(&self, data: IntakeData) -> Result<FormOutcome> {
        let missing = data.validate();
        if !missing.is_empty() {
            return Ok(FormOutcome::Invalid(missing));
        }

        self.intake_repository.save(&data).await?;
        if let Err(e) = self.intake_repository.clear_draft().await {
            tracing::warn!("Failed to clear intake draft: {e}");
        }

        // A new intake record starts a new conversation
        self.transcript_repository.clear().await?;
        *self.transcript.write().await = Transcript::new();
        self.events.publish(UiEvent::TranscriptCleared);

        self.start_session(&data).await;
        Ok(FormOutcome::Accepted)
    }

    /// Sends a user message and streams the reply into the transcript.
    ///
    /// Returns `Ok(false)` when the input was ignored: empty text, a stream
    /// already in flight, or a flow state that does not accept chat input.
    pub async fn send_message(&self, text: &str) -> Result<bool> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(false);
        }
        if *self.is_loading.read().await {
            return Ok(false);
        }
        if !self.flow.read().await.accepts_chat_input() {
            return Ok(false);
        }
        let session = match self.session.read().await.clone() {
            Some(session) => session,
            None => return Ok(false),
        };

        self.append_message(ChatMessage::user(text), true).await;
        self.stream_reply(&session, text, STREAM_ERROR_MESSAGE).await;
        Ok(true)
    }

    /// Submits the lead form.
    ///
    /// Only valid while the flow is `Qualifying`; appends the fixed
    /// confirmation message and moves to `Qualified`.
    pub async fn submit_lead(&self, lead: Lead) -> Result<FormOutcome> {
        if !matches!(*self.flow.read().await, FlowState::Qualifying) {
            anyhow::bail!("Lead form is not open");
        }

        let missing = lead.validate();
        if !missing.is_empty() {
            return Ok(FormOutcome::Invalid(missing));
        }

        self.append_message(ChatMessage::model(CONFIRMATION), true)
            .await;
        self.set_flow(FlowState::Qualified { lead }).await;
        Ok(FormOutcome::Accepted)
    }

    /// Applies a navigation request; unmet preconditions are a no-op.
    pub async fn navigate(&self, target: NavTarget) -> FlowState {
        let has_intake = self
            .intake_repository
            .load()
            .await
            .ok()
            .flatten()
            .is_some();

        let current = self.flow.read().await.clone();
        let next = current.navigate(target, has_intake);
        if next != current {
            self.set_flow(next.clone()).await;
        }
        next
    }

    /// Full reset: clears the persisted transcript, intake data, and draft,
    /// then restarts the bootstrapper (which lands on the intake form).
    pub async fn reset(&self) -> Result<()> {
        self.set_flow(FlowState::Loading).await;

        self.transcript_repository.clear().await?;
        self.intake_repository.clear().await?;
        if let Err(e) = self.intake_repository.clear_draft().await {
            tracing::warn!("Failed to clear intake draft: {e}");
        }

        *self.session.write().await = None;
        *self.transcript.write().await = Transcript::new();
        self.events.publish(UiEvent::TranscriptCleared);

        self.bootstrap(EntryPoint::Chat).await
    }

    /// Loads the in-progress intake draft.
    pub async fn load_draft(&self) -> Result<Option<IntakeDraft>> {
        self.intake_repository.load_draft().await
    }

    /// Saves the in-progress intake draft.
    pub async fn save_draft(&self, draft: &IntakeDraft) -> Result<()> {
        self.intake_repository.save_draft(draft).await
    }

    /// Clears the in-progress intake draft.
    pub async fn clear_draft(&self) -> Result<()> {
        self.intake_repository.clear_draft().await
    }

    /// Constructs a session for `intake` and enters the chat surface.
    ///
    /// Failures surface as a single synthetic model message; the flow is not
    /// advanced past what already committed.
    async fn start_session(&self, intake: &IntakeData) {
        let persisted = match self.transcript_repository.load().await {
            Ok(transcript) => transcript,
            Err(e) => {
                tracing::warn!("Failed to read persisted transcript: {e}");
                None
            }
        };
        let history = persisted.unwrap_or_default();

        let session = match self.factory.create(intake, &history).await {
            Ok(session) => session,
            Err(e) => {
                tracing::error!("Failed to initialize chat session: {e}");
                // Not persisted: the conversation never opened
                self.append_message(ChatMessage::model(BOOTSTRAP_ERROR_MESSAGE), false)
                    .await;
                return;
            }
        };

        *self.session.write().await = Some(session.clone());

        if !history.is_empty() {
            // Resume: show the persisted conversation without any remote call
            *self.transcript.write().await = history;
            self.set_flow(FlowState::Chatting).await;
            return;
        }

        // Enter the chat surface first so the shell can show a loading
        // affordance while the greeting streams in
        self.set_flow(FlowState::Chatting).await;
        self.stream_reply(&session, INTRO_PROMPT, BOOTSTRAP_ERROR_MESSAGE)
            .await;
    }

    /// Runs one streaming reply into a placeholder at the end of the
    /// transcript.
    ///
    /// Exactly one placeholder exists for the duration of the call; every
    /// fragment republishes and re-persists the growing message. A failure
    /// replaces the placeholder with `failure_text` and discards partial
    /// text. The turn is committed to the session history only on success.
    async fn stream_reply(
        &self,
        session: &Arc<dyn ChatSession>,
        prompt: &str,
        failure_text: &str,
    ) {
        self.set_loading(true).await;
        self.append_message(ChatMessage::placeholder(), true).await;

        let mut accumulator = StreamAccumulator::new();

        let outcome: Option<FinalizedReply> = match session.send_message_stream(prompt).await {
            Ok(mut stream) => {
                let mut failed = false;
                while let Some(item) = stream.next().await {
                    match item {
                        Ok(fragment) => {
                            let snapshot = accumulator.apply(&fragment);
                            self.replace_last(snapshot, true).await;
                        }
                        Err(e) => {
                            tracing::error!("Stream failed mid-flight: {e}");
                            failed = true;
                            break;
                        }
                    }
                }
                if failed {
                    None
                } else {
                    Some(accumulator.finalize())
                }
            }
            Err(e) => {
                tracing::error!("Failed to start stream: {e}");
                None
            }
        };

        match outcome {
            Some(reply) => {
                self.replace_last(reply.message.clone(), true).await;
                session.commit_turn(prompt, &reply.message.text).await;
                if reply.lead_form_requested {
                    self.set_flow(FlowState::Qualifying).await;
                }
            }
            None => {
                self.replace_last(ChatMessage::model(failure_text), true)
                    .await;
            }
        }

        self.set_loading(false).await;
    }

    async fn append_message(&self, message: ChatMessage, persist: bool) {
        let index = {
            let mut transcript = self.transcript.write().await;
            transcript.push(message.clone());
            transcript.len() - 1
        };
        self.events
            .publish(UiEvent::MessageAppended { index, message });
        if persist {
            self.persist_transcript().await;
        }
    }

    async fn replace_last(&self, message: ChatMessage, persist: bool) {
        let index = {
            let mut transcript = self.transcript.write().await;
            if !transcript.replace_last(message.clone()) {
                tracing::warn!("Attempted to replace the last message of an empty transcript");
                return;
            }
            transcript.len() - 1
        };
        self.events
            .publish(UiEvent::MessageUpdated { index, message });
        if persist {
            self.persist_transcript().await;
        }
    }

    /// Transcript writes are fire-and-forget: a failed save is logged, not
    /// surfaced, and the next mutation retries with the full value.
    async fn persist_transcript(&self) {
        let snapshot = self.transcript.read().await.clone();
        if let Err(e) = self.transcript_repository.save(&snapshot).await {
            tracing::warn!("Failed to persist transcript: {e}");
        }
    }

    async fn set_flow(&self, state: FlowState) {
        *self.flow.write().await = state.clone();
        self.events.publish(UiEvent::FlowChanged(state));
    }

    async fn set_loading(&self, loading: bool) {
        *self.is_loading.write().await = loading;
        self.events.publish(UiEvent::LoadingChanged(loading));
    }
}
