//! The interactive chat shell.
//!
//! A rustyline REPL over the application services: plain lines are chat
//! input, slash commands navigate the site surfaces, and the intake and lead
//! forms run as interactive prompt sequences. All rendering is driven by the
//! service event bus.

use crate::pages;
use anyhow::Result;
use async_trait::async_trait;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use sparky_application::{
    AudioSink, ChatService, EntryPoint, EventBus, FormOutcome, SpeechService, UiEvent,
};
use sparky_core::chat::{ChatMessage, MessageRole, Transcript};
use sparky_core::config::AppConfig;
use sparky_core::error::Result as SparkyResult;
use sparky_core::flow::{FlowState, NavTarget};
use sparky_core::intake::{budget_label, IntakeDraft};
use sparky_core::lead::Lead;
use sparky_core::secret::SecretService;
use sparky_core::speech::AudioClip;
use sparky_infrastructure::{
    ConfigService, JsonIntakeRepository, JsonTranscriptRepository, SecretServiceImpl, SparkyPaths,
};
use sparky_interaction::{GeminiSessionFactory, GeminiSpeech};
use std::borrow::Cow::{self, Borrowed, Owned};
use std::io::Write as IoWrite;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

type ShellEditor = Editor<CliHelper, DefaultHistory>;

/// CLI helper for rustyline that provides completion, highlighting, and hints.
#[derive(Clone)]
struct CliHelper {
    commands: Vec<String>,
}

impl CliHelper {
    fn new() -> Self {
        let commands = [
            "/help",
            "/landing",
            "/services",
            "/pricing",
            "/cases",
            "/about",
            "/contact",
            "/calculators",
            "/chat",
            "/intake",
            "/lead",
            "/new",
            "/speak",
            "/stop",
            "/sources",
        ];
        Self {
            commands: commands.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if line.starts_with('/') {
            let candidates: Vec<Pair> = self
                .commands
                .iter()
                .filter(|cmd| cmd.starts_with(line))
                .map(|cmd| Pair {
                    display: cmd.clone(),
                    replacement: cmd.clone(),
                })
                .collect();
            Ok((0, candidates))
        } else {
            Ok((0, vec![]))
        }
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            self.commands
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for CliHelper {}

/// Sink for a terminal without an audio device: playback occupies real time
/// (so /stop has something to stop) without producing sound.
struct TerminalSink;

#[async_trait]
impl AudioSink for TerminalSink {
    async fn play(&self, clip: AudioClip, cancel: CancellationToken) -> SparkyResult<()> {
        let duration = Duration::from_secs_f32(clip.duration_secs());
        tokio::select! {
            _ = tokio::time::sleep(duration) => {}
            _ = cancel.cancelled() => {}
        }
        Ok(())
    }
}

/// The main entry point for the Sparky chat shell.
pub async fn run(state_dir: Option<PathBuf>) -> Result<()> {
    // ===== Backend Initialization =====
    let state_dir = match state_dir {
        Some(dir) => dir,
        None => SparkyPaths::state_dir().map_err(|e| anyhow::anyhow!(e.to_string()))?,
    };

    let transcript_repository = Arc::new(JsonTranscriptRepository::new(&state_dir));
    let intake_repository = Arc::new(JsonIntakeRepository::new(&state_dir));
    let config = ConfigService::default_location()?.load().await?;
    let secret_service = Arc::new(SecretServiceImpl::default_location()?);
    let factory = Arc::new(GeminiSessionFactory::new(
        secret_service.clone(),
        config.clone(),
    ));

    let events = EventBus::new();
    let service = Arc::new(ChatService::new(
        factory,
        transcript_repository.clone(),
        intake_repository,
        events.clone(),
    ));
    let speech = build_speech_service(secret_service.as_ref(), &config, &events).await;

    let printer = spawn_printer(events.subscribe());

    println!("{}", "=== Sparky — firesites.tech ===".bright_magenta().bold());
    println!(
        "{}",
        "Type a message to chat, '/help' for commands, or 'quit' to exit.".bright_black()
    );
    println!();

    // A persisted transcript means bootstrap will resume without streaming;
    // in that case the shell replays it (streamed greetings print live)
    let resuming = {
        use sparky_core::chat::TranscriptRepository;
        transcript_repository
            .load()
            .await
            .ok()
            .flatten()
            .map(|t| !t.is_empty())
            .unwrap_or(false)
    };

    service.bootstrap(EntryPoint::Site).await?;

    let flow = service.flow_state().await;
    if matches!(flow, FlowState::Chatting) {
        if resuming {
            render_transcript(&service.transcript().await);
        }
    } else {
        pages::render(&flow);
    }

    // ===== REPL Setup =====
    let helper = CliHelper::new();
    let mut rl = Editor::new()?;
    rl.set_helper(Some(helper));

    let mut auto_intake = true;
    let mut auto_lead = true;

    // ===== Main REPL Loop =====
    loop {
        let flow = service.flow_state().await;

        match &flow {
            FlowState::Intake if auto_intake => {
                auto_intake = false;
                if intake_form(&mut rl, &service).await? {
                    auto_intake = true;
                }
                continue;
            }
            FlowState::Qualifying if auto_lead => {
                auto_lead = false;
                if lead_form(&mut rl, &service).await? {
                    auto_lead = true;
                }
                continue;
            }
            _ => {}
        }

        let readline = rl.readline(&pages::prompt(&flow));

        match readline {
            Ok(line) => {
                let trimmed = line.trim();

                if trimmed == "quit" || trimmed == "exit" {
                    println!("{}", "Goodbye!".bright_green());
                    break;
                }

                if trimmed.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(&line);

                if trimmed.starts_with('/') {
                    handle_command(
                        trimmed,
                        &service,
                        speech.as_ref(),
                        &mut auto_intake,
                        &mut auto_lead,
                    )
                    .await?;
                } else if flow.accepts_chat_input() {
                    if !service.send_message(trimmed).await? {
                        println!(
                            "{}",
                            "Sparky is still answering — wait for the reply to finish.".yellow()
                        );
                    }
                } else if matches!(flow, FlowState::Qualifying) {
                    println!("{}", "Finish the project form first (/lead).".yellow());
                } else if matches!(flow, FlowState::Qualified { .. }) {
                    println!(
                        "{}",
                        "This conversation is wrapped up. Start a new one with /new.".bright_black()
                    );
                } else {
                    println!(
                        "{}",
                        "You're on a marketing page — open the chat with /chat.".bright_black()
                    );
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    if let Some(speech) = &speech {
        speech.stop().await;
    }
    printer.abort();

    Ok(())
}

async fn handle_command(
    command: &str,
    service: &Arc<ChatService>,
    speech: Option<&Arc<SpeechService>>,
    auto_intake: &mut bool,
    auto_lead: &mut bool,
) -> Result<()> {
    let before = service.flow_state().await;

    let nav_target = match command {
        "/landing" => Some(NavTarget::Landing),
        "/services" => Some(NavTarget::Services),
        "/pricing" => Some(NavTarget::Pricing),
        "/cases" => Some(NavTarget::CaseStudies),
        "/about" => Some(NavTarget::About),
        "/contact" => Some(NavTarget::Contact),
        "/calculators" => Some(NavTarget::Calculators),
        "/chat" => Some(NavTarget::ResumeChat),
        "/intake" => Some(NavTarget::Intake),
        _ => None,
    };

    if let Some(target) = nav_target {
        if command == "/intake" && matches!(before, FlowState::Intake) {
            // Already on the form; just reopen it
            *auto_intake = true;
            return Ok(());
        }

        let after = service.navigate(target).await;
        if after != before {
            if matches!(after, FlowState::Intake) {
                *auto_intake = true;
            } else {
                pages::render(&after);
            }
        } else if matches!(target, NavTarget::ResumeChat) {
            println!(
                "{}",
                "No conversation to resume — complete the intake form first (/intake from the landing page).".yellow()
            );
        } else {
            println!("{}", "That page isn't available from here.".yellow());
        }
        return Ok(());
    }

    match command {
        "/help" => print_help(),
        "/new" => {
            service.reset().await?;
            *auto_intake = true;
            *auto_lead = true;
            println!("{}", "Starting fresh.".bright_green());
        }
        "/lead" => {
            if matches!(before, FlowState::Qualifying) {
                *auto_lead = true;
            } else {
                println!("{}", "The project form isn't open right now.".yellow());
            }
        }
        "/speak" => match (speech, last_model_message(&service.transcript().await)) {
            (None, _) => println!(
                "{}",
                "Speech is unavailable — configure a Gemini API key first.".yellow()
            ),
            (_, None) => println!("{}", "Nothing to read aloud yet.".yellow()),
            (Some(speech), Some(message)) => {
                speech.speak(&message.text).await;
            }
        },
        "/stop" => {
            if let Some(speech) = speech {
                speech.stop().await;
            }
        }
        "/sources" => match last_model_message(&service.transcript().await) {
            Some(message) if !message.citations.is_empty() => print_sources(message),
            _ => println!("{}", "The latest reply has no sources.".bright_black()),
        },
        _ => println!("{}", "Unknown command — try /help.".bright_black()),
    }

    Ok(())
}

fn print_help() {
    println!("{}", "Commands".bold());
    println!("  /landing /services /pricing /cases /about /contact   browse the site");
    println!("  /chat            resume the conversation");
    println!("  /intake          open the intake form (from the landing page)");
    println!("  /calculators     cost calculators (from the chat shell)");
    println!("  /lead            reopen the project details form");
    println!("  /speak /stop     read the latest reply aloud / stop playback");
    println!("  /sources         show the sources behind the latest reply");
    println!("  /new             clear everything and start over");
    println!("  quit             exit");
}

fn last_model_message(transcript: &Transcript) -> Option<&ChatMessage> {
    transcript
        .messages()
        .iter()
        .rev()
        .find(|m| m.role == MessageRole::Model && !m.text.is_empty())
}

fn print_sources(message: &ChatMessage) {
    println!("{}", "Sources".bold());
    for citation in &message.citations {
        let title = if citation.title.is_empty() {
            citation.url.as_str()
        } else {
            citation.title.as_str()
        };
        println!("  {} {}", title, format!("<{}>", citation.url).bright_black());
    }
}

fn render_transcript(transcript: &Transcript) {
    for message in transcript.messages() {
        match message.role {
            MessageRole::User => println!("{}", format!("> {}", message.text).green()),
            MessageRole::Model => {
                println!("{}{}", "Sparky: ".bright_magenta().bold(), message.text.bright_blue());
                if !message.citations.is_empty() {
                    print_sources(message);
                }
            }
        }
        println!();
    }
}

/// Prints streaming updates as they are published.
///
/// Model text is printed as incremental deltas; a finalization that rewrites
/// the text (sentinel strip, error replacement) is shown as a corrected
/// line once the stream settles.
fn spawn_printer(mut receiver: broadcast::Receiver<UiEvent>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut streaming_index: Option<usize> = None;
        let mut printed = String::new();
        let mut rewritten: Option<String> = None;
        let mut citations = Vec::new();

        loop {
            let event = match receiver.recv().await {
                Ok(event) => event,
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => break,
            };

            match event {
                UiEvent::MessageAppended { index, message } => match message.role {
                    MessageRole::User => {}
                    MessageRole::Model if message.text.is_empty() => {
                        streaming_index = Some(index);
                        printed.clear();
                        rewritten = None;
                        citations.clear();
                        print!("{}", "Sparky: ".bright_magenta().bold());
                        let _ = std::io::stdout().flush();
                    }
                    MessageRole::Model => {
                        println!(
                            "{}{}",
                            "Sparky: ".bright_magenta().bold(),
                            message.text.bright_blue()
                        );
                    }
                },
                UiEvent::MessageUpdated { index, message } => {
                    if streaming_index == Some(index) {
                        citations = message.citations.clone();
                        if message.text.starts_with(&printed) {
                            let delta = &message.text[printed.len()..];
                            print!("{}", delta.bright_blue());
                            let _ = std::io::stdout().flush();
                            printed = message.text;
                        } else {
                            rewritten = Some(message.text);
                        }
                    }
                }
                UiEvent::LoadingChanged(false) => {
                    if streaming_index.take().is_some() {
                        println!();
                        if let Some(text) = rewritten.take() {
                            println!("{} {}", "↳".bright_black(), text.bright_blue());
                        }
                        if !citations.is_empty() {
                            println!("{}", "Sources".bold());
                            for citation in &citations {
                                let title = if citation.title.is_empty() {
                                    citation.url.as_str()
                                } else {
                                    citation.title.as_str()
                                };
                                println!(
                                    "  {} {}",
                                    title,
                                    format!("<{}>", citation.url).bright_black()
                                );
                            }
                        }
                        println!();
                    }
                }
                UiEvent::FlowChanged(FlowState::Qualifying) => {
                    println!(
                        "{}",
                        "Sparky is ready to collect your project details.".bright_yellow()
                    );
                }
                UiEvent::FlowChanged(FlowState::Qualified { .. }) => {
                    println!(
                        "{}",
                        "Thank you for your submission. We'll be in touch soon.".bright_green()
                    );
                }
                UiEvent::PlaybackChanged(true) => {
                    println!("{}", "Reading aloud — /stop to stop.".bright_black());
                }
                _ => {}
            }
        }
    })
}

async fn build_speech_service(
    secret_service: &SecretServiceImpl,
    config: &AppConfig,
    events: &EventBus,
) -> Option<Arc<SpeechService>> {
    let secrets = secret_service.load_secrets().await.ok()?;
    let gemini = secrets.gemini?;
    if gemini.api_key.trim().is_empty() {
        return None;
    }

    let backend = GeminiSpeech::new(
        gemini.api_key,
        config.tts_model.clone(),
        config.tts_voice.clone(),
    );
    Some(Arc::new(SpeechService::new(
        Arc::new(backend),
        Arc::new(TerminalSink),
        events.clone(),
    )))
}

// ===== Forms =====

/// Runs the intake form as a prompt sequence.
///
/// Every answer is saved to the draft immediately, so Ctrl-C pauses the form
/// without losing anything; re-running it picks the answers back up as
/// defaults. Returns `true` when the form was submitted.
async fn intake_form(rl: &mut ShellEditor, service: &Arc<ChatService>) -> Result<bool> {
    println!();
    println!("{}", "Let's Build Together".bold());
    println!(
        "{}",
        "Tell us about your project. Answers are saved as you type; Ctrl-C pauses the form."
            .bright_black()
    );

    let mut draft: IntakeDraft = service.load_draft().await.unwrap_or_default().unwrap_or_default();

    let fields: [(&str, fn(&IntakeDraft) -> Option<String>, fn(&mut IntakeDraft, String)); 6] = [
        ("Full name", |d| d.full_name.clone(), |d, v| d.full_name = Some(v)),
        ("Job title", |d| d.job_title.clone(), |d, v| d.job_title = Some(v)),
        ("Industry", |d| d.industry.clone(), |d, v| d.industry = Some(v)),
        (
            "Years of experience (e.g. 3-5)",
            |d| d.experience.clone(),
            |d, v| d.experience = Some(v),
        ),
        (
            "Project idea",
            |d| d.project_idea.clone(),
            |d, v| d.project_idea = Some(v),
        ),
        (
            "Primary goal (e.g. Launch a New Product)",
            |d| d.goal.clone(),
            |d, v| d.goal = Some(v),
        ),
    ];

    for (label, get, set) in fields {
        let Some(value) = ask(rl, label, get(&draft))? else {
            println!("{}", "Intake paused — reopen it with /intake.".yellow());
            return Ok(false);
        };
        set(&mut draft, value);
        if let Err(e) = service.save_draft(&draft).await {
            tracing::warn!("Failed to save intake draft: {e}");
        }
    }

    let Some(amount) = ask_budget(rl, draft.budget_range)? else {
        println!("{}", "Intake paused — reopen it with /intake.".yellow());
        return Ok(false);
    };
    draft.budget_range = Some(amount);
    draft.budget = Some(budget_label(amount).to_string());
    if let Err(e) = service.save_draft(&draft).await {
        tracing::warn!("Failed to save intake draft: {e}");
    }
    println!("Budget bracket: {}", draft.budget.as_deref().unwrap_or_default().bold());

    let Some(data) = draft.into_data() else {
        println!("{}", "Please fill out all fields.".red());
        return Ok(false);
    };

    match service.submit_intake(data).await? {
        FormOutcome::Accepted => Ok(true),
        FormOutcome::Invalid(missing) => {
            println!("{}", format!("Missing fields: {}", missing.join(", ")).red());
            Ok(false)
        }
    }
}

/// Runs the lead form as a prompt sequence. Returns `true` on submission.
async fn lead_form(rl: &mut ShellEditor, service: &Arc<ChatService>) -> Result<bool> {
    println!();
    println!("{}", "Project Details".bold());
    println!(
        "{}",
        "A few details and the firesites.tech team takes it from here. Ctrl-C pauses the form."
            .bright_black()
    );

    let Some(full_name) = ask(rl, "Full name", None)? else {
        println!("{}", "Form paused — reopen it with /lead.".yellow());
        return Ok(false);
    };
    let Some(email) = ask(rl, "Email", None)? else {
        println!("{}", "Form paused — reopen it with /lead.".yellow());
        return Ok(false);
    };
    let Some(project_description) = ask(rl, "Project description", None)? else {
        println!("{}", "Form paused — reopen it with /lead.".yellow());
        return Ok(false);
    };
    let Some(budget) = ask(rl, "Budget bracket (e.g. $15k - $30k)", None)? else {
        println!("{}", "Form paused — reopen it with /lead.".yellow());
        return Ok(false);
    };

    let lead = Lead {
        full_name,
        email,
        project_description,
        budget,
    };

    match service.submit_lead(lead).await? {
        FormOutcome::Accepted => Ok(true),
        FormOutcome::Invalid(missing) => {
            println!("{}", format!("Missing fields: {}", missing.join(", ")).red());
            Ok(false)
        }
    }
}

/// Prompts for one field; empty input keeps the shown default.
///
/// Returns `None` when the user cancels with Ctrl-C or Ctrl-D.
fn ask(rl: &mut ShellEditor, label: &str, current: Option<String>) -> Result<Option<String>> {
    loop {
        let prompt = match &current {
            Some(value) => format!("{} [{}]: ", label, value),
            None => format!("{}: ", label),
        };

        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    match &current {
                        Some(value) => return Ok(Some(value.clone())),
                        None => continue,
                    }
                }
                return Ok(Some(trimmed.to_string()));
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => return Ok(None),
            Err(err) => return Err(err.into()),
        }
    }
}

/// Prompts for the budget amount backing the bracket label.
fn ask_budget(rl: &mut ShellEditor, current: Option<u32>) -> Result<Option<u32>> {
    loop {
        let prompt = match current {
            Some(value) => format!("Approximate budget in USD [{}]: ", value),
            None => "Approximate budget in USD (e.g. 12000): ".to_string(),
        };

        match rl.readline(&prompt) {
            Ok(line) => {
                let cleaned = line.trim().trim_start_matches('$').replace(',', "");
                if cleaned.is_empty() {
                    match current {
                        Some(value) => return Ok(Some(value)),
                        None => continue,
                    }
                }
                match cleaned.parse::<u32>() {
                    Ok(value) => return Ok(Some(value)),
                    Err(_) => println!("{}", "Enter a whole number of dollars.".yellow()),
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => return Ok(None),
            Err(err) => return Err(err.into()),
        }
    }
}
