//! Composition root: turns config and CLI answers into a running interview.
//!
//! # Startup sequence
//!
//! 1. [`api_key`] — the credential must be present before anything else.
//! 2. [`SessionPlan::resolve`] — CLI flags, with interactive prompts for the
//!    gaps.
//! 3. [`Interview::connect`] — LLM clients, and in voice mode the speech
//!    gateway (Whisper load + microphone calibration).
//! 4. [`Interview::run`] — greeting, turn loop, transcript save, grading.
//!
//! Every failure before step 4 is a [`StartupError`]; after that nothing is
//! fatal.

use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

use crate::config::{AppConfig, AppPaths, LlmConfig};
use crate::console::Console;
use crate::llm::{ApiChatClient, ChatClient, Grader, InterviewType, Interviewer, LlmError};
use crate::prompt::{ask_duration, choose_interview_type};
use crate::session::{
    finish_session, minutes, Clock, Interrupt, Session, SessionLoop, SessionSummary,
    SystemClock, TextInput, UserInput, VoiceInput,
};
use crate::speech::{SpeechGateway, SpeechInitError, VoiceGateway};
use crate::transcript::{format_as_text, TranscriptError, TranscriptStore};

// ---------------------------------------------------------------------------
// StartupError
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("{var} not found in environment variables. Please create a .env file with your API key.")]
    MissingCredential { var: String },

    #[error("configuration error: {0:#}")]
    Config(anyhow::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("LLM client error: {0}")]
    Llm(#[from] LlmError),

    #[error("speech initialisation failed: {0}")]
    Speech(#[from] SpeechInitError),

    #[error(transparent)]
    Transcript(#[from] TranscriptError),
}

impl StartupError {
    /// Process exit status for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            StartupError::MissingCredential { .. } => 2,
            _ => 1,
        }
    }
}

/// Read the credential named by `config.api_key_env` from the environment.
pub fn api_key(config: &LlmConfig) -> Result<String, StartupError> {
    api_key_from(config, |var| std::env::var(var).ok())
}

fn api_key_from(
    config: &LlmConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<String, StartupError> {
    match lookup(&config.api_key_env) {
        Some(key) if !key.trim().is_empty() => Ok(key.trim().to_string()),
        _ => Err(StartupError::MissingCredential {
            var: config.api_key_env.clone(),
        }),
    }
}

/// Interviewer client and grading client.  They share endpoint and key; the
/// grader may use its own model and temperature.
pub fn chat_clients(
    config: &AppConfig,
    api_key: &str,
) -> Result<(Arc<dyn ChatClient>, Arc<dyn ChatClient>), StartupError> {
    let chat = ApiChatClient::from_config(&config.llm, api_key)?;
    let grading = ApiChatClient::from_config(&config.llm, api_key)?
        .with_model(config.grading_model(), config.grading.temperature);
    log::info!("app: interviewer model {}, grading model {}", chat.model(), grading.model());
    Ok((Arc::new(chat), Arc::new(grading)))
}

// ---------------------------------------------------------------------------
// SessionPlan
// ---------------------------------------------------------------------------

/// What the candidate asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionPlan {
    pub interview_type: InterviewType,
    pub duration_mins: u32,
    pub text_only: bool,
}

impl SessionPlan {
    /// Fill in missing options by asking on `input`.
    pub fn resolve(
        interview_type: Option<&str>,
        duration_mins: Option<u32>,
        text_only: bool,
        default_duration: u32,
        input: &mut impl BufRead,
        console: &Console,
    ) -> Result<Self, StartupError> {
        let interview_type = match interview_type {
            Some(label) => InterviewType::from_label(label),
            None => choose_interview_type(input, console)?,
        };
        let duration_mins = match duration_mins {
            Some(mins) => mins,
            None => ask_duration(input, console, default_duration)?,
        };
        Ok(Self {
            interview_type,
            duration_mins,
            text_only,
        })
    }

    pub fn banner(&self) -> String {
        format!(
            "Starting {} Interview\nDuration: {} mins",
            self.interview_type, self.duration_mins
        )
    }
}

// ---------------------------------------------------------------------------
// Interview
// ---------------------------------------------------------------------------

/// Everything one session needs, wired up.
pub struct Interview {
    pub plan: SessionPlan,
    pub chat: Arc<dyn ChatClient>,
    pub grading: Arc<dyn ChatClient>,
    pub speech: Option<Arc<dyn SpeechGateway>>,
    pub input: Box<dyn UserInput>,
    pub clock: Box<dyn Clock>,
    pub interrupt: Interrupt,
    pub store: TranscriptStore,
    pub greeting: String,
    pub console: Console,
}

impl Interview {
    /// Build the real collaborators.  Voice mode loads Whisper and
    /// calibrates the microphone here; text mode reads stdin.
    pub async fn connect(
        config: &AppConfig,
        paths: &AppPaths,
        api_key: &str,
        plan: SessionPlan,
        interrupt: Interrupt,
        console: Console,
    ) -> Result<Self, StartupError> {
        let (chat, grading) = chat_clients(config, api_key)?;

        let mut speech: Option<Arc<dyn SpeechGateway>> = None;
        let input: Box<dyn UserInput> = if plan.text_only {
            Box::new(TextInput::stdin(console.clone()))
        } else {
            let gateway: Arc<dyn SpeechGateway> =
                Arc::new(VoiceGateway::connect(config, paths, console.clone()).await?);
            speech = Some(Arc::clone(&gateway));
            Box::new(VoiceInput::new(gateway))
        };

        Ok(Self {
            plan,
            chat,
            grading,
            speech,
            input,
            clock: Box::new(SystemClock::start()),
            interrupt,
            store: TranscriptStore::new(&config.session.transcripts_dir),
            greeting: config.session.greeting.clone(),
            console,
        })
    }

    /// Run the session to a terminal state, then save and grade it.
    pub async fn run(self) -> SessionSummary {
        let Interview {
            plan,
            chat,
            grading,
            speech,
            input,
            clock,
            interrupt,
            store,
            greeting,
            console,
        } = self;

        console.headline("Interview Started. Press Ctrl+C to stop.\n");

        let interviewer = Interviewer::new(chat, plan.interview_type, console.clone());
        let mut session = Session::new(plan.interview_type, minutes(plan.duration_mins));
        let mut session_loop =
            SessionLoop::new(interviewer, input, speech, clock, interrupt, console.clone());
        let state = session_loop.run(&mut session, &greeting).await;

        let grader = Grader::new(grading, console.clone());
        finish_session(state, &session, &store, &grader, &console).await
    }
}

// ---------------------------------------------------------------------------
// Re-grading
// ---------------------------------------------------------------------------

/// Grade a transcript saved by an earlier session and print the report.
pub async fn grade_saved(
    path: &Path,
    grading: Arc<dyn ChatClient>,
    console: &Console,
) -> Result<String, StartupError> {
    let record = TranscriptStore::load(path)?;
    let interview_type = InterviewType::from_label(&record.interview_type);
    console.info(&format!(
        "Grading {} interview from {} ({} turns)",
        interview_type,
        record.timestamp,
        record.transcript.len()
    ));

    let grader = Grader::new(grading, console.clone());
    let report = grader
        .grade(&format_as_text(&record.transcript), interview_type)
        .await;
    console.panel("Interview Feedback", &report);
    Ok(report)
}

/// `--config` when given, otherwise the platform settings file.
pub fn config_path(explicit: Option<PathBuf>, paths: &AppPaths) -> PathBuf {
    explicit.unwrap_or_else(|| paths.settings_file.clone())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
