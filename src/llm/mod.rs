//! LLM-backed interview agents.
//!
//! This module provides:
//! * [`ChatClient`] — async trait for one chat-completion round trip.
//! * [`ApiChatClient`] — OpenAI-compatible REST client (Gemini by default).
//! * [`InterviewType`] — interview categories and their personas.
//! * [`Interviewer`] — the conversational agent; never fails a turn.
//! * [`Grader`] — stateless post-session evaluation.
//! * [`GradeReport`] / [`RubricSection`] — the parsed five-section report.
//! * [`LlmError`] — error variants for LLM operations.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use mock_interview::config::AppConfig;
//! use mock_interview::console::Console;
//! use mock_interview::llm::{ApiChatClient, InterviewType, Interviewer};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = AppConfig::default();
//!     let client = Arc::new(ApiChatClient::from_config(&config.llm, "api-key")?);
//!
//!     let mut interviewer = Interviewer::new(client, InterviewType::SystemDesign, Console::stdout());
//!     interviewer.open(&config.session.greeting);
//!     println!("{}", interviewer.get_response("Yes, I'm ready.").await);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod grader;
pub mod interviewer;
pub mod persona;
pub mod report;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use client::{ApiChatClient, ChatClient, ChatMessage, ChatRole, LlmError};
pub use grader::{build_prompt, Grader};
pub use interviewer::{Interviewer, FALLBACK_REPLY};
pub use persona::InterviewType;
pub use report::{GradeReport, RubricSection, MISSING_SECTION};

#[cfg(test)]
pub use client::MockChatClient;
