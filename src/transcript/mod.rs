//! Conversation turns and their persisted form.
//!
//! * [`Turn`] / [`Role`] — one recorded utterance.
//! * [`format_as_text`] / [`parse_text`] — `ROLE: content` rendering for the
//!   grader.
//! * [`TranscriptStore`] — write-once JSON files under `transcripts/`.

pub mod store;
pub mod text;
pub mod turn;

pub use store::{TranscriptError, TranscriptRecord, TranscriptStore, STAMP_FORMAT};
pub use text::{format_as_text, parse_text, TranscriptParseError};
pub use turn::{Role, Turn};
