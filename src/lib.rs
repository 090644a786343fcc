//! Mock interviews against an LLM interviewer, by voice or text, with a
//! graded report at the end.

pub mod app;
pub mod audio;
pub mod cli;
pub mod config;
pub mod console;
pub mod llm;
pub mod prompt;
pub mod session;
pub mod speech;
pub mod stt;
pub mod transcript;
pub mod tts;
