//! Speech-to-text.
//!
//! ```text
//! SttConfig ──▶ TranscribeParams ──▶ WhisperEngine::load(model_path)
//!                                          │
//!        16 kHz mono phrase ──▶ SttEngine::transcribe ──▶ text
//!                                          │
//!                               is_non_speech(text)? ──▶ unintelligible
//! ```
//!
//! # Quick start
//!
//! ```rust,no_run
//! use mock_interview::stt::{SttEngine, TranscribeParams, WhisperEngine};
//!
//! let engine = WhisperEngine::load("models/ggml-base.en.bin", TranscribeParams::default())
//!     .expect("model not found");
//! let audio: Vec<f32> = vec![0.0; 16_000];
//! println!("{}", engine.transcribe(&audio).unwrap());
//! ```

pub mod engine;
pub mod transcribe;

pub use engine::{SttEngine, SttError, WhisperEngine};
pub use transcribe::{
    is_non_speech, SamplingStrategy, Segment, TranscribeParams, TranscriptionResult,
};

#[cfg(test)]
pub use engine::MockSttEngine;
