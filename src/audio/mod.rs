//! Audio input: microphone capture → 16 kHz mono → phrase detection.
//!
//! # Pipeline
//!
//! ```text
//! Microphone → cpal callback → AudioChunk (mpsc) → downmix + resample_to_16k
//!           → PhraseDetector (VadDetector per 30 ms frame) → PhraseOutcome
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use mock_interview::audio::{Microphone, PhraseOutcome, PhraseRecorder};
//! use mock_interview::config::AudioConfig;
//!
//! let mut mic = Microphone::calibrate(&AudioConfig::default()).unwrap();
//! match mic.record_phrase().unwrap() {
//!     PhraseOutcome::Phrase(audio) => println!("{} samples", audio.len()),
//!     PhraseOutcome::TimedOut => println!("nothing heard"),
//! }
//! ```

pub mod capture;
pub mod microphone;
pub mod phrase;
pub mod resample;
pub mod vad;

pub use capture::{AudioCapture, AudioChunk, CaptureError, StreamHandle};
pub use microphone::{Microphone, PhraseRecorder};
pub use phrase::{PhraseDetector, PhraseLimits, PhraseOutcome};
pub use resample::{downmix, resample, resample_to_16k, TARGET_RATE};
pub use vad::{frame_rms, VadDetector, FRAME_SAMPLES};

#[cfg(test)]
pub use microphone::ScriptedRecorder;
