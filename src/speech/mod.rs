//! Speech gateway: microphone → text and text → speakers behind one seam.
//!
//! The session loop only sees [`SpeechGateway`].  Its two calls never fail:
//! `listen` yields `""` for silence, mumbling or any error, and `speak`
//! swallows errors after reporting them.  [`VoiceGateway`] also exposes the
//! `Result`-returning forms, `try_listen` and `try_speak`.

pub mod voice;

use async_trait::async_trait;
use thiserror::Error;

use crate::audio::CaptureError;
use crate::stt::SttError;
use crate::tts::TtsError;

pub use voice::VoiceGateway;

#[async_trait]
pub trait SpeechGateway: Send + Sync {
    /// Say `text` aloud; returns once playback has finished.  Empty text is
    /// a no-op.
    async fn speak(&self, text: &str);

    /// Wait for one phrase and return its transcript, or `""`.
    async fn listen(&self) -> String;
}

/// Why a listen produced no text.
#[derive(Debug, Error)]
pub enum ListenError {
    #[error("no speech detected")]
    NoSpeech,

    #[error("could not understand audio")]
    Unintelligible,

    #[error("microphone error: {0}")]
    Capture(#[from] CaptureError),

    #[error("speech recognition error: {0}")]
    Stt(#[from] SttError),

    #[error("listen task failed: {0}")]
    Worker(String),
}

/// Why the voice gateway could not be built.
#[derive(Debug, Error)]
pub enum SpeechInitError {
    #[error(transparent)]
    Stt(#[from] SttError),

    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error(transparent)]
    Tts(#[from] TtsError),

    #[error("initialisation task failed: {0}")]
    Worker(String),
}
