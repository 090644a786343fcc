//! Text-to-speech: synthesis over HTTP, playback through a local player.
//!
//! * [`SpeechSynthesizer`] / [`GoogleTts`] — text → MP3 bytes.
//! * [`AudioSink`] / [`CommandPlayer`] — MP3 bytes → speakers.
//! * [`split_for_tts`] — request-sized text chunks.

pub mod chunk;
pub mod google;
pub mod player;

use thiserror::Error;

pub use chunk::split_for_tts;
pub use google::{GoogleTts, SpeechSynthesizer};
pub use player::{AudioSink, CommandPlayer};

#[derive(Debug, Error)]
pub enum TtsError {
    #[error("TTS request failed: {0}")]
    Request(String),

    #[error("TTS endpoint returned HTTP {0}")]
    Status(u16),

    #[error("TTS endpoint returned no audio")]
    EmptyAudio,

    #[error("no audio player configured")]
    NoPlayer,

    #[error("failed to write audio file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to start player {program:?}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("player {program:?} exited with code {code:?}")]
    Player { program: String, code: Option<i32> },
}
