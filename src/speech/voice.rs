//! Microphone + Whisper + translate-TTS implementation of [`SpeechGateway`].

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::{ListenError, SpeechGateway, SpeechInitError};
use crate::audio::{Microphone, PhraseOutcome, PhraseRecorder};
use crate::config::{AppConfig, AppPaths};
use crate::console::Console;
use crate::stt::{is_non_speech, SttEngine, TranscribeParams, WhisperEngine};
use crate::tts::{AudioSink, CommandPlayer, GoogleTts, SpeechSynthesizer, TtsError};

pub struct VoiceGateway {
    recorder: Arc<Mutex<Box<dyn PhraseRecorder>>>,
    stt: Arc<dyn SttEngine>,
    synth: Box<dyn SpeechSynthesizer>,
    sink: Box<dyn AudioSink>,
    console: Console,
}

impl VoiceGateway {
    pub fn new(
        recorder: Box<dyn PhraseRecorder>,
        stt: Arc<dyn SttEngine>,
        synth: Box<dyn SpeechSynthesizer>,
        sink: Box<dyn AudioSink>,
        console: Console,
    ) -> Self {
        Self {
            recorder: Arc::new(Mutex::new(recorder)),
            stt,
            synth,
            sink,
            console,
        }
    }

    /// Load the Whisper model, calibrate the microphone and set up
    /// synthesis and playback.  Model loading and calibration block, so they
    /// run on the blocking pool.
    pub async fn connect(
        config: &AppConfig,
        paths: &AppPaths,
        console: Console,
    ) -> Result<Self, SpeechInitError> {
        let synth = GoogleTts::from_config(&config.tts)?;
        let sink = CommandPlayer::from_command(&config.tts.player)?;

        let model_path = config.stt.resolve_model_path(paths);
        let params = TranscribeParams::from_config(&config.stt);
        console.dim("Loading speech recognition model...");
        let stt = tokio::task::spawn_blocking(move || WhisperEngine::load(model_path, params))
            .await
            .map_err(|e| SpeechInitError::Worker(e.to_string()))??;

        let audio = config.audio.clone();
        console.dim("Calibrating microphone...");
        let mic = tokio::task::spawn_blocking(move || Microphone::calibrate(&audio))
            .await
            .map_err(|e| SpeechInitError::Worker(e.to_string()))??;

        Ok(Self::new(
            Box::new(mic),
            Arc::new(stt),
            Box::new(synth),
            Box::new(sink),
            console,
        ))
    }

    /// Record one phrase and transcribe it.
    pub async fn try_listen(&self) -> Result<String, ListenError> {
        self.console.success("Listening...");
        let recorder = Arc::clone(&self.recorder);
        let stt = Arc::clone(&self.stt);
        let console = self.console.clone();

        tokio::task::spawn_blocking(move || -> Result<String, ListenError> {
            let mut recorder = recorder.lock().unwrap_or_else(|e| e.into_inner());
            let audio = match recorder.record_phrase()? {
                PhraseOutcome::Phrase(audio) => audio,
                PhraseOutcome::TimedOut => return Err(ListenError::NoSpeech),
            };
            drop(recorder);

            console.dim("Processing...");
            let text = stt.transcribe(&audio)?;
            if is_non_speech(&text) {
                return Err(ListenError::Unintelligible);
            }
            Ok(text.trim().to_string())
        })
        .await
        .map_err(|e| ListenError::Worker(e.to_string()))?
    }

    /// Synthesize `text` and play it.  Empty text does nothing.
    pub async fn try_speak(&self, text: &str) -> Result<(), TtsError> {
        if text.trim().is_empty() {
            return Ok(());
        }
        let audio = self.synth.synthesize(text).await?;
        self.sink.play(&audio).await
    }
}

#[async_trait]
impl SpeechGateway for VoiceGateway {
    async fn speak(&self, text: &str) {
        if let Err(e) = self.try_speak(text).await {
            log::warn!("speech: speak failed: {e}");
            match e {
                TtsError::Spawn { .. } | TtsError::Player { .. } => self
                    .console
                    .error(&format!("Error playing audio ({e}). Is the player installed?")),
                _ => self.console.error(&format!("TTS Error: {e}")),
            }
        }
    }

    async fn listen(&self) -> String {
        match self.try_listen().await {
            Ok(text) => {
                self.console.heard(&text);
                text
            }
            Err(ListenError::NoSpeech) => {
                self.console.notice("No speech detected.");
                String::new()
            }
            Err(ListenError::Unintelligible) => {
                self.console.error("Could not understand audio.");
                String::new()
            }
            Err(e) => {
                log::warn!("speech: listen failed: {e}");
                self.console.error(&format!("STT Error: {e}"));
                String::new()
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{CaptureError, ScriptedRecorder};
    use crate::console::CapturedOutput;
    use crate::stt::{MockSttEngine, SttError};

    struct FakeSynth {
        texts: Mutex<Vec<String>>,
        fail: bool,
    }

    #[async_trait]
    impl SpeechSynthesizer for FakeSynth {
        async fn synthesize(&self, text: &str) -> Result<Vec<u8>, TtsError> {
            self.texts.lock().unwrap().push(text.to_string());
            if self.fail {
                Err(TtsError::Status(503))
            } else {
                Ok(text.as_bytes().to_vec())
            }
        }
    }

    #[derive(Clone, Default)]
    struct RecordingSink(Arc<Mutex<Vec<Vec<u8>>>>);

    #[async_trait]
    impl AudioSink for RecordingSink {
        async fn play(&self, mp3: &[u8]) -> Result<(), TtsError> {
            self.0.lock().unwrap().push(mp3.to_vec());
            Ok(())
        }
    }

    fn gateway(
        script: Vec<Result<PhraseOutcome, CaptureError>>,
        stt: MockSttEngine,
        fail_tts: bool,
    ) -> (VoiceGateway, RecordingSink, CapturedOutput) {
        let (console, out) = Console::captured();
        let sink = RecordingSink::default();
        let gw = VoiceGateway::new(
            Box::new(ScriptedRecorder::new(script)),
            Arc::new(stt),
            Box::new(FakeSynth {
                texts: Mutex::new(Vec::new()),
                fail: fail_tts,
            }),
            Box::new(sink.clone()),
            console,
        );
        (gw, sink, out)
    }

    fn phrase() -> Result<PhraseOutcome, CaptureError> {
        Ok(PhraseOutcome::Phrase(vec![0.2; 8_000]))
    }

    #[tokio::test]
    async fn listen_returns_transcript() {
        let (gw, _, out) = gateway(vec![phrase()], MockSttEngine::ok(" I'm ready. "), false);
        assert_eq!(gw.listen().await, "I'm ready.");
        let text = out.text();
        assert!(text.contains("Listening..."));
        assert!(text.contains("Processing..."));
        assert!(text.contains("You said: I'm ready."));
    }

    #[tokio::test]
    async fn timeout_yields_empty_string() {
        let stt = MockSttEngine::ok("never used");
        let (gw, _, out) = gateway(vec![Ok(PhraseOutcome::TimedOut)], stt, false);
        assert_eq!(gw.listen().await, "");
        assert!(out.text().contains("No speech detected."));
    }

    #[tokio::test]
    async fn blank_audio_is_unintelligible() {
        let (gw, _, _) = gateway(vec![phrase()], MockSttEngine::ok("[BLANK_AUDIO]"), false);
        assert!(matches!(gw.try_listen().await, Err(ListenError::Unintelligible)));

        let (gw, _, out) = gateway(vec![phrase()], MockSttEngine::ok("[BLANK_AUDIO]"), false);
        assert_eq!(gw.listen().await, "");
        assert!(out.text().contains("Could not understand audio."));
    }

    #[tokio::test]
    async fn stt_failure_yields_empty_string() {
        let stt = MockSttEngine::err(SttError::Transcription("boom".into()));
        let (gw, _, out) = gateway(vec![phrase()], stt, false);
        assert_eq!(gw.listen().await, "");
        assert!(out.text().contains("boom"));
    }

    #[tokio::test]
    async fn capture_failure_yields_empty_string() {
        let (gw, _, _) = gateway(
            vec![Err(CaptureError::Stalled)],
            MockSttEngine::ok("x"),
            false,
        );
        assert!(matches!(gw.try_listen().await, Err(ListenError::Capture(_))));
    }

    #[tokio::test]
    async fn speak_synthesizes_and_plays() {
        let (gw, sink, _) = gateway(Vec::new(), MockSttEngine::ok("x"), false);
        gw.speak("Hello!").await;
        assert_eq!(sink.0.lock().unwrap().as_slice(), &[b"Hello!".to_vec()]);
    }

    #[tokio::test]
    async fn speak_empty_text_is_noop() {
        let (gw, sink, _) = gateway(Vec::new(), MockSttEngine::ok("x"), false);
        gw.speak("  ").await;
        assert!(sink.0.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn speak_failure_is_reported_not_raised() {
        let (gw, sink, out) = gateway(Vec::new(), MockSttEngine::ok("x"), true);
        gw.speak("Hello!").await;
        assert!(sink.0.lock().unwrap().is_empty());
        assert!(out.text().contains("TTS Error"));
    }
}
