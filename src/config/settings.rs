//! Application settings structs, defaults and TOML persistence.
//!
//! Every section has a `Default` that reproduces the stock behaviour, and
//! every field carries `#[serde(default)]` at the struct level so a partial
//! `settings.toml` only needs the keys the user wants to change.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::AppPaths;

// ---------------------------------------------------------------------------
// LlmConfig
// ---------------------------------------------------------------------------

/// Connection settings for the conversational LLM.
///
/// Any endpoint that speaks the OpenAI chat-completions wire format works.
/// The default points at Gemini's OpenAI-compatible surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Base URL including the version segment; `/chat/completions` is
    /// appended to it.
    pub base_url: String,
    /// Model identifier sent with every request.
    pub model: String,
    /// Name of the environment variable holding the API credential.
    pub api_key_env: String,
    /// Sampling temperature (0.0 – 2.0).
    pub temperature: f32,
    /// Optional request timeout.  `None` waits for the provider.
    pub timeout_secs: Option<u64>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com/v1beta/openai".into(),
            model: "gemini-3-flash-preview".into(),
            api_key_env: "GEMINI_API_KEY".into(),
            temperature: 0.7,
            timeout_secs: None,
        }
    }
}

// ---------------------------------------------------------------------------
// GradingConfig
// ---------------------------------------------------------------------------

/// Overrides for the one-shot grading call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GradingConfig {
    /// Model used for grading; `None` reuses `llm.model`.
    pub model: Option<String>,
    /// Grading runs cooler than the interviewer for steadier scores.
    pub temperature: f32,
}

impl Default for GradingConfig {
    fn default() -> Self {
        Self {
            model: None,
            temperature: 0.2,
        }
    }
}

// ---------------------------------------------------------------------------
// SttConfig
// ---------------------------------------------------------------------------

/// Settings for the Whisper STT engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SttConfig {
    /// GGML model file stem, resolved under the models directory.
    pub model: String,
    /// Explicit model path; wins over `model` when set.
    pub model_path: Option<PathBuf>,
    /// ISO-639-1 language code, or `"auto"`.
    pub language: String,
}

impl Default for SttConfig {
    fn default() -> Self {
        Self {
            model: "ggml-base.en".into(),
            model_path: None,
            language: "en".into(),
        }
    }
}

impl SttConfig {
    /// Resolve the GGML file to load.
    pub fn resolve_model_path(&self, paths: &AppPaths) -> PathBuf {
        match &self.model_path {
            Some(path) => path.clone(),
            None => paths.models_dir.join(format!("{}.bin", self.model)),
        }
    }
}

// ---------------------------------------------------------------------------
// AudioConfig
// ---------------------------------------------------------------------------

/// Microphone capture and phrase-detection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Input device name; `None` uses the system default.
    pub device: Option<String>,
    /// Seconds to wait for speech to start before giving up.
    pub listen_timeout_secs: f32,
    /// Longest phrase captured in one `listen` call.
    pub phrase_limit_secs: f32,
    /// Trailing silence that ends a phrase.
    pub pause_secs: f32,
    /// Length of the ambient-noise sample taken at startup.
    pub calibration_secs: f32,
    /// Speech threshold as a multiple of the ambient RMS.
    pub energy_ratio: f32,
    /// Lower bound for the speech threshold in a silent room.
    pub min_energy: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            device: None,
            listen_timeout_secs: 10.0,
            phrase_limit_secs: 15.0,
            pause_secs: 0.8,
            calibration_secs: 1.0,
            energy_ratio: 1.5,
            min_energy: 0.003,
        }
    }
}

// ---------------------------------------------------------------------------
// TtsConfig
// ---------------------------------------------------------------------------

/// Text-to-speech endpoint and local playback command.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TtsConfig {
    /// Translate-TTS style endpoint returning MP3 for `?q=…&tl=…`.
    pub endpoint: String,
    /// Voice language code.
    pub language: String,
    /// Longest text fragment sent in one request.
    pub max_chunk_chars: usize,
    /// Player program followed by its arguments; the MP3 path is appended.
    pub player: Vec<String>,
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://translate.google.com/translate_tts".into(),
            language: "en".into(),
            max_chunk_chars: 100,
            player: vec!["mpg123".into(), "-q".into()],
        }
    }
}

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Interview session defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Duration offered when `--duration` is omitted.
    pub default_duration_mins: u32,
    /// Directory transcripts are written to (relative to the working dir).
    pub transcripts_dir: PathBuf,
    /// Opening line spoken by the interviewer.
    pub greeting: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_duration_mins: 20,
            transcripts_dir: PathBuf::from("transcripts"),
            greeting: "Hello! I'm your interviewer today. Are you ready to begin the case study?"
                .into(),
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level configuration, serialised as `settings.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub llm: LlmConfig,
    pub grading: GradingConfig,
    pub stt: SttConfig,
    pub audio: AudioConfig,
    pub tts: TtsConfig,
    pub session: SessionConfig,
}

impl AppConfig {
    /// Load from the platform `settings.toml`, or defaults when absent.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path.  A missing file yields `Default`.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("config: {} not found, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: Self =
            toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
        Ok(config)
    }

    /// Save to an explicit path, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Model used by the grader.
    pub fn grading_model(&self) -> &str {
        self.grading.model.as_deref().unwrap_or(&self.llm.model)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
