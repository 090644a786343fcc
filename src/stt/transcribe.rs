//! Transcription parameters, results and output clean-up.

use crate::config::SttConfig;

// ---------------------------------------------------------------------------
// SamplingStrategy
// ---------------------------------------------------------------------------

/// Owned, `Clone` mirror of `whisper_rs::SamplingStrategy`.
#[derive(Debug, Clone, PartialEq)]
pub enum SamplingStrategy {
    Greedy { best_of: i32 },
    BeamSearch { beam_size: i32, patience: f32 },
}

impl Default for SamplingStrategy {
    fn default() -> Self {
        Self::Greedy { best_of: 1 }
    }
}

// ---------------------------------------------------------------------------
// TranscribeParams
// ---------------------------------------------------------------------------

/// Settings for a single Whisper run.
#[derive(Debug, Clone)]
pub struct TranscribeParams {
    /// ISO-639-1 code, or `"auto"` for detection.
    pub language: String,
    pub strategy: SamplingStrategy,
    /// CPU threads handed to Whisper; see [`optimal_threads`].
    pub n_threads: i32,
    /// Keep Whisper's progress output off the interview console.
    pub suppress_progress: bool,
}

impl Default for TranscribeParams {
    fn default() -> Self {
        Self {
            language: "en".into(),
            strategy: SamplingStrategy::default(),
            n_threads: optimal_threads(),
            suppress_progress: true,
        }
    }
}

impl TranscribeParams {
    pub fn from_config(config: &SttConfig) -> Self {
        Self {
            language: config.language.clone(),
            ..Self::default()
        }
    }
}

/// Available parallelism capped at 8; Whisper gains little beyond that.
pub(crate) fn optimal_threads() -> i32 {
    std::thread::available_parallelism()
        .map(|n| n.get().min(8) as i32)
        .unwrap_or(4)
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct TranscriptionResult {
    /// Concatenated segment text, trimmed.
    pub text: String,
    pub segments: Vec<Segment>,
    /// Wall-clock inference time.
    pub duration_ms: u128,
}

#[derive(Debug, Clone)]
pub struct Segment {
    pub text: String,
    pub start_ms: u64,
    pub end_ms: u64,
}

// ---------------------------------------------------------------------------
// Non-speech detection
// ---------------------------------------------------------------------------

/// `true` when Whisper produced nothing a person said: empty output, or
/// only bracketed / parenthesised annotations such as `[BLANK_AUDIO]`,
/// `(wind blowing)` or `[Music]`.
pub fn is_non_speech(text: &str) -> bool {
    let mut rest = text.trim();
    loop {
        rest = rest.trim_start_matches(|c: char| c.is_whitespace() || c == '.' || c == '*');
        if rest.is_empty() {
            return true;
        }
        let close = match rest.chars().next() {
            Some('[') => ']',
            Some('(') => ')',
            _ => return false,
        };
        match rest.find(close) {
            Some(end) => rest = &rest[end + 1..],
            None => return false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_english_greedy() {
        let p = TranscribeParams::default();
        assert_eq!(p.language, "en");
        assert_eq!(p.strategy, SamplingStrategy::Greedy { best_of: 1 });
        assert!(p.suppress_progress);
    }

    #[test]
    fn params_follow_config_language() {
        let config = SttConfig {
            language: "auto".into(),
            ..SttConfig::default()
        };
        assert_eq!(TranscribeParams::from_config(&config).language, "auto");
    }

    #[test]
    fn optimal_threads_is_positive_and_at_most_8() {
        let t = optimal_threads();
        assert!((1..=8).contains(&t));
    }

    #[test]
    fn annotations_are_non_speech() {
        assert!(is_non_speech(""));
        assert!(is_non_speech("   "));
        assert!(is_non_speech("[BLANK_AUDIO]"));
        assert!(is_non_speech(" (wind blowing) [Music] "));
        assert!(is_non_speech("..."));
    }

    #[test]
    fn words_are_speech() {
        assert!(!is_non_speech("I'm ready."));
        assert!(!is_non_speech("[Music] Let's begin"));
        assert!(!is_non_speech("[unterminated"));
    }
}
