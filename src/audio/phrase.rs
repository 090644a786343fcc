//! Phrase segmentation: turns a stream of 16 kHz mono samples into one
//! spoken phrase.
//!
//! ```text
//!            voice frame                 pause ≥ pause_secs
//! Waiting ───────────────▶ Capturing ─────────────────────────▶ Phrase
//!    │                         │
//!    │ no voice for            │ length ≥ phrase_limit_secs
//!    │ listen_timeout_secs     └─────────────────────────────▶ Phrase
//!    ▼
//! TimedOut
//! ```
//!
//! A short pre-roll of the audio heard just before onset is kept so the
//! first syllable is not clipped.

use std::collections::VecDeque;
use std::time::Duration;

use crate::audio::resample::TARGET_RATE;
use crate::audio::vad::{VadDetector, FRAME_SAMPLES};
use crate::config::AudioConfig;

/// Audio kept from before speech onset.
const PREROLL_SAMPLES: usize = FRAME_SAMPLES * 10;

/// Time bounds for one [`PhraseDetector`] run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhraseLimits {
    /// Longest wait for speech to begin.
    pub listen_timeout: Duration,
    /// Longest phrase captured once speech has begun.
    pub phrase_limit: Duration,
    /// Silence that ends a phrase.
    pub pause: Duration,
}

impl From<&AudioConfig> for PhraseLimits {
    fn from(config: &AudioConfig) -> Self {
        Self {
            listen_timeout: secs(config.listen_timeout_secs),
            phrase_limit: secs(config.phrase_limit_secs),
            pause: secs(config.pause_secs),
        }
    }
}

fn secs(value: f32) -> Duration {
    Duration::from_secs_f32(value.max(0.0))
}

fn samples_for(d: Duration) -> usize {
    (d.as_secs_f64() * TARGET_RATE as f64).round() as usize
}

/// Result of listening for one phrase.
#[derive(Debug, Clone, PartialEq)]
pub enum PhraseOutcome {
    /// 16 kHz mono audio from just before onset to the end of the phrase.
    Phrase(Vec<f32>),
    /// Nobody spoke within the listen timeout.
    TimedOut,
}

#[derive(Debug)]
enum Phase {
    Waiting { waited: usize },
    Capturing { silence: usize },
    Done,
}

/// Incremental phrase detector.  Feed it audio with [`push`](Self::push)
/// until it returns an outcome.
#[derive(Debug)]
pub struct PhraseDetector {
    vad: VadDetector,
    timeout: usize,
    limit: usize,
    pause: usize,
    phase: Phase,
    pending: Vec<f32>,
    preroll: VecDeque<f32>,
    phrase: Vec<f32>,
}

impl PhraseDetector {
    pub fn new(vad: VadDetector, limits: PhraseLimits) -> Self {
        Self {
            vad,
            timeout: samples_for(limits.listen_timeout),
            limit: samples_for(limits.phrase_limit).max(FRAME_SAMPLES),
            pause: samples_for(limits.pause).max(FRAME_SAMPLES),
            phase: Phase::Waiting { waited: 0 },
            pending: Vec::with_capacity(FRAME_SAMPLES),
            preroll: VecDeque::with_capacity(PREROLL_SAMPLES),
            phrase: Vec::new(),
        }
    }

    /// `true` while speech is being captured.
    pub fn is_capturing(&self) -> bool {
        matches!(self.phase, Phase::Capturing { .. })
    }

    /// Feed 16 kHz mono samples.  Returns `Some` exactly once, when the
    /// phrase is complete or the wait has timed out; later calls return
    /// `None`.
    pub fn push(&mut self, samples: &[f32]) -> Option<PhraseOutcome> {
        if matches!(self.phase, Phase::Done) {
            return None;
        }
        self.pending.extend_from_slice(samples);

        let mut offset = 0;
        while self.pending.len() - offset >= FRAME_SAMPLES {
            let frame: Vec<f32> = self.pending[offset..offset + FRAME_SAMPLES].to_vec();
            offset += FRAME_SAMPLES;
            if let Some(outcome) = self.step(&frame) {
                self.pending.clear();
                return Some(outcome);
            }
        }
        self.pending.drain(..offset);
        None
    }

    /// End of input: a phrase in progress is returned as-is, otherwise the
    /// wait counts as timed out.
    pub fn finish(mut self) -> PhraseOutcome {
        match self.phase {
            Phase::Capturing { .. } => {
                self.phrase.extend_from_slice(&self.pending);
                PhraseOutcome::Phrase(self.phrase)
            }
            _ => PhraseOutcome::TimedOut,
        }
    }

    fn step(&mut self, frame: &[f32]) -> Option<PhraseOutcome> {
        let voice = self.vad.is_voice(frame);
        match &mut self.phase {
            Phase::Waiting { waited } => {
                if voice {
                    log::debug!("phrase: onset after {} samples", waited);
                    self.phrase.extend(self.preroll.drain(..));
                    self.phrase.extend_from_slice(frame);
                    self.phase = Phase::Capturing { silence: 0 };
                    return self.check_limit();
                }
                *waited += frame.len();
                if *waited >= self.timeout {
                    self.phase = Phase::Done;
                    return Some(PhraseOutcome::TimedOut);
                }
                self.preroll.extend(frame.iter().copied());
                let excess = self.preroll.len().saturating_sub(PREROLL_SAMPLES);
                self.preroll.drain(..excess);
                None
            }
            Phase::Capturing { silence } => {
                self.phrase.extend_from_slice(frame);
                if voice {
                    *silence = 0;
                } else {
                    *silence += frame.len();
                    if *silence >= self.pause {
                        return Some(self.complete());
                    }
                }
                self.check_limit()
            }
            Phase::Done => None,
        }
    }

    fn check_limit(&mut self) -> Option<PhraseOutcome> {
        (self.phrase.len() >= self.limit).then(|| self.complete())
    }

    fn complete(&mut self) -> PhraseOutcome {
        self.phase = Phase::Done;
        log::debug!("phrase: captured {} samples", self.phrase.len());
        PhraseOutcome::Phrase(std::mem::take(&mut self.phrase))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const SECOND: usize = TARGET_RATE as usize;

    fn limits() -> PhraseLimits {
        PhraseLimits {
            listen_timeout: Duration::from_secs(2),
            phrase_limit: Duration::from_secs(3),
            pause: Duration::from_millis(300),
        }
    }

    fn detector() -> PhraseDetector {
        PhraseDetector::new(VadDetector::new(0.05), limits())
    }

    fn feed(det: &mut PhraseDetector, audio: &[f32]) -> Option<PhraseOutcome> {
        // Uneven block sizes, like a real callback.
        for block in audio.chunks(1_000) {
            if let Some(outcome) = det.push(block) {
                return Some(outcome);
            }
        }
        None
    }

    #[test]
    fn silence_times_out() {
        let mut det = detector();
        assert_eq!(feed(&mut det, &vec![0.0; 3 * SECOND]), Some(PhraseOutcome::TimedOut));
    }

    #[test]
    fn silence_shorter_than_timeout_keeps_waiting() {
        let mut det = detector();
        assert_eq!(feed(&mut det, &vec![0.0; SECOND]), None);
        assert!(!det.is_capturing());
    }

    #[test]
    fn phrase_ends_on_pause() {
        let mut det = detector();
        let mut audio = vec![0.0; SECOND / 2];
        audio.extend(vec![0.3; SECOND]);
        audio.extend(vec![0.0; SECOND]);

        let Some(PhraseOutcome::Phrase(phrase)) = feed(&mut det, &audio) else {
            panic!("expected a phrase");
        };
        // Pre-roll + speech + the pause that ended it, but not the whole tail.
        assert!(phrase.len() >= SECOND);
        assert!(phrase.len() < SECOND + SECOND / 2 + PREROLL_SAMPLES);
        assert!(phrase.iter().any(|&s| s == 0.3));
    }

    #[test]
    fn continuous_speech_is_cut_at_limit() {
        let mut det = detector();
        let Some(PhraseOutcome::Phrase(phrase)) = feed(&mut det, &vec![0.3; 10 * SECOND]) else {
            panic!("expected a phrase");
        };
        assert!(phrase.len() >= 3 * SECOND);
        assert!(phrase.len() < 3 * SECOND + FRAME_SAMPLES);
    }

    #[test]
    fn preroll_is_kept() {
        let mut det = detector();
        let mut audio = vec![0.01; SECOND];
        audio.extend(vec![0.3; SECOND]);
        audio.extend(vec![0.0; SECOND]);

        let Some(PhraseOutcome::Phrase(phrase)) = feed(&mut det, &audio) else {
            panic!("expected a phrase");
        };
        assert_eq!(phrase[0], 0.01);
    }

    #[test]
    fn outcome_is_reported_once() {
        let mut det = detector();
        assert!(feed(&mut det, &vec![0.0; 3 * SECOND]).is_some());
        assert_eq!(det.push(&[0.3; 4 * FRAME_SAMPLES]), None);
    }

    #[test]
    fn finish_mid_phrase_returns_partial() {
        let mut det = detector();
        assert_eq!(feed(&mut det, &vec![0.3; SECOND]), None);
        assert!(det.is_capturing());
        match det.finish() {
            PhraseOutcome::Phrase(p) => assert_eq!(p.len(), SECOND),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn finish_while_waiting_is_timeout() {
        assert_eq!(detector().finish(), PhraseOutcome::TimedOut);
    }

    #[test]
    fn limits_from_config() {
        let l = PhraseLimits::from(&AudioConfig::default());
        assert_eq!(l.listen_timeout, Duration::from_secs_f32(10.0));
        assert_eq!(l.phrase_limit, Duration::from_secs_f32(15.0));
        assert_eq!(l.pause, Duration::from_secs_f32(0.8));
    }
}
