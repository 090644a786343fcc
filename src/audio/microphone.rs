//! Blocking "listen for one phrase" on top of [`AudioCapture`].
//!
//! [`Microphone::calibrate`] samples ambient noise once and fixes the speech
//! threshold.  Each [`PhraseRecorder::record_phrase`] call then opens a fresh
//! stream, runs a [`PhraseDetector`] over it and closes the stream again, so
//! the device is idle while the interviewer is talking.

use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::{Duration, Instant};

use crate::audio::capture::{AudioCapture, AudioChunk, CaptureError};
use crate::audio::phrase::{PhraseDetector, PhraseLimits, PhraseOutcome};
use crate::audio::resample::TARGET_RATE;
use crate::audio::vad::VadDetector;
use crate::config::AudioConfig;

/// Longest gap between two callback buffers before the device is declared
/// stalled.
const STALL_TIMEOUT: Duration = Duration::from_secs(2);

/// Source of single spoken phrases.  Blocking; run it off the async
/// runtime.
pub trait PhraseRecorder: Send {
    fn record_phrase(&mut self) -> Result<PhraseOutcome, CaptureError>;
}

/// Calibrated microphone.
pub struct Microphone {
    capture: AudioCapture,
    vad: VadDetector,
    limits: PhraseLimits,
}

impl Microphone {
    /// Open the configured device and measure `calibration_secs` of ambient
    /// noise to set the speech threshold.
    pub fn calibrate(config: &AudioConfig) -> Result<Self, CaptureError> {
        let capture = AudioCapture::open(config.device.as_deref())?;

        let wanted = (config.calibration_secs.max(0.0) * TARGET_RATE as f32) as usize;
        let ambient = record_samples(&capture, wanted)?;
        let vad = VadDetector::calibrated(&ambient, config.energy_ratio, config.min_energy);
        log::info!(
            "microphone: calibrated on {} samples, threshold {:.4}",
            ambient.len(),
            vad.threshold()
        );

        Ok(Self {
            capture,
            vad,
            limits: PhraseLimits::from(config),
        })
    }

    pub fn threshold(&self) -> f32 {
        self.vad.threshold()
    }
}

impl PhraseRecorder for Microphone {
    fn record_phrase(&mut self) -> Result<PhraseOutcome, CaptureError> {
        let (tx, rx) = mpsc::channel::<AudioChunk>();
        let _handle = self.capture.start(tx)?;
        let mut detector = PhraseDetector::new(self.vad, self.limits);

        loop {
            match rx.recv_timeout(STALL_TIMEOUT) {
                Ok(chunk) => {
                    if let Some(outcome) = detector.push(&chunk.to_mono_16k()) {
                        return Ok(outcome);
                    }
                }
                Err(RecvTimeoutError::Timeout) => return Err(CaptureError::Stalled),
                Err(RecvTimeoutError::Disconnected) => return Ok(detector.finish()),
            }
        }
    }
}

/// Record `wanted` samples of 16 kHz mono audio.
fn record_samples(capture: &AudioCapture, wanted: usize) -> Result<Vec<f32>, CaptureError> {
    let (tx, rx) = mpsc::channel::<AudioChunk>();
    let _handle = capture.start(tx)?;
    let started = Instant::now();
    let mut samples = Vec::with_capacity(wanted);

    while samples.len() < wanted {
        match rx.recv_timeout(STALL_TIMEOUT) {
            Ok(chunk) => samples.extend(chunk.to_mono_16k()),
            Err(_) => {
                log::warn!(
                    "microphone: no audio after {:?} of calibration",
                    started.elapsed()
                );
                return Err(CaptureError::Stalled);
            }
        }
    }
    samples.truncate(wanted);
    Ok(samples)
}

// ---------------------------------------------------------------------------
// ScriptedRecorder  (test-only)
// ---------------------------------------------------------------------------

/// Replays a fixed list of outcomes, then reports a stall.
#[cfg(test)]
pub struct ScriptedRecorder {
    script: std::collections::VecDeque<Result<PhraseOutcome, CaptureError>>,
}

#[cfg(test)]
impl ScriptedRecorder {
    pub fn new(script: Vec<Result<PhraseOutcome, CaptureError>>) -> Self {
        Self {
            script: script.into(),
        }
    }
}

#[cfg(test)]
impl PhraseRecorder for ScriptedRecorder {
    fn record_phrase(&mut self) -> Result<PhraseOutcome, CaptureError> {
        self.script
            .pop_front()
            .unwrap_or(Err(CaptureError::Stalled))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_recorder_replays_in_order() {
        let mut rec = ScriptedRecorder::new(vec![
            Ok(PhraseOutcome::TimedOut),
            Ok(PhraseOutcome::Phrase(vec![0.1; 4])),
        ]);
        assert_eq!(rec.record_phrase().unwrap(), PhraseOutcome::TimedOut);
        assert!(matches!(
            rec.record_phrase().unwrap(),
            PhraseOutcome::Phrase(p) if p.len() == 4
        ));
        assert!(matches!(rec.record_phrase(), Err(CaptureError::Stalled)));
    }

    #[test]
    fn recorder_is_object_safe() {
        let _boxed: Box<dyn PhraseRecorder> = Box::new(ScriptedRecorder::new(Vec::new()));
    }
}
