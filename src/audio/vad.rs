//! Energy-based voice activity detection.
//!
//! Audio is judged in 30 ms frames (480 samples @ 16 kHz).  A frame is voice
//! when its RMS exceeds the detector's threshold.  The threshold is set once
//! from a stretch of ambient noise ([`VadDetector::calibrated`]) so the same
//! code works in a quiet room and next to a fan.

/// 30 ms at 16 kHz.
pub const FRAME_SAMPLES: usize = 480;

/// Root-mean-square amplitude of `frame`; `0.0` for an empty slice.
pub fn frame_rms(frame: &[f32]) -> f32 {
    if frame.is_empty() {
        return 0.0;
    }
    let mean_sq = frame.iter().map(|s| s * s).sum::<f32>() / frame.len() as f32;
    mean_sq.sqrt()
}

/// Energy-threshold speech detector.
///
/// ```rust
/// use mock_interview::audio::VadDetector;
///
/// let vad = VadDetector::new(0.01);
///
/// let mut audio = vec![0.0_f32; 480];
/// audio.extend(vec![0.5_f32; 480]);
/// audio.extend(vec![0.0_f32; 480]);
///
/// assert_eq!(vad.trim_silence(&audio).len(), 480);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VadDetector {
    rms_threshold: f32,
}

impl VadDetector {
    pub fn new(rms_threshold: f32) -> Self {
        Self { rms_threshold }
    }

    /// Threshold = `ambient RMS × ratio`, never below `floor`.
    pub fn calibrated(ambient: &[f32], ratio: f32, floor: f32) -> Self {
        let ambient_rms = frame_rms(ambient);
        let threshold = (ambient_rms * ratio).max(floor);
        log::debug!("vad: ambient rms={ambient_rms:.5} threshold={threshold:.5}");
        Self::new(threshold)
    }

    pub fn threshold(&self) -> f32 {
        self.rms_threshold
    }

    pub fn is_voice(&self, frame: &[f32]) -> bool {
        !frame.is_empty() && frame_rms(frame) > self.rms_threshold
    }

    /// Sub-slice of `audio` from the first to the last voice frame; empty
    /// when nothing crosses the threshold.
    pub fn trim_silence<'a>(&self, audio: &'a [f32]) -> &'a [f32] {
        let frames: Vec<&[f32]> = audio.chunks(FRAME_SAMPLES).collect();
        let Some(first) = frames.iter().position(|f| self.is_voice(f)) else {
            return &audio[0..0];
        };
        let last = frames.iter().rposition(|f| self.is_voice(f)).unwrap_or(first);

        let start = first * FRAME_SAMPLES;
        let end = ((last + 1) * FRAME_SAMPLES).min(audio.len());
        &audio[start..end]
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
