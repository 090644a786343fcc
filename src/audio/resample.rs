//! Channel mixing and sample-rate conversion.
//!
//! Whisper wants **16 kHz mono `f32`**.  Microphones usually deliver 44.1 or
//! 48 kHz, often stereo.  Capture runs every callback buffer through
//! [`downmix`] and then [`resample_to_16k`].
//!
//! Resampling is linear interpolation.  Speech recognition is not sensitive
//! to the aliasing this introduces at these ratios.

/// Target rate for everything downstream of capture.
pub const TARGET_RATE: u32 = 16_000;

/// Average interleaved channels down to mono.
///
/// * `channels == 1` returns the input unchanged.
/// * `channels == 0` returns an empty vector.
/// * A trailing partial frame is dropped.
///
/// ```rust
/// use mock_interview::audio::downmix;
///
/// let stereo = vec![0.5_f32, -0.5, 0.2, 0.4]; // L R L R
/// let mono = downmix(&stereo, 2);
/// assert_eq!(mono.len(), 2);
/// assert!((mono[1] - 0.3).abs() < 1e-6);
/// ```
pub fn downmix(samples: &[f32], channels: u16) -> Vec<f32> {
    match channels {
        0 => Vec::new(),
        1 => samples.to_vec(),
        n => {
            let n = n as usize;
            samples
                .chunks_exact(n)
                .map(|frame| frame.iter().sum::<f32>() / n as f32)
                .collect()
        }
    }
}

/// Resample mono `samples` from `from_rate` to `to_rate` Hz.
///
/// Output length is `ceil(len * to_rate / from_rate)`.  Equal rates and
/// empty input are returned as-is; a zero rate yields an empty vector.
pub fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Vec<f32> {
    if from_rate == to_rate {
        return samples.to_vec();
    }
    if samples.is_empty() || from_rate == 0 || to_rate == 0 {
        return Vec::new();
    }

    let ratio = to_rate as f64 / from_rate as f64;
    let output_len = (samples.len() as f64 * ratio).ceil() as usize;
    let last = samples.len() - 1;

    (0..output_len)
        .map(|i| {
            let src_pos = i as f64 / ratio;
            let idx = (src_pos as usize).min(last);
            let frac = (src_pos - idx as f64) as f32;
            if idx < last {
                samples[idx] * (1.0 - frac) + samples[idx + 1] * frac
            } else {
                samples[last]
            }
        })
        .collect()
}

/// [`resample`] to [`TARGET_RATE`].
pub fn resample_to_16k(samples: &[f32], source_rate: u32) -> Vec<f32> {
    resample(samples, source_rate, TARGET_RATE)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
