//! Procedural tone generation
//!
//! Pure functions that render short mono 8-bit buffers. No device, no
//! state; the same inputs always give the same square wave.

use std::time::Duration;

use rand::Rng;

/// Output sample rate (Hz)
pub const SAMPLE_RATE: u32 = 44_100;
/// Signed 8-bit samples
pub const BITS_PER_SAMPLE: u16 = 8;
/// Mono
pub const CHANNELS: u16 = 1;

/// Peak amplitude of a full-volume sample
const PEAK: f32 = 127.0;

/// A finished block of samples ready for playback
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ToneBuffer {
    pub samples: Vec<i8>,
}

impl ToneBuffer {
    pub fn silent(len: usize) -> Self {
        Self {
            samples: vec![0; len],
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }

    /// Playback length at [`SAMPLE_RATE`]
    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.samples.len() as f64 / SAMPLE_RATE as f64)
    }

    /// Largest absolute sample value
    pub fn peak(&self) -> u8 {
        self.samples
            .iter()
            .map(|s| s.unsigned_abs())
            .max()
            .unwrap_or(0)
    }
}

/// Number of samples for a duration in milliseconds (truncated)
pub fn sample_count(duration_ms: u32) -> usize {
    (SAMPLE_RATE as u64 * duration_ms as u64 / 1000) as usize
}

/// Linear fade from 1 toward `1 - fade` across the buffer
#[inline]
fn envelope(fade: f32, i: usize, len: usize) -> f32 {
    1.0 - fade * i as f32 / len as f32
}

/// Float to sample: truncates toward zero, saturates at the i8 range
#[inline]
fn to_sample(value: f32) -> i8 {
    value as i8
}

/// Square wave that flips sign every half period.
///
/// A frequency that is not a positive finite number, or too high to fit two
/// samples in a period, gives silence of the requested length.
pub fn square_wave(frequency_hz: f32, duration_ms: u32, volume: f32, fade: f32) -> ToneBuffer {
    let len = sample_count(duration_ms);
    if !(frequency_hz.is_finite() && frequency_hz > 0.0) {
        return ToneBuffer::silent(len);
    }
    let period = (SAMPLE_RATE as f32 / frequency_hz) as usize;
    if period < 2 {
        return ToneBuffer::silent(len);
    }

    let samples = (0..len)
        .map(|i| {
            let sign = if i % period < period / 2 { 1.0 } else { -1.0 };
            to_sample(sign * PEAK * volume * envelope(fade, i, len))
        })
        .collect();
    ToneBuffer { samples }
}

/// White noise burst with the same linear fade as [`square_wave`]
pub fn noise<R: Rng>(duration_ms: u32, volume: f32, fade: f32, rng: &mut R) -> ToneBuffer {
    let len = sample_count(duration_ms);
    let samples = (0..len)
        .map(|i| {
            let v = rng.random::<f32>() * 2.0 - 1.0;
            to_sample(v * PEAK * volume * envelope(fade, i, len))
        })
        .collect();
    ToneBuffer { samples }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_sample_count() {
        assert_eq!(sample_count(1000), 44_100);
        assert_eq!(sample_count(90), 3969);
        assert_eq!(sample_count(0), 0);
    }

    #[test]
    fn test_square_wave_shape() {
        // 441 Hz -> period of exactly 100 samples
        let tone = square_wave(441.0, 100, 1.0, 0.0);
        assert_eq!(tone.len(), 4410);
        assert_eq!(tone.samples[0], 127);
        assert_eq!(tone.samples[49], 127);
        assert_eq!(tone.samples[50], -127);
        assert_eq!(tone.samples[99], -127);
        assert_eq!(tone.samples[100], 127);
    }

    #[test]
    fn test_square_wave_fades() {
        let tone = square_wave(441.0, 100, 1.0, 1.0);
        let first = tone.samples[0].unsigned_abs();
        let last = tone.samples[tone.len() - 1].unsigned_abs();
        assert_eq!(first, 127);
        assert!(last <= 1, "tail should be near silent, got {last}");
        // Envelope only shrinks
        let mid = tone.samples[tone.len() / 2].unsigned_abs();
        assert!(mid < first && mid > last);
    }

    #[test]
    fn test_volume_scales_peak() {
        let tone = square_wave(200.0, 50, 0.5, 0.0);
        assert_eq!(tone.peak(), 63);
    }

    #[test]
    fn test_bad_frequency_is_silent() {
        for hz in [0.0, -10.0, f32::NAN, f32::INFINITY, 40_000.0] {
            let tone = square_wave(hz, 10, 1.0, 0.0);
            assert_eq!(tone.len(), 441);
            assert_eq!(tone.peak(), 0, "{hz} Hz should be silent");
        }
    }

    #[test]
    fn test_noise_bounds_and_length() {
        let mut rng = Pcg32::seed_from_u64(4);
        let tone = noise(400, 0.9, 1.2, &mut rng);
        assert_eq!(tone.len(), 17_640);
        assert!(tone.peak() <= 115);
        // Not a constant signal
        assert!(tone.samples.iter().any(|&s| s > 10));
        assert!(tone.samples.iter().any(|&s| s < -10));
    }

    #[test]
    fn test_noise_is_seed_stable() {
        let a = noise(20, 1.0, 0.5, &mut Pcg32::seed_from_u64(8));
        let b = noise(20, 1.0, 0.5, &mut Pcg32::seed_from_u64(8));
        assert_eq!(a, b);
    }

    #[test]
    fn test_duration() {
        let tone = square_wave(70.0, 120, 0.9, 1.2);
        let ms = tone.duration().as_secs_f64() * 1000.0;
        assert!((ms - 120.0).abs() < 0.1);
    }
}
