//! Test signal generation
//!
//! All generators return mono samples; interleave them yourself for
//! multichannel tests.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;

/// Generate a mono sine wave
///
/// # Arguments
/// * `frequency` - Frequency in Hz
/// * `sample_rate` - Sample rate in Hz
/// * `duration` - Duration in seconds
/// * `amplitude` - Peak amplitude (0.0 to 1.0)
pub fn generate_sine_wave(
    frequency: f32,
    sample_rate: u32,
    duration: f32,
    amplitude: f32,
) -> Vec<f32> {
    let num_samples = (f64::from(sample_rate) * f64::from(duration)).round() as usize;
    let step = 2.0 * PI * f64::from(frequency) / f64::from(sample_rate);

    (0..num_samples)
        .map(|i| ((step * i as f64).sin() * f64::from(amplitude)) as f32)
        .collect()
}

/// Square wave at the Nyquist frequency: `+a, -a, +a, -a, ...`
pub fn generate_nyquist_square(num_samples: usize, amplitude: f32) -> Vec<f32> {
    (0..num_samples)
        .map(|i| if i % 2 == 0 { amplitude } else { -amplitude })
        .collect()
}

/// Uniform white noise in [-amplitude, amplitude]
///
/// Seeded so tests are reproducible.
pub fn generate_white_noise(num_samples: usize, amplitude: f32, seed: u64) -> Vec<f32> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..num_samples)
        .map(|_| rng.gen_range(-1.0f32..=1.0) * amplitude)
        .collect()
}

/// Interleave mono channels into one frame-ordered buffer
///
/// Every channel must have the same length.
pub fn interleave(channels: &[Vec<f32>]) -> Vec<f32> {
    let frames = channels.first().map_or(0, Vec::len);
    let mut out = Vec::with_capacity(frames * channels.len());
    for frame in 0..frames {
        for channel in channels {
            out.push(channel[frame]);
        }
    }
    out
}
