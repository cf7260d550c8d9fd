//! Measurement helpers for verifying processed audio

use std::f64::consts::PI;

/// Calculate RMS (Root Mean Square) level
pub fn calculate_rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }

    let sum_squares: f64 = samples.iter().map(|&s| f64::from(s) * f64::from(s)).sum();
    (sum_squares / samples.len() as f64).sqrt() as f32
}

/// Calculate peak level
///
/// Returns the absolute maximum sample value.
pub fn calculate_peak(samples: &[f32]) -> f32 {
    samples.iter().map(|s| s.abs()).fold(0.0f32, f32::max)
}

/// Convert linear amplitude to dB
pub fn linear_to_db(linear: f32) -> f32 {
    if linear <= 0.0 {
        -100.0 // Silence
    } else {
        20.0 * linear.log10()
    }
}

/// Amplitude of a single frequency component
///
/// Correlates the signal against a complex exponential at `frequency`
/// (one DFT bin at an arbitrary frequency). Exact for a steady tone when the
/// window holds a whole number of periods.
pub fn measure_tone_amplitude(samples: &[f32], frequency: f32, sample_rate: u32) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }

    let step = 2.0 * PI * f64::from(frequency) / f64::from(sample_rate);
    let (re, im) = samples
        .iter()
        .enumerate()
        .fold((0.0f64, 0.0f64), |(re, im), (i, &s)| {
            let phase = step * i as f64;
            let s = f64::from(s);
            (re + s * phase.cos(), im - s * phase.sin())
        });

    (2.0 * re.hypot(im) / samples.len() as f64) as f32
}
