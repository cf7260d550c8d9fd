//! Gain stage
//!
//! Master volume as a plain scalar multiply. No clipping happens here; the
//! tone stage clamps the final mix.
use crate::controls::{Control, Level};
use crate::error::Result;
use crate::stage::AudioStage;
use tone_core::AudioBuffer;

/// Linear multiplier for a volume setting
///
/// `10^((volume - 9) * 3 / 20)`, or exactly 0.0 below the silence threshold.
/// Settings too large for an `f32` multiplier saturate at `f32::MAX`.
pub fn volume_gain(volume: f32) -> Result<f32> {
    let gain = Level::new(Control::Volume, volume)?.gain();
    if gain > f64::from(f32::MAX) {
        tracing::debug!(volume, "volume multiplier saturates at f32::MAX");
        return Ok(f32::MAX);
    }
    Ok(gain as f32)
}

/// Scale every sample of `buffer` by the volume multiplier
///
/// Length, channel layout and rate are preserved. Settings above 10.0 keep
/// amplifying and may push samples outside [-1.0, 1.0]; that is left for the
/// tone stage to clip. Products saturate at `±f32::MAX`, so the output is
/// always finite for finite input.
pub fn apply_volume(buffer: &AudioBuffer, volume: f32) -> Result<AudioBuffer> {
    let mut stage = VolumeStage::new(volume)?;
    let mut out = buffer.clone();
    stage.process(&mut out.samples);
    Ok(out)
}

/// Stateless volume stage for the streaming pipeline
#[derive(Debug, Clone, Copy)]
pub struct VolumeStage {
    gain: f32,
}

impl VolumeStage {
    /// Create a volume stage from a knob setting
    pub fn new(volume: f32) -> Result<Self> {
        Ok(Self {
            gain: volume_gain(volume)?,
        })
    }
}

impl AudioStage for VolumeStage {
    fn process(&mut self, samples: &mut [f32]) {
        if self.gain == 0.0 {
            samples.fill(0.0);
            return;
        }
        if self.gain == 1.0 {
            return;
        }
        for sample in samples.iter_mut() {
            *sample = (*sample * self.gain).clamp(-f32::MAX, f32::MAX);
        }
    }

    fn reset(&mut self) {
        // Nothing to reset for gain
    }

    fn name(&self) -> &str {
        "Volume"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DspError;
    use crate::test_utils::generate_sine_wave;
    use tone_core::{AudioFormat, SampleRate};

    fn sine_buffer() -> AudioBuffer {
        let samples = generate_sine_wave(440.0, 44_100, 0.05, 0.8);
        AudioBuffer::new(samples, AudioFormat::mono(SampleRate::CD_QUALITY))
    }

    #[test]
    fn neutral_volume_is_identity() {
        let buffer = sine_buffer();
        let out = apply_volume(&buffer, 9.0).unwrap();
        assert_eq!(out, buffer);
    }

    #[test]
    fn silence_below_threshold() {
        let buffer = sine_buffer();
        for v in [0.0, 0.01, 0.09] {
            let out = apply_volume(&buffer, v).unwrap();
            assert_eq!(out.len(), buffer.len());
            assert!(out.samples.iter().all(|&s| s == 0.0));
        }
    }

    #[test]
    fn one_step_down_is_minus_three_db() {
        let gain = volume_gain(8.0).unwrap();
        let db = 20.0 * gain.log10();
        assert!((db + 3.0).abs() < 1e-4, "got {db} dB");
    }

    #[test]
    fn scaling_is_exact_multiply() {
        let buffer = sine_buffer();
        let gain = volume_gain(6.5).unwrap();
        let out = apply_volume(&buffer, 6.5).unwrap();

        for (o, i) in out.samples.iter().zip(&buffer.samples) {
            assert_eq!(*o, i * gain);
        }
    }

    #[test]
    fn does_not_clip() {
        let buffer = AudioBuffer::new(vec![0.9, -0.9], AudioFormat::mono(SampleRate::CD_QUALITY));
        let out = apply_volume(&buffer, 15.0).unwrap();
        assert!(out.samples[0] > 1.0);
        assert!(out.samples[1] < -1.0);
    }

    #[test]
    fn huge_volume_saturates_instead_of_overflowing() {
        assert_eq!(volume_gain(300.0).unwrap(), f32::MAX);

        let silent = AudioBuffer::new(vec![0.0; 8], AudioFormat::mono(SampleRate::CD_QUALITY));
        let out = apply_volume(&silent, 300.0).unwrap();
        assert!(out.samples.iter().all(|&s| s == 0.0));

        let hot = AudioBuffer::new(vec![0.5, -2.0], AudioFormat::mono(SampleRate::CD_QUALITY));
        let out = apply_volume(&hot, 300.0).unwrap();
        assert!(out.samples.iter().all(|s| s.is_finite()));
        assert_eq!(out.samples[1], -f32::MAX);
    }

    #[test]
    fn rejects_invalid_volume() {
        let buffer = sine_buffer();
        let err = apply_volume(&buffer, f32::NAN).unwrap_err();
        assert!(matches!(
            err,
            DspError::InvalidControlValue {
                control: Control::Volume,
                ..
            }
        ));
    }

    #[test]
    fn preserves_format() {
        let format = AudioFormat::new(SampleRate::DVD_QUALITY, 2, 24);
        let buffer = AudioBuffer::new(vec![0.1; 64], format);
        let out = apply_volume(&buffer, 4.0).unwrap();
        assert_eq!(out.format, format);
        assert_eq!(out.len(), 64);
    }
}
