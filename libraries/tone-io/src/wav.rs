//! WAV container reading and writing
//!
//! Integer PCM is scaled to [-1.0, 1.0) by dividing by `2^(bits-1)`; float
//! PCM passes through untouched. Writing reverses the same mapping, so a file
//! written with the source [`WavSpec`] keeps its bit depth and sample format.

use crate::error::{IoError, Result};
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::path::{Path, PathBuf};
use tone_core::{AudioBuffer, AudioFormat, AudioSink, SampleRate};

/// Full-scale value for an integer bit depth
fn int_scale(bits: u16) -> Result<f64> {
    match bits {
        8 | 16 | 24 | 32 => Ok(f64::from(1u32 << (bits - 1))),
        other => Err(IoError::UnsupportedFormat(format!(
            "{other}-bit integer PCM"
        ))),
    }
}

fn check_float(bits: u16) -> Result<()> {
    if bits == 32 {
        Ok(())
    } else {
        Err(IoError::UnsupportedFormat(format!("{bits}-bit float PCM")))
    }
}

/// Decode a WAV file into interleaved f32 samples
///
/// Returns the buffer together with the source container spec, which
/// [`write_wav`] and [`WavFileSink`] use to write output in the same format.
pub fn read_wav(path: impl AsRef<Path>) -> Result<(AudioBuffer, WavSpec)> {
    let path = path.as_ref();
    let reader = WavReader::open(path)?;
    let spec = reader.spec();

    let samples: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => {
            check_float(spec.bits_per_sample)?;
            reader
                .into_samples::<f32>()
                .collect::<std::result::Result<_, _>>()?
        }
        SampleFormat::Int => {
            let scale = int_scale(spec.bits_per_sample)?;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| (f64::from(v) / scale) as f32))
                .collect::<std::result::Result<_, _>>()?
        }
    };

    let format = AudioFormat::new(
        SampleRate::new(spec.sample_rate),
        spec.channels,
        spec.bits_per_sample,
    );
    let buffer = AudioBuffer::new(samples, format);

    tracing::info!(
        path = %path.display(),
        rate = spec.sample_rate,
        channels = spec.channels,
        bits = spec.bits_per_sample,
        format = ?spec.sample_format,
        frames = buffer.frames(),
        "decoded WAV file"
    );

    Ok((buffer, spec))
}

/// Encode `buffer` as a WAV file using the sample format of `spec`
///
/// Rate and channel count are taken from the buffer itself; bit depth and
/// int/float format from `spec`. Integer output saturates at full scale.
pub fn write_wav(path: impl AsRef<Path>, spec: WavSpec, buffer: &AudioBuffer) -> Result<()> {
    let path = path.as_ref();
    let spec = WavSpec {
        channels: buffer.format.channels.max(1),
        sample_rate: buffer.sample_rate().as_hz(),
        ..spec
    };

    // validate before the file is created
    let scale = match spec.sample_format {
        SampleFormat::Float => check_float(spec.bits_per_sample).map(|()| 1.0)?,
        SampleFormat::Int => int_scale(spec.bits_per_sample)?,
    };

    let mut writer = WavWriter::create(path, spec)?;
    match spec.sample_format {
        SampleFormat::Float => {
            for &sample in &buffer.samples {
                writer.write_sample(sample)?;
            }
        }
        SampleFormat::Int => {
            let (lo, hi) = (-scale, scale - 1.0);
            for &sample in &buffer.samples {
                let value = (f64::from(sample) * scale).round().clamp(lo, hi);
                writer.write_sample(value as i32)?;
            }
        }
    }
    writer.finalize()?;

    tracing::info!(
        path = %path.display(),
        rate = spec.sample_rate,
        channels = spec.channels,
        bits = spec.bits_per_sample,
        samples = buffer.len(),
        "wrote WAV file"
    );

    Ok(())
}

/// Sink that writes the processed buffer to a WAV file
#[derive(Debug, Clone)]
pub struct WavFileSink {
    path: PathBuf,
    spec: WavSpec,
}

impl WavFileSink {
    /// Write to `path` in the sample format described by `spec`
    pub fn new(path: impl Into<PathBuf>, spec: WavSpec) -> Self {
        Self {
            path: path.into(),
            spec,
        }
    }
}

impl AudioSink for WavFileSink {
    fn deliver(&mut self, buffer: &AudioBuffer) -> tone_core::Result<()> {
        write_wav(&self.path, self.spec, buffer)?;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("WAV file {}", self.path.display())
    }
}
