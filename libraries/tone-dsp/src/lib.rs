//! Tone Control DSP
//!
//! Master volume and three-band (bass/mid/treble) tone control for decoded
//! sample buffers.
//!
//! This crate provides:
//! - Control mapping: 0-10 knobs in 3 dB steps to linear gains
//! - Gain stage: scalar volume multiply
//! - Tone stage: Butterworth lowpass/bandpass/highpass bank applied in parallel,
//!   weighted by normalized band gains and hard clipped to [-1.0, 1.0]
//! - Streaming pipeline that keeps filter state across chunk boundaries
//!
//! # Architecture
//!
//! ```text
//!                              ┌── lowpass 200 Hz ────── × bass ──┐
//! ┌──────────┐   ┌────────┐    │                                  │   ┌──────┐
//! │ Samples  │ ─►│ Volume │ ──►├── bandpass 200-2000 Hz × mid ──┼─► │ Clip │ ─► sink
//! └──────────┘   └────────┘    │                                  │   └──────┘
//!                              └── highpass 4 kHz ────── × treble ┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use tone_core::{AudioBuffer, AudioFormat, SampleRate};
//! use tone_dsp::{apply_tone, apply_volume};
//!
//! # fn main() -> tone_dsp::Result<()> {
//! let format = AudioFormat::mono(SampleRate::CD_QUALITY);
//! let buffer = AudioBuffer::new(vec![0.25; 1024], format);
//!
//! let louder = apply_volume(&buffer, 10.0)?;         // +3 dB
//! let shaped = apply_tone(&louder, 7.0, 5.0, 3.0)?;  // more bass, less treble
//!
//! assert_eq!(shaped.len(), buffer.len());
//! assert!(shaped.samples.iter().all(|s| (-1.0..=1.0).contains(s)));
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

mod clip;
mod controls;
mod error;
pub mod filter;
mod gain;
mod pipeline;
mod stage;
mod tone;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use clip::hard_clip;
pub use controls::{
    Control, Controls, Level, DB_PER_STEP, SILENCE_THRESHOLD, TONE_NEUTRAL, VOLUME_NEUTRAL,
};
pub use error::{DspError, Result};
pub use gain::{apply_volume, volume_gain, VolumeStage};
pub use pipeline::{process, ProcessedChunks, TonePipeline};
pub use stage::AudioStage;
pub use tone::{apply_tone, BandGains, ToneFilterBank, ToneStage, GAIN_CEILING};
