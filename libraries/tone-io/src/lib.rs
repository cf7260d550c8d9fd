//! Tone Control I/O
//!
//! The boundary between the processing engine and the outside world:
//! - [`read_wav`] / [`write_wav`]: WAV decoding and encoding via `hound`,
//!   preserving the source container's sample format
//! - [`WavFileSink`]: an [`AudioSink`](tone_core::AudioSink) that writes a file
//! - [`DevicePlayer`]: an [`AudioSink`](tone_core::AudioSink) that plays through
//!   the default `cpal` output device in fixed-size chunks

#![forbid(unsafe_code)]

mod error;
mod playback;
mod wav;

pub use error::{IoError, Result};
pub use playback::{
    DevicePlayer, PlaybackConfig, PlaybackReport, DEFAULT_CHUNK_FRAMES, DEFAULT_QUEUE_CHUNKS,
    MIN_CHUNK_FRAMES,
};
pub use wav::{read_wav, write_wav, WavFileSink};

/// Re-exported so callers can carry the source container format around
pub use hound::{SampleFormat, WavSpec};
