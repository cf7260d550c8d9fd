//! Error types for the processing engine

use crate::controls::Control;
use thiserror::Error;

/// Result type for processing operations
pub type Result<T> = std::result::Result<T, DspError>;

/// Errors that can occur while configuring or running the engine
///
/// Every variant is raised before any sample is touched, so a failed call
/// never leaves a partially processed buffer behind.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DspError {
    /// Control value is not a finite, non-negative number
    #[error("Invalid {control} control value: {value} (must be a finite number >= 0.0)")]
    InvalidControlValue {
        /// Which knob was rejected
        control: Control,
        /// The offending value
        value: f32,
    },

    /// Sample rate is zero or too low for the fixed filter cutoffs
    #[error("Invalid sample rate: {rate} Hz ({reason})")]
    InvalidSampleRate {
        /// Rate in Hz
        rate: u32,
        /// What the rate cannot support
        reason: String,
    },

    /// Filter specification is malformed (band edges out of order, zero order, ...)
    #[error("Invalid filter specification: {0}")]
    InvalidFilterSpec(String),

    /// All three tone gains are zero, so normalization would divide by zero
    #[error("All tone band gains are zero; normalization is undefined")]
    DegenerateNormalization,

    /// Interleaved buffer does not hold a whole number of frames
    #[error("Buffer of {len} samples is not a whole number of {channels}-channel frames")]
    ChannelMismatch {
        /// Buffer length in samples
        len: usize,
        /// Channel count
        channels: usize,
    },
}

impl From<DspError> for tone_core::ToneError {
    fn from(err: DspError) -> Self {
        tone_core::ToneError::processing(err.to_string())
    }
}
