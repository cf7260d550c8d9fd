//! Core error types for Tone Control
use thiserror::Error;

/// Result type alias using `ToneError`
pub type Result<T> = std::result::Result<T, ToneError>;

/// Core error type shared across the workspace
///
/// Library crates keep their own detailed error enums and convert into this
/// one at the boundary traits.
#[derive(Error, Debug)]
pub enum ToneError {
    /// Signal processing errors (invalid controls, sample rates, ...)
    #[error("Processing error: {0}")]
    Processing(String),

    /// Audio output errors (file writer, playback device)
    #[error("Output error: {0}")]
    Output(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ToneError {
    /// Create a processing error
    pub fn processing(msg: impl Into<String>) -> Self {
        Self::Processing(msg.into())
    }

    /// Create an output error
    pub fn output(msg: impl Into<String>) -> Self {
        Self::Output(msg.into())
    }
}
