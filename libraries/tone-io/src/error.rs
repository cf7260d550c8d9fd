//! I/O boundary errors
use thiserror::Error;

/// Result type for file and device operations
pub type Result<T> = std::result::Result<T, IoError>;

/// Errors raised at the file and device boundary
///
/// These are always passed up to the caller; nothing here retries.
#[derive(Debug, Error)]
pub enum IoError {
    /// WAV container could not be read or written
    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    /// No default output device
    #[error("Audio device not found")]
    DeviceNotFound,

    /// Sample layout the container or device cannot represent
    #[error("Unsupported audio format: {0}")]
    UnsupportedFormat(String),

    /// Failed to build output stream
    #[error("Failed to build output stream: {0}")]
    StreamBuild(String),

    /// Failed to start the stream
    #[error("Failed to play stream: {0}")]
    Play(String),

    /// Device went away or reported a stream error mid-playback
    #[error("Audio device disconnected: {0}")]
    Disconnected(String),

    /// Playback settings out of range
    #[error("Invalid playback configuration: {0}")]
    InvalidConfig(String),
}

impl From<cpal::BuildStreamError> for IoError {
    fn from(err: cpal::BuildStreamError) -> Self {
        match err {
            cpal::BuildStreamError::DeviceNotAvailable => {
                IoError::Disconnected("device not available".to_string())
            }
            cpal::BuildStreamError::StreamConfigNotSupported => {
                IoError::UnsupportedFormat("device does not support this stream config".to_string())
            }
            other => IoError::StreamBuild(other.to_string()),
        }
    }
}

impl From<cpal::PlayStreamError> for IoError {
    fn from(err: cpal::PlayStreamError) -> Self {
        IoError::Play(err.to_string())
    }
}

impl From<IoError> for tone_core::ToneError {
    fn from(err: IoError) -> Self {
        match err {
            IoError::Wav(hound::Error::IoError(e)) => tone_core::ToneError::Io(e),
            other => tone_core::ToneError::output(other.to_string()),
        }
    }
}
