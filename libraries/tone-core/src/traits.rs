//! Core traits for the output boundary
use crate::error::Result;
use crate::types::AudioBuffer;

/// Destination for a fully processed buffer
///
/// Implemented by the WAV file writer and the realtime device player.
/// The processing engine never sees which one is in use.
pub trait AudioSink {
    /// Deliver the buffer (at its own sample rate) to the sink
    ///
    /// # Errors
    /// Returns an error if the file cannot be written or the device is unavailable.
    /// Sinks never swallow failures.
    fn deliver(&mut self, buffer: &AudioBuffer) -> Result<()>;

    /// Short human readable sink description (for logging)
    fn describe(&self) -> String;
}
