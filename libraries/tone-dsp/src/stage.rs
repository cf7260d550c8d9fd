//! Processing stage trait
//!
//! The pipeline is a fixed volume → tone sequence; both stages implement this
//! trait so they can be driven chunk by chunk.

/// A processing stage that transforms interleaved samples in place
///
/// # Real-Time Constraints
/// - Must NOT allocate memory in `process()`
/// - Must be Send so a pipeline can move to a playback feeder thread
pub trait AudioStage: Send {
    /// Process interleaved samples in place
    ///
    /// Consecutive calls continue the same stream: any recursive state
    /// carries over from the end of the previous call.
    fn process(&mut self, samples: &mut [f32]);

    /// Reset stream state (e.g. before processing an unrelated signal)
    fn reset(&mut self);

    /// Get stage name (for logging)
    fn name(&self) -> &str;
}
