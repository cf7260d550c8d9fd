//! Volume → tone pipeline
//!
//! [`process`] is the one-shot path over a whole buffer. [`TonePipeline`]
//! runs the same two stages chunk by chunk and keeps filter state between
//! chunks, so a stream processed in pieces matches the one-shot result.

use crate::controls::Controls;
use crate::error::{DspError, Result};
use crate::gain::{apply_volume, VolumeStage};
use crate::stage::AudioStage;
use crate::tone::{apply_tone, ToneStage};
use tone_core::{AudioBuffer, AudioFormat};

/// Run the gain stage, then the tone stage, over a whole buffer
///
/// Output has the same length, channel layout and rate as `buffer`, with
/// every sample in [-1.0, 1.0].
pub fn process(buffer: &AudioBuffer, controls: &Controls) -> Result<AudioBuffer> {
    controls.validate()?;
    let louder = apply_volume(buffer, controls.volume)?;
    apply_tone(&louder, controls.bass, controls.mid, controls.treble)
}

/// Streaming gain + tone processor for one audio stream
///
/// Owns the running filter state of every band and channel. Use one pipeline
/// per stream; call [`reset`](Self::reset) before reusing it on unrelated
/// audio.
#[derive(Debug, Clone)]
pub struct TonePipeline {
    format: AudioFormat,
    volume: VolumeStage,
    tone: ToneStage,
    processed: usize,
}

impl TonePipeline {
    /// Validate the controls and design the filters for `format`
    pub fn new(format: AudioFormat, controls: &Controls) -> Result<Self> {
        controls.validate()?;
        let channels = usize::from(format.channels.max(1));
        let volume = VolumeStage::new(controls.volume)?;
        let tone = ToneStage::new(
            format.sample_rate,
            channels,
            controls.bass,
            controls.mid,
            controls.treble,
        )?;

        tracing::info!(
            rate = format.sample_rate.as_hz(),
            channels,
            volume = controls.volume,
            bass = controls.bass,
            mid = controls.mid,
            treble = controls.treble,
            "tone pipeline ready"
        );

        Ok(Self {
            format,
            volume,
            tone,
            processed: 0,
        })
    }

    /// Samples processed since creation or the last reset
    pub fn processed(&self) -> usize {
        self.processed
    }

    /// Process the next chunk of the stream in place
    pub fn process_chunk(&mut self, samples: &mut [f32]) {
        self.volume.process(samples);
        self.tone.process(samples);
        self.processed += samples.len();
    }

    /// Process a whole buffer as the continuation of the stream
    pub fn process_buffer(&mut self, buffer: &AudioBuffer) -> Result<AudioBuffer> {
        let channels = usize::from(self.format.channels.max(1));
        if buffer.len() % channels != 0 {
            return Err(DspError::ChannelMismatch {
                len: buffer.len(),
                channels,
            });
        }

        let mut out = buffer.clone();
        self.process_chunk(&mut out.samples);
        Ok(out)
    }

    /// Turn the pipeline into an iterator of processed chunks
    ///
    /// Each chunk holds up to `chunk_frames` frames; the last one may be
    /// shorter. A `chunk_frames` of zero is treated as one frame.
    pub fn into_chunks(self, samples: Vec<f32>, chunk_frames: usize) -> ProcessedChunks {
        let channels = usize::from(self.format.channels.max(1));
        ProcessedChunks {
            pipeline: self,
            samples,
            position: 0,
            chunk_len: chunk_frames.max(1) * channels,
        }
    }

    /// Clear all filter state
    pub fn reset(&mut self) {
        self.volume.reset();
        self.tone.reset();
        self.processed = 0;
    }
}

/// Iterator of processed chunks, see [`TonePipeline::into_chunks`]
#[derive(Debug)]
pub struct ProcessedChunks {
    pipeline: TonePipeline,
    samples: Vec<f32>,
    position: usize,
    chunk_len: usize,
}

impl Iterator for ProcessedChunks {
    type Item = Vec<f32>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.position >= self.samples.len() {
            return None;
        }

        let end = (self.position + self.chunk_len).min(self.samples.len());
        let mut chunk = self.samples[self.position..end].to_vec();
        self.pipeline.process_chunk(&mut chunk);
        self.position = end;

        if end == self.samples.len() {
            tracing::info!(samples = self.pipeline.processed(), "tone pipeline finished");
        }
        Some(chunk)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.samples.len().saturating_sub(self.position);
        let chunks = remaining.div_ceil(self.chunk_len);
        (chunks, Some(chunks))
    }
}
