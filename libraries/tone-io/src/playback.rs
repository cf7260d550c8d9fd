//! Realtime playback through the default output device
//!
//! The calling thread feeds fixed-size chunks into a bounded queue; the cpal
//! audio callback drains it. If the queue runs dry the callback writes
//! silence and counts an underrun instead of blocking.

use crate::error::{IoError, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{BufferSize, Device, StreamConfig};
use crossbeam_channel::{bounded, select, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tone_core::{AudioBuffer, AudioFormat, AudioSink};

/// Frames per chunk unless configured otherwise
pub const DEFAULT_CHUNK_FRAMES: usize = 2048;

/// Smallest accepted chunk size
pub const MIN_CHUNK_FRAMES: usize = 1024;

/// Chunks buffered ahead of the audio callback
pub const DEFAULT_QUEUE_CHUNKS: usize = 4;

/// Extra time allowed on top of the stream duration before giving up
const PLAYBACK_GRACE: Duration = Duration::from_secs(5);

/// Playback buffering settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackConfig {
    /// Frames handed to the device per chunk
    pub chunk_frames: usize,
    /// How many chunks may wait in the queue
    pub queue_chunks: usize,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            chunk_frames: DEFAULT_CHUNK_FRAMES,
            queue_chunks: DEFAULT_QUEUE_CHUNKS,
        }
    }
}

impl PlaybackConfig {
    /// Config with the given chunk size and the default queue depth
    pub fn new(chunk_frames: usize) -> Result<Self> {
        let config = Self {
            chunk_frames,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Check chunk size and queue depth
    pub fn validate(&self) -> Result<()> {
        if self.chunk_frames < MIN_CHUNK_FRAMES {
            return Err(IoError::InvalidConfig(format!(
                "chunk_frames must be at least {MIN_CHUNK_FRAMES}, got {}",
                self.chunk_frames
            )));
        }
        if self.queue_chunks == 0 {
            return Err(IoError::InvalidConfig(
                "queue_chunks must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Interleaved samples per chunk for `channels` channels
    pub fn chunk_samples(&self, channels: u16) -> usize {
        self.chunk_frames * usize::from(channels.max(1))
    }
}

/// What happened during one playback
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaybackReport {
    /// Chunks queued to the device
    pub chunks: usize,
    /// Frames queued to the device
    pub frames: usize,
    /// Callbacks that found the queue empty and emitted silence
    pub underruns: usize,
}

/// Audio-callback side of the chunk queue
///
/// Owned by the cpal data callback. Never blocks; never logs.
struct ChunkFeeder {
    queue: Receiver<Vec<f32>>,
    current: Vec<f32>,
    offset: usize,
    underruns: Arc<AtomicUsize>,
    done: Sender<std::result::Result<(), String>>,
    finished: bool,
}

impl ChunkFeeder {
    fn new(
        queue: Receiver<Vec<f32>>,
        underruns: Arc<AtomicUsize>,
        done: Sender<std::result::Result<(), String>>,
    ) -> Self {
        Self {
            queue,
            current: Vec::new(),
            offset: 0,
            underruns,
            done,
            finished: false,
        }
    }

    /// Fill one device buffer, padding with silence when nothing is queued
    fn fill(&mut self, output: &mut [f32]) {
        let mut written = 0;

        while written < output.len() {
            if self.offset >= self.current.len() {
                match self.queue.try_recv() {
                    Ok(chunk) => {
                        self.current = chunk;
                        self.offset = 0;
                        continue;
                    }
                    Err(TryRecvError::Empty) => {
                        self.underruns.fetch_add(1, Ordering::Relaxed);
                        break;
                    }
                    Err(TryRecvError::Disconnected) => {
                        if !self.finished {
                            self.finished = true;
                            let _ = self.done.try_send(Ok(()));
                        }
                        break;
                    }
                }
            }

            let n = (output.len() - written).min(self.current.len() - self.offset);
            output[written..written + n]
                .copy_from_slice(&self.current[self.offset..self.offset + n]);
            written += n;
            self.offset += n;
        }

        output[written..].fill(0.0);
    }
}

/// Plays buffers on the default output device
///
/// Each call opens a fresh output stream at the buffer's own rate and
/// channel count, so no resampling happens here. Blocks until the last
/// chunk has been handed to the device.
pub struct DevicePlayer {
    device: Device,
    config: PlaybackConfig,
}

impl DevicePlayer {
    /// Open the host's default output device
    pub fn open_default(config: PlaybackConfig) -> Result<Self> {
        config.validate()?;
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(IoError::DeviceNotFound)?;

        tracing::info!(
            host = ?host.id(),
            chunk_frames = config.chunk_frames,
            queue_chunks = config.queue_chunks,
            "opened default output device"
        );

        Ok(Self { device, config })
    }

    /// Play a whole buffer, chunked by the configured size
    pub fn play(&mut self, buffer: &AudioBuffer) -> Result<PlaybackReport> {
        let chunk_len = self.config.chunk_samples(buffer.format.channels);
        let chunks = buffer.samples.chunks(chunk_len).map(<[f32]>::to_vec);
        self.play_chunks(buffer.format, chunks)
    }

    /// Play interleaved chunks as they are produced
    ///
    /// `chunks` may be a lazy iterator (for example a processing pipeline);
    /// it is pulled on the calling thread while the device plays.
    pub fn play_chunks<I>(&mut self, format: AudioFormat, chunks: I) -> Result<PlaybackReport>
    where
        I: IntoIterator<Item = Vec<f32>>,
    {
        let channels = format.channels.max(1);
        let rate = format.sample_rate.as_hz();
        let stream_config = StreamConfig {
            channels,
            sample_rate: rate,
            buffer_size: BufferSize::Default,
        };

        let (chunk_tx, chunk_rx) = bounded::<Vec<f32>>(self.config.queue_chunks);
        let (done_tx, done_rx) = bounded::<std::result::Result<(), String>>(2);
        let underruns = Arc::new(AtomicUsize::new(0));

        let mut feeder = ChunkFeeder::new(chunk_rx, Arc::clone(&underruns), done_tx.clone());
        let error_tx = done_tx;
        let stream = self.device.build_output_stream(
            &stream_config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| feeder.fill(data),
            move |err| {
                let _ = error_tx.try_send(Err(err.to_string()));
            },
            None,
        )?;

        let mut report = PlaybackReport::default();
        let mut chunks = chunks.into_iter();

        // prefill so the first callbacks find data
        let prefill = chunks.by_ref().take(self.config.queue_chunks);
        queue_chunks(prefill, &chunk_tx, &done_rx, channels, &mut report)?;

        stream.play()?;
        tracing::info!(rate, channels, "playback started");

        queue_chunks(chunks, &chunk_tx, &done_rx, channels, &mut report)?;
        drop(chunk_tx);

        let remaining = self.config.queue_chunks * self.config.chunk_frames;
        let timeout = Duration::from_secs_f64(remaining as f64 / f64::from(rate.max(1)))
            + PLAYBACK_GRACE;
        match done_rx.recv_timeout(timeout) {
            Ok(Ok(())) => {}
            Ok(Err(msg)) => return Err(IoError::Disconnected(msg)),
            Err(RecvTimeoutError::Timeout) => {
                return Err(IoError::Disconnected(
                    "device stopped consuming audio".to_string(),
                ))
            }
            Err(RecvTimeoutError::Disconnected) => return Err(stream_failure(None)),
        }

        // let the device drain its last buffer before the stream is dropped
        std::thread::sleep(Duration::from_secs_f64(
            self.config.chunk_frames as f64 / f64::from(rate.max(1)),
        ));
        drop(stream);

        report.underruns = underruns.load(Ordering::Relaxed);
        if report.underruns > 0 {
            tracing::warn!(
                underruns = report.underruns,
                "playback queue ran dry; silence was inserted"
            );
        }
        tracing::info!(
            chunks = report.chunks,
            frames = report.frames,
            "playback finished"
        );

        Ok(report)
    }
}

/// Hand chunks to the callback queue until `chunks` runs out or the
/// callback side goes away
///
/// Only chunks that were actually queued are counted in `report`.
fn queue_chunks<I>(
    chunks: I,
    chunk_tx: &Sender<Vec<f32>>,
    done_rx: &Receiver<std::result::Result<(), String>>,
    channels: u16,
    report: &mut PlaybackReport,
) -> Result<()>
where
    I: Iterator<Item = Vec<f32>>,
{
    for chunk in chunks {
        let frames = chunk.len() / usize::from(channels.max(1));
        select! {
            send(chunk_tx, chunk) -> sent => {
                if sent.is_err() {
                    break;
                }
                report.chunks += 1;
                report.frames += frames;
            }
            recv(done_rx) -> msg => {
                return Err(stream_failure(msg.ok()));
            }
        }
    }
    Ok(())
}

fn stream_failure(msg: Option<std::result::Result<(), String>>) -> IoError {
    match msg {
        Some(Err(err)) => IoError::Disconnected(err),
        Some(Ok(())) => IoError::Disconnected("stream ended before all audio was queued".to_string()),
        None => IoError::Disconnected("audio callback went away".to_string()),
    }
}

impl AudioSink for DevicePlayer {
    fn deliver(&mut self, buffer: &AudioBuffer) -> tone_core::Result<()> {
        self.play(buffer)?;
        Ok(())
    }

    fn describe(&self) -> String {
        format!(
            "default output device ({} frame chunks)",
            self.config.chunk_frames
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feeder(capacity: usize) -> (
        ChunkFeeder,
        Sender<Vec<f32>>,
        Receiver<std::result::Result<(), String>>,
        Arc<AtomicUsize>,
    ) {
        let (chunk_tx, chunk_rx) = bounded(capacity);
        let (done_tx, done_rx) = bounded(2);
        let underruns = Arc::new(AtomicUsize::new(0));
        let feeder = ChunkFeeder::new(chunk_rx, Arc::clone(&underruns), done_tx);
        (feeder, chunk_tx, done_rx, underruns)
    }

    #[test]
    fn config_defaults_and_minimum() {
        let config = PlaybackConfig::default();
        assert_eq!(config.chunk_frames, 2048);
        assert!(config.validate().is_ok());

        assert!(PlaybackConfig::new(1024).is_ok());
        assert!(matches!(
            PlaybackConfig::new(512),
            Err(IoError::InvalidConfig(_))
        ));

        let no_queue = PlaybackConfig {
            queue_chunks: 0,
            ..PlaybackConfig::default()
        };
        assert!(no_queue.validate().is_err());
    }

    #[test]
    fn chunk_samples_counts_all_channels() {
        assert_eq!(PlaybackConfig::default().chunk_samples(2), 4096);
        assert_eq!(PlaybackConfig::default().chunk_samples(0), 2048);
    }

    #[test]
    fn feeder_spans_chunk_boundaries() {
        let (mut feeder, tx, _done, underruns) = feeder(4);
        tx.send(vec![1.0, 2.0, 3.0]).unwrap();
        tx.send(vec![4.0, 5.0]).unwrap();

        let mut out = [0.0; 4];
        feeder.fill(&mut out);
        assert_eq!(out, [1.0, 2.0, 3.0, 4.0]);

        let mut out = [9.0; 3];
        feeder.fill(&mut out);
        assert_eq!(out, [5.0, 0.0, 0.0]);
        assert_eq!(underruns.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn empty_queue_is_silence_and_underrun() {
        let (mut feeder, _tx, done, underruns) = feeder(1);
        let mut out = [0.7; 8];
        feeder.fill(&mut out);

        assert!(out.iter().all(|&s| s == 0.0));
        assert_eq!(underruns.load(Ordering::Relaxed), 1);
        assert!(done.try_recv().is_err());
    }

    #[test]
    fn closed_queue_signals_completion_once() {
        let (mut feeder, tx, done, underruns) = feeder(1);
        tx.send(vec![0.5; 2]).unwrap();
        drop(tx);

        let mut out = [0.0; 4];
        feeder.fill(&mut out);
        assert_eq!(out, [0.5, 0.5, 0.0, 0.0]);
        feeder.fill(&mut out);

        assert_eq!(done.try_recv(), Ok(Ok(())));
        assert!(done.try_recv().is_err());
        assert_eq!(underruns.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn queued_chunks_are_counted() {
        let (chunk_tx, chunk_rx) = bounded(8);
        let (_done_tx, done_rx) = bounded(2);
        let mut report = PlaybackReport::default();

        let chunks = vec![vec![0.1; 4], vec![0.2; 4], vec![0.3; 2]];
        queue_chunks(chunks.into_iter(), &chunk_tx, &done_rx, 2, &mut report).unwrap();

        assert_eq!((report.chunks, report.frames), (3, 5));
        assert_eq!(chunk_rx.len(), 3);
    }

    #[test]
    fn chunks_refused_by_a_closed_queue_are_not_counted() {
        let (chunk_tx, chunk_rx) = bounded::<Vec<f32>>(8);
        let (_done_tx, done_rx) = bounded(2);
        drop(chunk_rx);
        let mut report = PlaybackReport::default();

        let chunks = vec![vec![0.1; 4], vec![0.2; 4]];
        queue_chunks(chunks.into_iter(), &chunk_tx, &done_rx, 2, &mut report).unwrap();

        assert_eq!(report, PlaybackReport::default());
    }

    #[test]
    fn stream_error_stops_queueing() {
        let (chunk_tx, _chunk_rx) = bounded::<Vec<f32>>(0);
        let (done_tx, done_rx) = bounded(2);
        done_tx.send(Err("unplugged".to_string())).unwrap();
        let mut report = PlaybackReport::default();

        let err = queue_chunks(std::iter::once(vec![0.0; 2]), &chunk_tx, &done_rx, 1, &mut report)
            .unwrap_err();

        assert!(matches!(err, IoError::Disconnected(msg) if msg == "unplugged"));
        assert_eq!(report.chunks, 0);
    }

    #[test]
    fn stream_failures_become_disconnects() {
        assert!(matches!(
            stream_failure(Some(Err("unplugged".to_string()))),
            IoError::Disconnected(msg) if msg == "unplugged"
        ));
        assert!(matches!(stream_failure(None), IoError::Disconnected(_)));
    }
}
