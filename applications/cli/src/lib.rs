//! Tone Control command-line application
//!
//! Reads a WAV file, runs it through the volume and tone stages, then either
//! writes the result to a WAV file (`--out`) or plays it on the default
//! output device.
//!
//! This library exposes the pieces of the `tone` binary for testing.

pub mod cli;
pub mod config;
pub mod error;

pub use cli::Cli;
pub use config::ToneConfig;
pub use error::{CliError, Result};

use anyhow::Context;
use std::path::Path;
use tone_core::AudioSink;
use tone_dsp::{process, Controls, TonePipeline};
use tone_io::{read_wav, DevicePlayer, WavFileSink};

/// Resolve settings, process the input and hand it to the chosen sink
pub fn run(cli: &Cli, config: &ToneConfig) -> anyhow::Result<()> {
    let mut config = config.clone();
    cli.apply_to(&mut config);
    config.validate().context("invalid settings")?;
    let controls = config.controls();

    let (buffer, spec) = read_wav(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;

    match &cli.out {
        Some(out) => write_to_file(&buffer, spec, &controls, out),
        None => play_on_device(buffer, &controls, &config),
    }
}

fn write_to_file(
    buffer: &tone_core::AudioBuffer,
    spec: tone_io::WavSpec,
    controls: &Controls,
    out: &Path,
) -> anyhow::Result<()> {
    let processed = process(buffer, controls).context("processing failed")?;

    let mut sink = WavFileSink::new(out, spec);
    tracing::info!(sink = %sink.describe(), "delivering output");
    sink.deliver(&processed)
        .with_context(|| format!("failed to write {}", out.display()))?;
    Ok(())
}

fn play_on_device(
    buffer: tone_core::AudioBuffer,
    controls: &Controls,
    config: &ToneConfig,
) -> anyhow::Result<()> {
    let format = buffer.format;
    let pipeline = TonePipeline::new(format, controls).context("processing failed")?;

    let mut player =
        DevicePlayer::open_default(config.playback_config()).context("no output device")?;
    tracing::info!(sink = %player.describe(), "delivering output");

    let chunks = pipeline.into_chunks(buffer.samples, config.playback.chunk_frames);
    player
        .play_chunks(format, chunks)
        .context("playback failed")?;
    Ok(())
}
