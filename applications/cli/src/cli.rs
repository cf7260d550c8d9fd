//! Command-line arguments
use clap::Parser;
use std::path::PathBuf;

use crate::config::ToneConfig;

#[derive(Debug, Parser)]
#[command(name = "tone")]
#[command(about = "Apply volume and bass/mid/treble tone control to a WAV file", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Input WAV file
    pub input: PathBuf,

    /// Write the processed audio here instead of playing it
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Master volume, 0-10 in 3 dB steps (9 = unity)
    #[arg(long)]
    pub volume: Option<f32>,

    /// Bass level, 0-10 in 3 dB steps (5 = flat)
    #[arg(long)]
    pub bass: Option<f32>,

    /// Mid level, 0-10 in 3 dB steps (5 = flat)
    #[arg(long)]
    pub mid: Option<f32>,

    /// Treble level, 0-10 in 3 dB steps (5 = flat)
    #[arg(long)]
    pub treble: Option<f32>,

    /// Frames per playback chunk (minimum 1024)
    #[arg(long)]
    pub chunk_frames: Option<usize>,

    /// Configuration file path (defaults to ./tone.toml when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Fold command-line flags over the loaded configuration
    ///
    /// Flags win over file and environment values.
    pub fn apply_to(&self, config: &mut ToneConfig) {
        let controls = &mut config.controls;
        if let Some(v) = self.volume {
            controls.volume = v;
        }
        if let Some(v) = self.bass {
            controls.bass = v;
        }
        if let Some(v) = self.mid {
            controls.mid = v;
        }
        if let Some(v) = self.treble {
            controls.treble = v;
        }
        if let Some(frames) = self.chunk_frames {
            config.playback.chunk_frames = frames;
        }
    }
}
