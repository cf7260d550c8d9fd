//! Application configuration
use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tone_dsp::Controls;
use tone_io::{PlaybackConfig, DEFAULT_CHUNK_FRAMES, DEFAULT_QUEUE_CHUNKS};

/// Config file picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "tone.toml";

/// Prefix for environment overrides, e.g. `TONE_PLAYBACK__CHUNK_FRAMES`
pub const ENV_PREFIX: &str = "TONE";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ToneConfig {
    #[serde(default = "default_controls")]
    pub controls: ControlSettings,

    #[serde(default = "default_playback")]
    pub playback: PlaybackSettings,
}

/// Knob positions used when the command line does not give one
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ControlSettings {
    #[serde(default = "default_volume")]
    pub volume: f32,

    #[serde(default = "default_tone")]
    pub bass: f32,

    #[serde(default = "default_tone")]
    pub mid: f32,

    #[serde(default = "default_tone")]
    pub treble: f32,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PlaybackSettings {
    #[serde(default = "default_chunk_frames")]
    pub chunk_frames: usize,

    #[serde(default = "default_queue_chunks")]
    pub queue_chunks: usize,
}

impl ToneConfig {
    /// Load configuration from file and process environment
    ///
    /// `path` must exist when given; otherwise `tone.toml` in the working
    /// directory is used if present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, None)
    }

    /// Like [`load`](Self::load), reading overrides from `env` instead of the
    /// process environment when it is `Some`
    pub fn load_with_env(
        path: Option<&Path>,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(CliError::Config(format!(
                        "config file {} does not exist",
                        path.display()
                    )));
                }
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        // Override with environment variables (TONE_<SECTION>__<KEY>)
        settings = settings.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(env),
        );

        let config = settings.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Validate configuration
    ///
    /// Runs the same checks the engine and the device player apply, so a bad
    /// setting is reported the same way whichever path would hit it.
    pub fn validate(&self) -> Result<()> {
        self.controls()
            .validate()
            .map_err(|e| CliError::InvalidSetting(format!("controls: {e}")))?;
        self.playback_config()
            .validate()
            .map_err(|e| CliError::InvalidSetting(format!("playback: {e}")))?;
        Ok(())
    }

    /// Control defaults as engine controls
    pub fn controls(&self) -> Controls {
        Controls {
            volume: self.controls.volume,
            bass: self.controls.bass,
            mid: self.controls.mid,
            treble: self.controls.treble,
        }
    }

    /// Playback section as device player settings
    pub fn playback_config(&self) -> PlaybackConfig {
        PlaybackConfig {
            chunk_frames: self.playback.chunk_frames,
            queue_chunks: self.playback.queue_chunks,
        }
    }
}

// Default values
fn default_controls() -> ControlSettings {
    ControlSettings {
        volume: default_volume(),
        bass: default_tone(),
        mid: default_tone(),
        treble: default_tone(),
    }
}

fn default_volume() -> f32 {
    tone_dsp::VOLUME_NEUTRAL
}

fn default_tone() -> f32 {
    tone_dsp::TONE_NEUTRAL
}

fn default_playback() -> PlaybackSettings {
    PlaybackSettings {
        chunk_frames: default_chunk_frames(),
        queue_chunks: default_queue_chunks(),
    }
}

fn default_chunk_frames() -> usize {
    DEFAULT_CHUNK_FRAMES
}

fn default_queue_chunks() -> usize {
    DEFAULT_QUEUE_CHUNKS
}

impl Default for ToneConfig {
    fn default() -> Self {
        Self {
            controls: default_controls(),
            playback: default_playback(),
        }
    }
}
