//! User-facing control values
//!
//! Every knob is a non-negative number in "3 dB steps". Volume is neutral
//! (0 dB) at 9.0, each tone band at 5.0. Anything below 0.1 is silence.

use crate::error::{DspError, Result};
use std::fmt;

/// Level change per control step in dB
pub const DB_PER_STEP: f64 = 3.0;

/// Controls strictly below this value silence their channel entirely
pub const SILENCE_THRESHOLD: f32 = 0.1;

/// Volume setting that yields unity gain
pub const VOLUME_NEUTRAL: f32 = 9.0;

/// Tone band setting that yields unity gain
pub const TONE_NEUTRAL: f32 = 5.0;

/// Nominal top of the knob range; larger values extrapolate
const NOMINAL_MAX: f32 = 10.0;

/// Identifies one of the four knobs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    Volume,
    Bass,
    Mid,
    Treble,
}

impl Control {
    /// Setting that maps to 0 dB for this knob
    pub fn neutral(self) -> f32 {
        match self {
            Self::Volume => VOLUME_NEUTRAL,
            Self::Bass | Self::Mid | Self::Treble => TONE_NEUTRAL,
        }
    }

    /// Lowercase knob name, as used on the command line
    pub fn name(self) -> &'static str {
        match self {
            Self::Volume => "volume",
            Self::Bass => "bass",
            Self::Mid => "mid",
            Self::Treble => "treble",
        }
    }
}

impl fmt::Display for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A validated control value bound to its knob
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Level {
    control: Control,
    value: f32,
}

impl Level {
    /// Validate a raw control value
    ///
    /// Rejects NaN, infinities and negative numbers. Values above 10.0 are
    /// accepted and extrapolate along the same 3 dB law.
    pub fn new(control: Control, value: f32) -> Result<Self> {
        if !value.is_finite() || value < 0.0 {
            return Err(DspError::InvalidControlValue { control, value });
        }

        if value > NOMINAL_MAX {
            tracing::debug!(
                %control,
                value,
                "control above nominal range, extrapolating {:.1} dB",
                Self::db_for(value, control.neutral())
            );
        }

        Ok(Self { control, value })
    }

    /// Whether this setting silences its channel
    pub fn is_silent(&self) -> bool {
        self.value < SILENCE_THRESHOLD
    }

    /// Level relative to the knob's neutral point, in dB
    ///
    /// Returns `None` for silent settings.
    pub fn db(&self) -> Option<f64> {
        if self.is_silent() {
            None
        } else {
            Some(Self::db_for(self.value, self.control.neutral()))
        }
    }

    /// Linear gain for this setting (exactly 0.0 when silent)
    pub fn gain(&self) -> f64 {
        match self.db() {
            Some(db) => 10.0_f64.powf(db / 20.0),
            None => 0.0,
        }
    }

    fn db_for(value: f32, neutral: f32) -> f64 {
        (f64::from(value) - f64::from(neutral)) * DB_PER_STEP
    }
}

/// Complete set of knob positions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Controls {
    pub volume: f32,
    pub bass: f32,
    pub mid: f32,
    pub treble: f32,
}

impl Controls {
    /// All four knobs validated, in volume/bass/mid/treble order
    pub fn levels(&self) -> Result<[Level; 4]> {
        Ok([
            Level::new(Control::Volume, self.volume)?,
            Level::new(Control::Bass, self.bass)?,
            Level::new(Control::Mid, self.mid)?,
            Level::new(Control::Treble, self.treble)?,
        ])
    }

    /// Validate without keeping the levels
    pub fn validate(&self) -> Result<()> {
        self.levels().map(|_| ())
    }
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            volume: VOLUME_NEUTRAL,
            bass: TONE_NEUTRAL,
            mid: TONE_NEUTRAL,
            treble: TONE_NEUTRAL,
        }
    }
}
