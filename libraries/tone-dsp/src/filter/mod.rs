//! Filter design and application
//!
//! Butterworth filters are designed in zero-pole-gain form and realised as a
//! cascade of second-order sections (biquads), which stays numerically sound
//! at cutoffs far below Nyquist where a single high-order polynomial does not.
//!
//! - [`FilterSpec`]: what to build (shape, order, cutoffs in Hz)
//! - [`SosFilter`]: designed coefficients, one [`Biquad`] per section
//! - [`SosState`]: delay registers for one channel of one filter

mod design;
mod sos;

pub use design::{design_butterworth, normalized_cutoff};
pub use sos::{Biquad, SosFilter, SosState};

/// Bass band lowpass cutoff
pub const BASS_CUTOFF_HZ: f64 = 200.0;

/// Lower edge of the mid band
pub const MID_LOW_HZ: f64 = 200.0;

/// Upper edge of the mid band
pub const MID_HIGH_HZ: f64 = 2000.0;

/// Treble band highpass cutoff
pub const TREBLE_CUTOFF_HZ: f64 = 4000.0;

/// Butterworth prototype order used for every band
pub const FILTER_ORDER: usize = 2;

/// Filter specification
///
/// Cutoffs are kept in Hz and converted to a fraction of Nyquist at design
/// time, once the sample rate is known.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterSpec {
    /// Passes frequencies below `cutoff_hz`
    Lowpass { order: usize, cutoff_hz: f64 },
    /// Passes frequencies between `low_hz` and `high_hz`
    Bandpass {
        order: usize,
        low_hz: f64,
        high_hz: f64,
    },
    /// Passes frequencies above `cutoff_hz`
    Highpass { order: usize, cutoff_hz: f64 },
}

impl FilterSpec {
    /// Bass band: lowpass at 200 Hz
    pub fn bass() -> Self {
        Self::Lowpass {
            order: FILTER_ORDER,
            cutoff_hz: BASS_CUTOFF_HZ,
        }
    }

    /// Mid band: bandpass 200-2000 Hz
    pub fn mid() -> Self {
        Self::Bandpass {
            order: FILTER_ORDER,
            low_hz: MID_LOW_HZ,
            high_hz: MID_HIGH_HZ,
        }
    }

    /// Treble band: highpass at 4000 Hz
    pub fn treble() -> Self {
        Self::Highpass {
            order: FILTER_ORDER,
            cutoff_hz: TREBLE_CUTOFF_HZ,
        }
    }

    /// Prototype order (a bandpass ends up with twice as many poles)
    pub fn order(&self) -> usize {
        match *self {
            Self::Lowpass { order, .. }
            | Self::Bandpass { order, .. }
            | Self::Highpass { order, .. } => order,
        }
    }

    /// Frequency where the designed filter has unity gain
    ///
    /// DC for lowpass, Nyquist for highpass, and the geometric band centre
    /// (after bilinear pre-warping) for bandpass.
    pub fn reference_hz(&self, sample_rate: f64) -> f64 {
        match *self {
            Self::Lowpass { .. } => 0.0,
            Self::Highpass { .. } => sample_rate / 2.0,
            Self::Bandpass {
                low_hz, high_hz, ..
            } => {
                // centre of the analog band, mapped back through the bilinear transform
                let warp = |hz: f64| (std::f64::consts::PI * hz / sample_rate).tan();
                let centre = (warp(low_hz) * warp(high_hz)).sqrt();
                centre.atan() * sample_rate / std::f64::consts::PI
            }
        }
    }
}
