//! Three-band tone stage
//!
//! Bass (lowpass), mid (bandpass) and treble (highpass) filters all read the
//! same input. Their outputs are weighted by normalized band gains, summed,
//! and hard clipped. This is a parallel bank; chaining the filters serially
//! would give a completely different response.

use crate::clip::hard_clip;
use crate::controls::{Control, Level};
use crate::error::{DspError, Result};
use crate::filter::{design_butterworth, FilterSpec, SosFilter, SosState};
use crate::stage::AudioStage;
use tone_core::{AudioBuffer, SampleRate};

/// Largest band gain after normalization
pub const GAIN_CEILING: f64 = 10.0;

/// Linear gains for the three bands
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandGains {
    pub bass: f64,
    pub mid: f64,
    pub treble: f64,
}

impl BandGains {
    /// Normalized gains for the three tone knobs
    ///
    /// The loudest audible band lands on [`GAIN_CEILING`] and the others keep
    /// their ratio to it. Works in dB so arbitrarily large settings cannot
    /// overflow: each gain is `10 * 10^((db - max_db) / 20)`. Silenced bands
    /// stay at exactly 0.0.
    ///
    /// Fails with [`DspError::DegenerateNormalization`] when every band is
    /// silenced, since there is nothing to scale against.
    pub fn normalized(bass: f32, mid: f32, treble: f32) -> Result<Self> {
        let levels = [
            Level::new(Control::Bass, bass)?.db(),
            Level::new(Control::Mid, mid)?.db(),
            Level::new(Control::Treble, treble)?.db(),
        ];

        let max_db = levels
            .iter()
            .flatten()
            .copied()
            .reduce(f64::max)
            .ok_or(DspError::DegenerateNormalization)?;

        let [bass, mid, treble] =
            levels.map(|db| db.map_or(0.0, |db| GAIN_CEILING * 10.0_f64.powf((db - max_db) / 20.0)));
        Ok(Self { bass, mid, treble })
    }
}

/// The three band filters designed for one sample rate
#[derive(Debug, Clone, PartialEq)]
pub struct ToneFilterBank {
    pub bass: SosFilter,
    pub mid: SosFilter,
    pub treble: SosFilter,
}

impl ToneFilterBank {
    /// Design the bass, mid and treble filters for `sample_rate`
    ///
    /// Fails if the rate is zero or places any cutoff at or above Nyquist.
    pub fn design(sample_rate: SampleRate) -> Result<Self> {
        let bank = Self {
            bass: design_butterworth(&FilterSpec::bass(), sample_rate)?,
            mid: design_butterworth(&FilterSpec::mid(), sample_rate)?,
            treble: design_butterworth(&FilterSpec::treble(), sample_rate)?,
        };

        tracing::debug!(
            rate = sample_rate.as_hz(),
            bass = ?bank.bass.sections(),
            mid = ?bank.mid.sections(),
            treble = ?bank.treble.sections(),
            "designed tone filter bank"
        );

        Ok(bank)
    }

    /// Fold band gains into the filters' feed-forward coefficients
    #[must_use]
    pub fn weighted(&self, gains: &BandGains) -> Self {
        Self {
            bass: self.bass.scaled(gains.bass),
            mid: self.mid.scaled(gains.mid),
            treble: self.treble.scaled(gains.treble),
        }
    }
}

/// Per-channel running state of the three band filters
#[derive(Debug, Clone)]
struct ChannelState {
    bass: SosState,
    mid: SosState,
    treble: SosState,
}

impl ChannelState {
    fn new(bank: &ToneFilterBank) -> Self {
        Self {
            bass: bank.bass.new_state(),
            mid: bank.mid.new_state(),
            treble: bank.treble.new_state(),
        }
    }

    fn reset(&mut self) {
        self.bass.reset();
        self.mid.reset();
        self.treble.reset();
    }
}

/// Stateful tone stage for interleaved audio
///
/// Keeps one set of filter registers per channel, so successive calls to
/// [`AudioStage::process`] continue the same stream without discontinuities.
/// Chunks do not need to be frame aligned.
#[derive(Debug, Clone)]
pub struct ToneStage {
    /// Gain-weighted filters, or `None` when every band is silenced
    bank: Option<ToneFilterBank>,
    channels: Vec<ChannelState>,
    /// Channel of the next incoming sample
    cursor: usize,
}

impl ToneStage {
    /// Validate the controls and design the filters for `sample_rate`
    pub fn new(sample_rate: SampleRate, channels: usize, bass: f32, mid: f32, treble: f32) -> Result<Self> {
        let gains = match BandGains::normalized(bass, mid, treble) {
            Ok(gains) => Some(gains),
            Err(DspError::DegenerateNormalization) => None,
            Err(e) => return Err(e),
        };
        let filters = ToneFilterBank::design(sample_rate)?;

        let bank = gains.map(|gains| filters.weighted(&gains));
        let channels = match &bank {
            Some(bank) => vec![ChannelState::new(bank); channels.max(1)],
            None => {
                tracing::warn!("bass, mid and treble are all silenced; tone stage outputs silence");
                Vec::new()
            }
        };

        Ok(Self {
            bank,
            channels,
            cursor: 0,
        })
    }
}

impl AudioStage for ToneStage {
    fn process(&mut self, samples: &mut [f32]) {
        let Some(bank) = &self.bank else {
            samples.fill(0.0);
            return;
        };

        let channel_count = self.channels.len();
        for sample in samples.iter_mut() {
            let state = &mut self.channels[self.cursor];
            let x = f64::from(*sample);

            let bass = bank.bass.process_sample(&mut state.bass, x);
            let mid = bank.mid.process_sample(&mut state.mid, x);
            let treble = bank.treble.process_sample(&mut state.treble, x);

            *sample = hard_clip(bass + mid + treble) as f32;
            self.cursor = (self.cursor + 1) % channel_count;
        }
    }

    fn reset(&mut self) {
        for state in &mut self.channels {
            state.reset();
        }
        self.cursor = 0;
    }

    fn name(&self) -> &str {
        "Tone"
    }
}

/// Apply the three-band tone control to a whole buffer
///
/// Filters are designed for the buffer's sample rate and run from a zeroed
/// state. Output has the same length and layout, with every sample in
/// [-1.0, 1.0]. If all three bands are silenced the result is silence.
pub fn apply_tone(buffer: &AudioBuffer, bass: f32, mid: f32, treble: f32) -> Result<AudioBuffer> {
    let channels = buffer.channels();
    if buffer.len() % channels != 0 {
        return Err(DspError::ChannelMismatch {
            len: buffer.len(),
            channels,
        });
    }

    let mut stage = ToneStage::new(buffer.sample_rate(), channels, bass, mid, treble)?;
    let mut out = buffer.clone();
    stage.process(&mut out.samples);
    Ok(out)
}
