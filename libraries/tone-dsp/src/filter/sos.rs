//! Second-order section cascade
//!
//! Each section runs in Direct Form II Transposed with f64 state. Filter
//! coefficients are immutable once designed; the running state lives in a
//! separate [`SosState`] so one filter can serve several channels.

use rustfft::num_complex::Complex64;
use std::f64::consts::PI;

/// Outputs below this magnitude are flushed to zero (denormal guard)
const DENORMAL_FLOOR: f64 = 1e-15;

/// Biquad coefficients (a0 normalized to 1)
///
/// Transfer function: H(z) = (b0 + b1*z^-1 + b2*z^-2) / (1 + a1*z^-1 + a2*z^-2)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Biquad {
    pub b0: f64,
    pub b1: f64,
    pub b2: f64,
    pub a1: f64,
    pub a2: f64,
}

impl Biquad {
    /// Pass-through section
    pub const UNITY: Self = Self {
        b0: 1.0,
        b1: 0.0,
        b2: 0.0,
        a1: 0.0,
        a2: 0.0,
    };

    /// Same section with its feed-forward coefficients multiplied by `gain`
    #[must_use]
    pub fn scaled(self, gain: f64) -> Self {
        Self {
            b0: self.b0 * gain,
            b1: self.b1 * gain,
            b2: self.b2 * gain,
            ..self
        }
    }

    /// Complex response at normalized angular frequency `omega` (radians/sample)
    pub fn response(&self, omega: f64) -> Complex64 {
        let z1 = Complex64::from_polar(1.0, -omega);
        let z2 = z1 * z1;
        let num = Complex64::from(self.b0) + z1 * self.b1 + z2 * self.b2;
        let den = Complex64::from(1.0) + z1 * self.a1 + z2 * self.a2;
        num / den
    }

    /// Both poles strictly inside the unit circle (stability triangle)
    pub fn is_stable(&self) -> bool {
        self.a2.abs() < 1.0 && self.a1.abs() < 1.0 + self.a2
    }

    #[inline]
    fn tick(&self, state: &mut [f64; 2], x: f64) -> f64 {
        let mut y = self.b0 * x + state[0];
        state[0] = self.b1 * x - self.a1 * y + state[1];
        state[1] = self.b2 * x - self.a2 * y;

        if y.abs() < DENORMAL_FLOOR {
            y = 0.0;
        }
        y
    }
}

impl Default for Biquad {
    fn default() -> Self {
        Self::UNITY
    }
}

/// Designed filter as a cascade of biquads
#[derive(Debug, Clone, PartialEq)]
pub struct SosFilter {
    sections: Vec<Biquad>,
}

impl SosFilter {
    /// Build a cascade from sections (an empty list acts as pass-through)
    pub fn new(sections: Vec<Biquad>) -> Self {
        let sections = if sections.is_empty() {
            vec![Biquad::UNITY]
        } else {
            sections
        };
        Self { sections }
    }

    /// Sections in processing order
    pub fn sections(&self) -> &[Biquad] {
        &self.sections
    }

    /// Overall filter order (non-trivial feedback taps across all sections)
    pub fn order(&self) -> usize {
        self.sections
            .iter()
            .map(|s| {
                if s.a2 != 0.0 {
                    2
                } else {
                    usize::from(s.a1 != 0.0)
                }
            })
            .sum()
    }

    /// Same filter with the overall gain multiplied by `gain`
    ///
    /// Only the first section's feed-forward taps change, which is the same
    /// as scaling the filter output. A gain of 0.0 yields exact silence.
    #[must_use]
    pub fn scaled(&self, gain: f64) -> Self {
        let mut sections = self.sections.clone();
        match sections.first_mut() {
            Some(first) => *first = first.scaled(gain),
            None => sections.push(Biquad::UNITY.scaled(gain)),
        }
        Self { sections }
    }

    /// Magnitude response at `freq_hz` for the given sample rate
    pub fn magnitude_at(&self, freq_hz: f64, sample_rate: f64) -> f64 {
        let omega = 2.0 * PI * freq_hz / sample_rate;
        self.sections
            .iter()
            .map(|s| s.response(omega))
            .product::<Complex64>()
            .norm()
    }

    /// Every section stable
    pub fn is_stable(&self) -> bool {
        self.sections.iter().all(Biquad::is_stable)
    }

    /// Fresh zeroed state sized for this filter
    pub fn new_state(&self) -> SosState {
        SosState {
            registers: vec![[0.0; 2]; self.sections.len()],
        }
    }

    /// Run one sample through the cascade
    #[inline]
    pub fn process_sample(&self, state: &mut SosState, x: f64) -> f64 {
        debug_assert_eq!(state.registers.len(), self.sections.len());
        self.sections
            .iter()
            .zip(state.registers.iter_mut())
            .fold(x, |acc, (section, regs)| section.tick(regs, acc))
    }

    /// Filter a whole mono signal from a zeroed state
    pub fn filter(&self, input: &[f32]) -> Vec<f64> {
        let mut state = self.new_state();
        input
            .iter()
            .map(|&x| self.process_sample(&mut state, f64::from(x)))
            .collect()
    }
}

/// Running delay registers of one filter for one channel
#[derive(Debug, Clone, PartialEq)]
pub struct SosState {
    registers: Vec<[f64; 2]>,
}

impl SosState {
    /// Clear all registers
    pub fn reset(&mut self) {
        for regs in &mut self.registers {
            *regs = [0.0; 2];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one_pole_smoother() -> SosFilter {
        // y[n] = 0.5 x[n] + 0.5 y[n-1]
        SosFilter::new(vec![Biquad {
            b0: 0.5,
            b1: 0.0,
            b2: 0.0,
            a1: -0.5,
            a2: 0.0,
        }])
    }

    #[test]
    fn impulse_response_matches_difference_equation() {
        let filter = one_pole_smoother();
        let out = filter.filter(&[1.0, 0.0, 0.0, 0.0]);
        assert_eq!(out, vec![0.5, 0.25, 0.125, 0.0625]);
    }

    #[test]
    fn empty_cascade_is_pass_through() {
        let filter = SosFilter::new(Vec::new());
        assert_eq!(filter.filter(&[0.25, -0.5]), vec![0.25, -0.5]);
        assert_eq!(filter.order(), 0);
        assert_eq!(filter.scaled(2.0).filter(&[0.25, -0.5]), vec![0.5, -1.0]);
    }

    #[test]
    fn scaling_gain_scales_output() {
        let filter = one_pole_smoother();
        let plain = filter.filter(&[1.0, 0.5, -0.25]);
        let scaled = filter.scaled(4.0).filter(&[1.0, 0.5, -0.25]);
        for (p, s) in plain.iter().zip(&scaled) {
            assert!((p * 4.0 - s).abs() < 1e-12);
        }
    }

    #[test]
    fn zero_gain_is_exact_silence() {
        let filter = one_pole_smoother().scaled(0.0);
        assert!(filter.filter(&[1.0, -1.0, 1.0]).iter().all(|&y| y == 0.0));
    }

    #[test]
    fn state_carries_between_calls() {
        let filter = one_pole_smoother();
        let mut state = filter.new_state();

        let first = filter.process_sample(&mut state, 1.0);
        let second = filter.process_sample(&mut state, 0.0);
        assert_eq!((first, second), (0.5, 0.25));
        assert_ne!(state, filter.new_state());

        state.reset();
        assert_eq!(state, filter.new_state());
        assert_eq!(filter.process_sample(&mut state, 0.0), 0.0);
    }

    #[test]
    fn stability_triangle() {
        assert!(one_pole_smoother().is_stable());
        let unstable = Biquad {
            a1: -2.1,
            a2: 1.05,
            ..Biquad::UNITY
        };
        assert!(!unstable.is_stable());
    }

    #[test]
    fn dc_response_of_smoother_is_unity() {
        let mag = one_pole_smoother().magnitude_at(0.0, 44_100.0);
        assert!((mag - 1.0).abs() < 1e-12);
    }

    #[test]
    fn tiny_outputs_flush_to_zero() {
        let filter = SosFilter::new(vec![Biquad::UNITY]);
        let out = filter.filter(&[1e-20]);
        assert_eq!(out, vec![0.0]);
    }
}
