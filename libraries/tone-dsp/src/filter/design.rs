//! Butterworth filter design
//!
//! Analog prototype → pre-warped frequency transform → bilinear transform →
//! second-order sections. Works on zeros/poles/gain throughout so no
//! high-order polynomial is ever expanded.

use super::sos::{Biquad, SosFilter};
use super::FilterSpec;
use crate::error::{DspError, Result};
use rustfft::num_complex::Complex64;
use std::f64::consts::PI;
use tone_core::SampleRate;

/// Design sample rate for the normalized frequency axis (Nyquist = 1.0)
const DESIGN_FS: f64 = 2.0;

/// Imaginary parts below this are treated as real roots
const REAL_TOLERANCE: f64 = 1e-10;

/// Zeros, poles and overall gain of a transfer function
#[derive(Debug, Clone)]
struct Zpk {
    zeros: Vec<Complex64>,
    poles: Vec<Complex64>,
    gain: f64,
}

impl Zpk {
    /// Excess of poles over zeros
    fn degree(&self) -> usize {
        self.poles.len().saturating_sub(self.zeros.len())
    }
}

/// Convert a cutoff in Hz into a fraction of Nyquist
///
/// The result must lie strictly inside (0, 1); anything at or above Nyquist
/// cannot be represented at this rate and is rejected.
pub fn normalized_cutoff(cutoff_hz: f64, sample_rate: SampleRate) -> Result<f64> {
    let rate = sample_rate.as_hz();
    if rate == 0 {
        return Err(DspError::InvalidSampleRate {
            rate,
            reason: "sample rate must be positive".to_string(),
        });
    }
    if !(cutoff_hz.is_finite() && cutoff_hz > 0.0) {
        return Err(DspError::InvalidFilterSpec(format!(
            "cutoff must be a positive frequency, got {cutoff_hz} Hz"
        )));
    }

    let wn = cutoff_hz / sample_rate.nyquist();
    if wn >= 1.0 {
        return Err(DspError::InvalidSampleRate {
            rate,
            reason: format!(
                "cutoff {cutoff_hz} Hz is at or above the Nyquist frequency {} Hz",
                sample_rate.nyquist()
            ),
        });
    }
    Ok(wn)
}

/// Design a digital Butterworth filter as second-order sections
pub fn design_butterworth(spec: &FilterSpec, sample_rate: SampleRate) -> Result<SosFilter> {
    let order = spec.order();
    if order == 0 {
        return Err(DspError::InvalidFilterSpec(
            "filter order must be at least 1".to_string(),
        ));
    }

    let prototype = butterworth_prototype(order);

    let analog = match *spec {
        FilterSpec::Lowpass { cutoff_hz, .. } => {
            let warped = prewarp(normalized_cutoff(cutoff_hz, sample_rate)?);
            lowpass_to_lowpass(&prototype, warped)
        }
        FilterSpec::Highpass { cutoff_hz, .. } => {
            let warped = prewarp(normalized_cutoff(cutoff_hz, sample_rate)?);
            lowpass_to_highpass(&prototype, warped)
        }
        FilterSpec::Bandpass {
            low_hz, high_hz, ..
        } => {
            if low_hz >= high_hz {
                return Err(DspError::InvalidFilterSpec(format!(
                    "band edges out of order: {low_hz} Hz >= {high_hz} Hz"
                )));
            }
            let low = prewarp(normalized_cutoff(low_hz, sample_rate)?);
            let high = prewarp(normalized_cutoff(high_hz, sample_rate)?);
            lowpass_to_bandpass(&prototype, (low * high).sqrt(), high - low)
        }
    };

    let digital = bilinear(&analog);
    Ok(SosFilter::new(to_sections(&digital)))
}

/// Analog Butterworth lowpass prototype with unit cutoff
///
/// Poles sit evenly on the left half of the unit circle, no zeros.
fn butterworth_prototype(order: usize) -> Zpk {
    let n = order as f64;
    let poles = (0..order)
        .map(|k| {
            let m = -n + 1.0 + 2.0 * k as f64;
            -Complex64::from_polar(1.0, PI * m / (2.0 * n))
        })
        .collect();

    Zpk {
        zeros: Vec::new(),
        poles,
        gain: 1.0,
    }
}

/// Pre-warp a normalized digital frequency to its analog equivalent
fn prewarp(wn: f64) -> f64 {
    2.0 * DESIGN_FS * (PI * wn / DESIGN_FS).tan()
}

fn lowpass_to_lowpass(proto: &Zpk, wo: f64) -> Zpk {
    let degree = proto.degree() as i32;
    Zpk {
        zeros: proto.zeros.iter().map(|z| *z * wo).collect(),
        poles: proto.poles.iter().map(|p| *p * wo).collect(),
        gain: proto.gain * wo.powi(degree),
    }
}

fn lowpass_to_highpass(proto: &Zpk, wo: f64) -> Zpk {
    let degree = proto.degree();

    let wo = Complex64::from(wo);
    let mut zeros: Vec<Complex64> = proto.zeros.iter().map(|z| wo / *z).collect();
    let poles = proto.poles.iter().map(|p| wo / *p).collect();
    // zeros at infinity move to the origin
    zeros.extend(std::iter::repeat(Complex64::new(0.0, 0.0)).take(degree));

    let num: Complex64 = proto.zeros.iter().map(|z| -*z).product();
    let den: Complex64 = proto.poles.iter().map(|p| -*p).product();

    Zpk {
        zeros,
        poles,
        gain: proto.gain * (num / den).re,
    }
}

fn lowpass_to_bandpass(proto: &Zpk, wo: f64, bw: f64) -> Zpk {
    let degree = proto.degree() as i32;
    let split = |roots: &[Complex64]| -> Vec<Complex64> {
        let scaled: Vec<Complex64> = roots.iter().map(|r| *r * (bw / 2.0)).collect();
        let upper = scaled.iter().map(|&r| r + (r * r - wo * wo).sqrt());
        let lower = scaled.iter().map(|&r| r - (r * r - wo * wo).sqrt());
        upper.chain(lower).collect()
    };

    let mut zeros = split(&proto.zeros);
    let poles = split(&proto.poles);
    zeros.extend(std::iter::repeat(Complex64::new(0.0, 0.0)).take(degree as usize));

    Zpk {
        zeros,
        poles,
        gain: proto.gain * bw.powi(degree),
    }
}

/// Bilinear transform from the s-plane to the z-plane
fn bilinear(analog: &Zpk) -> Zpk {
    let fs2 = Complex64::from(2.0 * DESIGN_FS);
    let degree = analog.degree();
    let map = |s: &Complex64| (fs2 + *s) / (fs2 - *s);

    let mut zeros: Vec<Complex64> = analog.zeros.iter().map(map).collect();
    let poles = analog.poles.iter().map(map).collect();
    // zeros at infinity land on Nyquist
    zeros.extend(std::iter::repeat(Complex64::new(-1.0, 0.0)).take(degree));

    let num: Complex64 = analog.zeros.iter().map(|z| fs2 - *z).product();
    let den: Complex64 = analog.poles.iter().map(|p| fs2 - *p).product();

    Zpk {
        zeros,
        poles,
        gain: analog.gain * (num / den).re,
    }
}

/// Group roots into pairs that each form a real quadratic
///
/// Complex roots are paired with their conjugates; real roots are paired in
/// ascending order. A leftover real root is paired with a root at the origin.
fn pair_roots(roots: &[Complex64]) -> Vec<(Complex64, Complex64)> {
    let mut pairs = Vec::with_capacity(roots.len().div_ceil(2));

    for root in roots.iter().filter(|r| r.im > REAL_TOLERANCE) {
        pairs.push((*root, root.conj()));
    }

    let mut reals: Vec<f64> = roots
        .iter()
        .filter(|r| r.im.abs() <= REAL_TOLERANCE)
        .map(|r| r.re)
        .collect();
    reals.sort_by(f64::total_cmp);

    for chunk in reals.chunks(2) {
        let first = Complex64::new(chunk[0], 0.0);
        let second = chunk
            .get(1)
            .map_or(Complex64::new(0.0, 0.0), |&r| Complex64::new(r, 0.0));
        pairs.push((first, second));
    }

    pairs
}

/// Coefficients `[1, c1, c2]` of `(1 - r1 z^-1)(1 - r2 z^-1)`
fn quadratic(pair: (Complex64, Complex64)) -> (f64, f64) {
    let (r1, r2) = pair;
    (-(r1 + r2).re, (r1 * r2).re)
}

/// Factor a digital zpk into biquads, overall gain on the first section
fn to_sections(digital: &Zpk) -> Vec<Biquad> {
    let mut zero_pairs = pair_roots(&digital.zeros);
    let mut pole_pairs = pair_roots(&digital.poles);

    let origin = (Complex64::new(0.0, 0.0), Complex64::new(0.0, 0.0));
    let count = zero_pairs.len().max(pole_pairs.len());
    zero_pairs.resize(count, origin);
    pole_pairs.resize(count, origin);

    let mut sections: Vec<Biquad> = zero_pairs
        .into_iter()
        .zip(pole_pairs)
        .map(|(zeros, poles)| {
            let (b1, b2) = quadratic(zeros);
            let (a1, a2) = quadratic(poles);
            Biquad {
                b0: 1.0,
                b1,
                b2,
                a1,
                a2,
            }
        })
        .collect();

    if let Some(first) = sections.first_mut() {
        *first = first.scaled(digital.gain);
    }

    sections
}
