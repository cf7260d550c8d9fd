//! Hard clipping
//!
//! Plain clamp to the valid amplitude range. This is distortion prevention,
//! not a limiter: anything outside [-1.0, 1.0] is flattened.

/// Clamp a single sample to [-1.0, 1.0]
#[inline]
pub fn hard_clip(sample: f64) -> f64 {
    sample.clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_both_rails() {
        assert_eq!(hard_clip(3.5), 1.0);
        assert_eq!(hard_clip(-7.0), -1.0);
        assert_eq!(hard_clip(0.25), 0.25);
    }

    #[test]
    fn in_range_samples_pass_unchanged() {
        for x in [-1.0, -0.5, 0.0, 0.5, 1.0] {
            assert_eq!(hard_clip(x), x);
        }
        assert_eq!(hard_clip(f64::MAX), 1.0);
    }
}
