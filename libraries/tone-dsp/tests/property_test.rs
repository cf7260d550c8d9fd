//! Property-based tests for the tone control engine
//!
//! These tests use proptest to verify invariants across many random inputs.

use proptest::prelude::*;
use tone_core::{AudioBuffer, AudioFormat, SampleRate};
use tone_dsp::{apply_tone, apply_volume, process, volume_gain, Controls, TonePipeline};

// Helper: wrap samples in a buffer
fn buffer(samples: Vec<f32>, channels: u16) -> AudioBuffer {
    AudioBuffer::new(samples, AudioFormat::new(SampleRate::CD_QUALITY, channels, 16))
}

// Helper: Check if buffer contains only finite values
fn all_finite(samples: &[f32]) -> bool {
    samples.iter().all(|s| s.is_finite())
}

proptest! {
    /// Property: the tone stage output never leaves [-1.0, 1.0]
    #[test]
    fn tone_output_is_clipped(
        bass in 0.0f32..12.0,
        mid in 0.0f32..12.0,
        treble in 0.0f32..12.0,
        samples in prop::collection::vec(-4.0f32..4.0, 1..2000)
    ) {
        let out = apply_tone(&buffer(samples, 1), bass, mid, treble).unwrap();
        prop_assert!(all_finite(&out.samples));
        prop_assert!(out.samples.iter().all(|s| (-1.0..=1.0).contains(s)));
    }

    /// Property: any accepted control settings give finite output in [-1.0, 1.0],
    /// and silence in is silence out
    #[test]
    fn extreme_controls_stay_bounded(
        volume in 0.0f32..5000.0,
        bass in 0.0f32..5000.0,
        mid in 0.0f32..5000.0,
        treble in 0.0f32..5000.0,
        samples in prop::collection::vec(-1.0f32..1.0, 1..500)
    ) {
        let controls = Controls { volume, bass, mid, treble };

        let out = process(&buffer(samples, 1), &controls).unwrap();
        prop_assert!(all_finite(&out.samples));
        prop_assert!(out.samples.iter().all(|s| (-1.0..=1.0).contains(s)));

        let quiet = process(&buffer(vec![0.0; 64], 1), &controls).unwrap();
        prop_assert!(quiet.samples.iter().all(|&s| s == 0.0));
    }

    /// Property: volume 9.0 leaves the buffer untouched
    #[test]
    fn neutral_volume_is_identity(samples in prop::collection::vec(-1.0f32..1.0, 0..1000)) {
        let input = buffer(samples, 1);
        prop_assert_eq!(apply_volume(&input, 9.0).unwrap(), input);
    }

    /// Property: volume is a plain multiply by `volume_gain`
    #[test]
    fn volume_is_linear(
        volume in 0.0f32..10.0,
        samples in prop::collection::vec(-1.0f32..1.0, 1..1000)
    ) {
        let input = buffer(samples, 1);
        let gain = volume_gain(volume).unwrap();
        let out = apply_volume(&input, volume).unwrap();

        for (o, i) in out.samples.iter().zip(&input.samples) {
            prop_assert_eq!(*o, i * gain);
        }
    }

    /// Property: each volume step is 3 dB
    #[test]
    fn volume_steps_are_three_db(volume in 0.1f32..9.0) {
        let ratio = volume_gain(volume + 1.0).unwrap() / volume_gain(volume).unwrap();
        let db = 20.0 * ratio.log10();
        prop_assert!((db - 3.0).abs() < 1e-3, "step was {} dB", db);
    }

    /// Property: below the threshold the output is silence of the same length
    #[test]
    fn low_volume_is_silence(
        volume in 0.0f32..0.0999,
        samples in prop::collection::vec(-1.0f32..1.0, 0..1000)
    ) {
        let input = buffer(samples, 1);
        let out = apply_volume(&input, volume).unwrap();
        prop_assert_eq!(out.len(), input.len());
        prop_assert!(out.samples.iter().all(|&s| s == 0.0));
    }

    /// Property: chunked streaming matches one-shot processing for any chunk size
    #[test]
    fn streaming_matches_one_shot(
        chunk_frames in 1usize..700,
        bass in 0.0f32..10.0,
        treble in 0.0f32..10.0,
        frames in prop::collection::vec((-1.0f32..1.0, -1.0f32..1.0), 1..1500)
    ) {
        let samples: Vec<f32> = frames.iter().flat_map(|&(l, r)| [l, r]).collect();
        let input = buffer(samples, 2);
        let controls = Controls { volume: 9.0, bass, mid: 5.0, treble };

        let expected = process(&input, &controls).unwrap();
        let streamed: Vec<f32> = TonePipeline::new(input.format, &controls)
            .unwrap()
            .into_chunks(input.samples.clone(), chunk_frames)
            .flatten()
            .collect();

        prop_assert_eq!(streamed, expected.samples);
    }
}
