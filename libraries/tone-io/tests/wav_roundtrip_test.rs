//! WAV files through the full read → process → write path

use hound::{SampleFormat, WavSpec, WavWriter};
use tempfile::tempdir;
use tone_core::AudioSink;
use tone_dsp::test_utils::{generate_sine_wave, interleave};
use tone_dsp::{process, Controls};
use tone_io::{read_wav, write_wav, WavFileSink};

fn write_source(path: &std::path::Path, spec: WavSpec, samples: &[f32]) {
    let mut writer = WavWriter::create(path, spec).unwrap();
    let scale = f64::from(1u32 << (spec.bits_per_sample - 1));
    for &s in samples {
        match spec.sample_format {
            SampleFormat::Float => writer.write_sample(s).unwrap(),
            SampleFormat::Int => writer
                .write_sample((f64::from(s) * scale).round() as i32)
                .unwrap(),
        }
    }
    writer.finalize().unwrap();
}

#[test]
fn processed_file_keeps_container_format() {
    let dir = tempdir().unwrap();

    for (bits, sample_format) in [
        (8, SampleFormat::Int),
        (16, SampleFormat::Int),
        (24, SampleFormat::Int),
        (32, SampleFormat::Float),
    ] {
        let spec = WavSpec {
            channels: 2,
            sample_rate: 48_000,
            bits_per_sample: bits,
            sample_format,
        };
        let left = generate_sine_wave(300.0, 48_000, 0.1, 0.3);
        let right = generate_sine_wave(3_000.0, 48_000, 0.1, 0.3);
        let input_path = dir.path().join(format!("in_{bits}.wav"));
        let output_path = dir.path().join(format!("out_{bits}.wav"));
        write_source(&input_path, spec, &interleave(&[left, right]));

        let (buffer, source_spec) = read_wav(&input_path).unwrap();
        assert_eq!(source_spec, spec);
        assert_eq!(buffer.frames(), 4_800);

        let processed = process(&buffer, &Controls::default()).unwrap();
        WavFileSink::new(&output_path, source_spec)
            .deliver(&processed)
            .unwrap();

        let (written, written_spec) = read_wav(&output_path).unwrap();
        assert_eq!(written_spec, spec, "{bits}-bit spec changed");
        assert_eq!(written.len(), buffer.len());
        assert!(written.samples.iter().all(|s| (-1.0..=1.0).contains(s)));
    }
}

#[test]
fn sixteen_bit_values_survive_rewrite() {
    let dir = tempdir().unwrap();
    let spec = WavSpec {
        channels: 1,
        sample_rate: 44_100,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let path = dir.path().join("grid.wav");
    let copy = dir.path().join("copy.wav");

    let source: Vec<f32> = (-50i16..50).map(|v| f32::from(v * 300) / 32_768.0).collect();
    write_source(&path, spec, &source);

    let (buffer, read_spec) = read_wav(&path).unwrap();
    write_wav(&copy, read_spec, &buffer).unwrap();
    let (again, _) = read_wav(&copy).unwrap();

    assert_eq!(again.samples, buffer.samples);
    assert_eq!(buffer.samples, source);
}
