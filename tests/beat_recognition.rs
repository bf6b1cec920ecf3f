//! Beat recognition on synthetic two-tone recordings
//!
//! Exercises the recognizer end to end: clean tones, unequal
//! amplitudes, additive noise, and the degenerate inputs that must
//! come back as reportable outcomes instead of crashes.

use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use wavepacket::{
    recognize_beats, synthesize_sine, AnalysisError, BeatConfig, BeatOutcome, ComponentSet,
    SampleGrid, WaveMode,
};

use test_utils::init_test_tracing;

fn two_tone(f1: f64, a1: f64, f2: f64, a2: f64, duration: f64, fs: f64) -> Vec<f64> {
    let grid = SampleGrid::from_duration(duration, fs).expect("grid");
    let set = ComponentSet::beat_pair(f1, a1, f2, a2).expect("components");
    synthesize_sine(&grid, &set, WaveMode::Temporal)
}

fn expect_beats(outcome: BeatOutcome) -> wavepacket::BeatAnalysis {
    match outcome {
        BeatOutcome::Beats(a) => a,
        other => panic!("expected beats, got {:?}", other),
    }
}

#[test]
fn clean_440_444_pair() {
    init_test_tracing();

    let audio = two_tone(440.0, 1.0, 444.0, 1.0, 2.0, 44100.0);
    let analysis = expect_beats(recognize_beats(&audio, 44100.0, &BeatConfig::default()).unwrap());

    assert!((analysis.beat_theoretical - 4.0).abs() < 0.5);
    assert!(
        (analysis.beat_measured - 4.0).abs() / 4.0 < 0.10,
        "measured {} Hz outside 10% of 4 Hz",
        analysis.beat_measured
    );
    assert!(analysis.relative_error < 0.10);
    assert!((analysis.period_theoretical - 0.25).abs() < 0.05);
}

#[test]
fn noisy_tones_still_recognized() {
    init_test_tracing();

    let mut audio = two_tone(440.0, 1.0, 444.0, 1.0, 3.0, 44100.0);
    let mut rng = rand::rngs::StdRng::seed_from_u64(7);
    let noise = Normal::new(0.0, 0.05).unwrap();
    for sample in audio.iter_mut() {
        *sample += noise.sample(&mut rng);
    }

    let analysis = expect_beats(recognize_beats(&audio, 44100.0, &BeatConfig::default()).unwrap());
    assert!((analysis.f1 - 440.0).abs() < 2.0);
    assert!((analysis.f2 - 444.0).abs() < 2.0);
    assert!((analysis.beat_theoretical - 4.0).abs() < 0.5);
}

#[test]
fn long_recording_resolves_sub_hertz_beat_spacing() {
    init_test_tracing();

    // 2.36 Hz beat over 4 s: the envelope transform must run over the
    // whole recording (0.25 Hz bins) — a 65536-sample window would
    // floor the resolution at ~0.67 Hz and discard most of the signal,
    // pushing the measured rate ~30% off the carrier-derived one
    let audio = two_tone(440.0, 1.0, 442.36, 1.0, 4.0, 44100.0);
    let analysis = expect_beats(recognize_beats(&audio, 44100.0, &BeatConfig::default()).unwrap());

    assert!(
        (analysis.beat_measured - 2.36).abs() / 2.36 < 0.10,
        "measured {} Hz outside 10% of 2.36 Hz",
        analysis.beat_measured
    );
    assert!(
        analysis.relative_error < 0.15,
        "measured {} vs theoretical {} Hz: {:.1}% apart",
        analysis.beat_measured,
        analysis.beat_theoretical,
        analysis.relative_error * 100.0
    );
}

#[test]
fn helmholtz_pair_at_lower_frequencies() {
    let audio = two_tone(256.0, 1.0, 261.0, 1.0, 3.0, 44100.0);
    let analysis = expect_beats(recognize_beats(&audio, 44100.0, &BeatConfig::default()).unwrap());

    assert!((analysis.beat_theoretical - 5.0).abs() < 0.7);
    assert!(
        (analysis.beat_measured - 5.0).abs() / 5.0 < 0.15,
        "measured {} Hz",
        analysis.beat_measured
    );
}

#[test]
fn single_tone_reports_insufficient() {
    let grid = SampleGrid::from_duration(2.0, 44100.0).unwrap();
    let set = ComponentSet::uniform(440.0, 440.0, 1).unwrap();
    let audio = synthesize_sine(&grid, &set, WaveMode::Temporal);

    let outcome = recognize_beats(&audio, 44100.0, &BeatConfig::default()).unwrap();
    assert_eq!(outcome, BeatOutcome::InsufficientTones { detected: 1 });
}

#[test]
fn empty_audio_is_an_error() {
    assert_eq!(
        recognize_beats(&[], 44100.0, &BeatConfig::default()),
        Err(AnalysisError::EmptyInput)
    );
}

#[test]
fn pure_noise_does_not_crash() {
    let mut rng = rand::rngs::StdRng::seed_from_u64(42);
    let noise_dist = Normal::new(0.0, 1.0).unwrap();
    let noise: Vec<f64> = (0..44100).map(|_| noise_dist.sample(&mut rng)).collect();

    // Outcome depends on what the noise happens to contain; the only
    // requirement is that it never raises
    let outcome = recognize_beats(&noise, 44100.0, &BeatConfig::default());
    assert!(outcome.is_ok());
}
