//! Beat-frequency recognition for two-tone recordings.
//!
//! Combines two spectral analyses: the raw audio spectrum identifies the
//! carrier tones and predicts the beat rate as |f2 - f1|, while the
//! spectrum of the smoothed, mean-removed envelope measures the beat
//! rate actually present in the amplitude modulation. The two are
//! reported side by side with their relative error.

use tracing::debug;

use crate::envelope::{extract_envelope, DEFAULT_PAD_RATIO};
use crate::error::AnalysisError;
use crate::spectrum::{amplitude_spectrum, amplitude_spectrum_full, find_peaks, PeakConfig};

/// Recognition parameters
#[derive(Debug, Clone)]
pub struct BeatConfig {
    /// Carrier peaks below this frequency are treated as noise, Hz
    pub tone_floor_hz: f64,
    /// Fraction of the spectral maximum a carrier peak must exceed
    pub tone_height_ratio: f64,
    /// Minimum carrier peak spacing, Hz
    pub tone_separation_hz: f64,
    /// Band searched for the measured beat rate, Hz
    pub beat_band: (f64, f64),
    /// Envelope moving-average window, seconds. Any low-pass with a
    /// comparable cutoff works equally well here.
    pub smoothing_window: f64,
    /// Minimum spacing between envelope maxima in the counting fallback, seconds
    pub fallback_peak_spacing: f64,
}

impl Default for BeatConfig {
    fn default() -> Self {
        Self {
            tone_floor_hz: 50.0,
            tone_height_ratio: 0.15,
            // Close-frequency pairs a few Hz apart must survive de-duplication
            tone_separation_hz: 2.0,
            beat_band: (0.5, 30.0),
            smoothing_window: 0.01,
            fallback_peak_spacing: 0.05,
        }
    }
}

/// Full measured-vs-theoretical beat comparison
#[derive(Debug, Clone, PartialEq)]
pub struct BeatAnalysis {
    /// Lower carrier tone, Hz
    pub f1: f64,
    /// Upper carrier tone, Hz
    pub f2: f64,
    /// |f2 - f1|
    pub beat_theoretical: f64,
    /// Beat rate measured from the envelope
    pub beat_measured: f64,
    /// |measured - theoretical| / theoretical (0 when theoretical is 0)
    pub relative_error: f64,
    /// 1 / beat_theoretical (0 when undefined)
    pub period_theoretical: f64,
    /// 1 / beat_measured (0 when undefined)
    pub period_measured: f64,
}

/// Recognition result; fewer than two carrier tones is a reportable
/// outcome the caller can branch on, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum BeatOutcome {
    Beats(BeatAnalysis),
    InsufficientTones { detected: usize },
}

/// Recognize beats in a mono recording.
///
/// # Arguments
/// * `samples` - Mono audio samples, any scale (normalized internally)
/// * `sample_rate` - Sampling rate in Hz
/// * `config` - Recognition parameters
pub fn recognize_beats(
    samples: &[f64],
    sample_rate: f64,
    config: &BeatConfig,
) -> Result<BeatOutcome, AnalysisError> {
    if samples.is_empty() {
        return Err(AnalysisError::EmptyInput);
    }

    // Peak-normalize; an all-zero buffer passes through unchanged
    let max_abs = samples.iter().fold(0.0f64, |m, &x| m.max(x.abs()));
    let audio: Vec<f64> = if max_abs > 0.0 {
        samples.iter().map(|&x| x / max_abs).collect()
    } else {
        samples.to_vec()
    };

    // Carrier stage: dominant tones above the noise floor
    let spectrum = amplitude_spectrum(&audio, sample_rate);
    let tone_config = PeakConfig {
        height_ratio: config.tone_height_ratio,
        min_separation_hz: config.tone_separation_hz,
        band: Some((config.tone_floor_hz, sample_rate / 2.0)),
    };
    let peaks = find_peaks(&spectrum, &tone_config);

    if peaks.len() < 2 {
        debug!(detected = peaks.len(), "fewer than two carrier tones");
        return Ok(BeatOutcome::InsufficientTones { detected: peaks.len() });
    }

    let f1 = peaks[0].frequency.min(peaks[1].frequency);
    let f2 = peaks[0].frequency.max(peaks[1].frequency);
    let beat_theoretical = f2 - f1;

    // Envelope stage: the beat rate shows up as amplitude modulation
    let envelope = extract_envelope(&audio, DEFAULT_PAD_RATIO)?;
    let smooth_len = ((sample_rate * config.smoothing_window) as usize).max(1);
    let smoothed = moving_average(&envelope, smooth_len);

    let mean = smoothed.iter().sum::<f64>() / smoothed.len() as f64;
    let centered: Vec<f64> = smoothed.iter().map(|&e| e - mean).collect();

    // Full-length transform: beat resolution is sample_rate/len and
    // must keep improving with recording duration
    let env_spectrum = amplitude_spectrum_full(&centered, sample_rate);
    let beat_measured = strongest_in_band(&env_spectrum, config.beat_band).unwrap_or_else(|| {
        debug!("no envelope spectral peak in beat band, counting envelope maxima");
        count_envelope_peaks(&smoothed, sample_rate, config.fallback_peak_spacing)
    });

    let relative_error = if beat_theoretical > 0.0 {
        (beat_measured - beat_theoretical).abs() / beat_theoretical
    } else {
        0.0
    };

    Ok(BeatOutcome::Beats(BeatAnalysis {
        f1,
        f2,
        beat_theoretical,
        beat_measured,
        relative_error,
        period_theoretical: if beat_theoretical > 0.0 { 1.0 / beat_theoretical } else { 0.0 },
        period_measured: if beat_measured > 0.0 { 1.0 / beat_measured } else { 0.0 },
    }))
}

/// Centered moving average; the window is clipped at the ends
fn moving_average(data: &[f64], window: usize) -> Vec<f64> {
    let half = window / 2;
    let n = data.len();
    let mut out = Vec::with_capacity(n);

    for i in 0..n {
        let lo = i.saturating_sub(half);
        let hi = (i + half + 1).min(n);
        let sum: f64 = data[lo..hi].iter().sum();
        out.push(sum / (hi - lo) as f64);
    }

    out
}

/// Frequency of the strongest spectral bin inside (low, high), if any
/// bin there has positive amplitude
fn strongest_in_band(
    spectrum: &crate::spectrum::Spectrum,
    (low, high): (f64, f64),
) -> Option<f64> {
    let mut best: Option<(f64, f64)> = None;
    for (&f, &a) in spectrum.frequencies.iter().zip(&spectrum.amplitudes) {
        if f > low && f < high && a > 0.0 {
            if best.map_or(true, |(_, ba)| a > ba) {
                best = Some((f, a));
            }
        }
    }
    best.map(|(f, _)| f)
}

/// Count local maxima of the smoothed envelope (minimum spacing applied,
/// taller maxima win) and invert the mean inter-peak interval.
fn count_envelope_peaks(envelope: &[f64], sample_rate: f64, min_spacing_s: f64) -> f64 {
    let min_spacing = ((sample_rate * min_spacing_s) as usize).max(1);

    let mut maxima: Vec<usize> = (1..envelope.len().saturating_sub(1))
        .filter(|&i| envelope[i] > envelope[i - 1] && envelope[i] >= envelope[i + 1])
        .collect();
    maxima.sort_by(|&a, &b| {
        envelope[b].partial_cmp(&envelope[a]).unwrap_or(core::cmp::Ordering::Equal)
    });

    let mut kept: Vec<usize> = Vec::new();
    for i in maxima {
        if kept.iter().all(|&j| i.abs_diff(j) >= min_spacing) {
            kept.push(i);
        }
    }
    kept.sort_unstable();

    if kept.len() < 2 {
        return 0.0;
    }

    let intervals: Vec<f64> = kept
        .windows(2)
        .map(|w| (w[1] - w[0]) as f64 / sample_rate)
        .collect();
    let mean_interval = intervals.iter().sum::<f64>() / intervals.len() as f64;

    if mean_interval > 0.0 {
        1.0 / mean_interval
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::ComponentSet;
    use crate::grid::SampleGrid;
    use crate::synth::{synthesize_sine, WaveMode};

    fn two_tone(f1: f64, f2: f64, duration: f64, fs: f64) -> Vec<f64> {
        let grid = SampleGrid::from_duration(duration, fs).unwrap();
        let set = ComponentSet::beat_pair(f1, 1.0, f2, 1.0).unwrap();
        synthesize_sine(&grid, &set, WaveMode::Temporal)
    }

    #[test]
    fn test_two_tone_beat_recognition() {
        crate::tracing_init::init_test_tracing();

        let audio = two_tone(440.0, 444.0, 2.0, 44100.0);
        let outcome = recognize_beats(&audio, 44100.0, &BeatConfig::default()).unwrap();

        let analysis = match outcome {
            BeatOutcome::Beats(a) => a,
            other => panic!("expected beats, got {:?}", other),
        };
        assert!((analysis.f1 - 440.0).abs() < 2.0, "f1 {}", analysis.f1);
        assert!((analysis.f2 - 444.0).abs() < 2.0, "f2 {}", analysis.f2);
        assert!((analysis.beat_theoretical - 4.0).abs() < 0.5);
        assert!(
            (analysis.beat_measured - 4.0).abs() / 4.0 < 0.10,
            "measured beat {} outside 10% of 4 Hz",
            analysis.beat_measured
        );
        assert!(analysis.period_theoretical > 0.0);
    }

    #[test]
    fn test_single_tone_is_insufficient() {
        let grid = SampleGrid::from_duration(2.0, 44100.0).unwrap();
        let set = ComponentSet::uniform(440.0, 440.0, 1).unwrap();
        let audio = synthesize_sine(&grid, &set, WaveMode::Temporal);

        let outcome = recognize_beats(&audio, 44100.0, &BeatConfig::default()).unwrap();
        assert_eq!(outcome, BeatOutcome::InsufficientTones { detected: 1 });
    }

    #[test]
    fn test_empty_audio_is_error() {
        assert_eq!(
            recognize_beats(&[], 44100.0, &BeatConfig::default()),
            Err(AnalysisError::EmptyInput)
        );
    }

    #[test]
    fn test_silence_is_insufficient_not_crash() {
        let silence = vec![0.0; 44100];
        let outcome = recognize_beats(&silence, 44100.0, &BeatConfig::default()).unwrap();
        assert!(matches!(outcome, BeatOutcome::InsufficientTones { .. }));
    }

    #[test]
    fn test_unequal_amplitudes_still_detected() {
        let grid = SampleGrid::from_duration(3.0, 44100.0).unwrap();
        let set = ComponentSet::beat_pair(256.0, 1.0, 261.0, 0.6).unwrap();
        let audio = synthesize_sine(&grid, &set, WaveMode::Temporal);

        let outcome = recognize_beats(&audio, 44100.0, &BeatConfig::default()).unwrap();
        let analysis = match outcome {
            BeatOutcome::Beats(a) => a,
            other => panic!("expected beats, got {:?}", other),
        };
        assert!((analysis.beat_theoretical - 5.0).abs() < 0.7);
    }

    #[test]
    fn test_moving_average_flattens_ripple() {
        let data: Vec<f64> = (0..1000)
            .map(|i| 1.0 + 0.5 * (i as f64 * 0.9).sin())
            .collect();
        let smooth = moving_average(&data, 101);
        let ripple = smooth[300..700]
            .iter()
            .fold((f64::MAX, f64::MIN), |(lo, hi), &x| (lo.min(x), hi.max(x)));
        assert!(ripple.1 - ripple.0 < 0.1);
    }

    #[test]
    fn test_envelope_peak_counting_fallback() {
        // 4 Hz amplitude modulation directly as an "envelope"
        let fs = 1000.0;
        let env: Vec<f64> = (0..4000)
            .map(|i| 1.0 + (2.0 * std::f64::consts::PI * 4.0 * i as f64 / fs).cos())
            .collect();
        let rate = count_envelope_peaks(&env, fs, 0.05);
        assert!((rate - 4.0).abs() < 0.5, "counted rate {}", rate);
    }
}
