//! One-sided amplitude spectra and peak detection.
//!
//! The analyzer serves two callers: carrier-tone detection on raw audio
//! and beat-rate detection on a mean-removed envelope restricted to a
//! low band. Both share the same spectrum and peak-picking code; the
//! callers differ only in their `PeakConfig`.

use rustfft::{num_complex::Complex, FftPlanner};
use tracing::trace;

/// Spectra longer than this are computed over a leading window of this
/// many samples; resolution stays sample_rate / window
pub const MAX_FFT_WINDOW: usize = 65536;

/// One-sided amplitude spectrum: parallel frequency/amplitude arrays
#[derive(Debug, Clone)]
pub struct Spectrum {
    /// Bin frequencies in Hz, 0..sample_rate/2
    pub frequencies: Vec<f64>,
    /// Bin amplitudes, (2/N)·|DFT|
    pub amplitudes: Vec<f64>,
}

impl Spectrum {
    /// Frequency resolution in Hz per bin
    pub fn resolution(&self) -> f64 {
        if self.frequencies.len() > 1 {
            self.frequencies[1] - self.frequencies[0]
        } else {
            0.0
        }
    }
}

/// Detected spectral peak
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectralPeak {
    pub frequency: f64,
    pub amplitude: f64,
}

/// Peak-picking parameters
#[derive(Debug, Clone)]
pub struct PeakConfig {
    /// Fraction of the global maximum a peak must exceed
    pub height_ratio: f64,
    /// Minimum spacing between reported peaks, Hz
    pub min_separation_hz: f64,
    /// Optional (low, high) band restriction in Hz
    pub band: Option<(f64, f64)>,
}

impl Default for PeakConfig {
    fn default() -> Self {
        Self {
            height_ratio: 0.10,
            min_separation_hz: 5.0,
            band: None,
        }
    }
}

/// Compute the one-sided amplitude spectrum of a real signal.
///
/// Bins run 0..sample_rate/2 at resolution sample_rate/N with amplitude
/// (2/N)·|DFT_k|. Signals longer than [`MAX_FFT_WINDOW`] are truncated
/// to that window first.
pub fn amplitude_spectrum(signal: &[f64], sample_rate: f64) -> Spectrum {
    spectrum_over(signal, sample_rate, signal.len().min(MAX_FFT_WINDOW))
}

/// Uncapped variant of [`amplitude_spectrum`]: transforms the whole
/// signal, so resolution keeps improving with length. Used for
/// slow-modulation analysis (beat rates of a fraction of a hertz) where
/// the capped window would floor the resolution.
pub fn amplitude_spectrum_full(signal: &[f64], sample_rate: f64) -> Spectrum {
    spectrum_over(signal, sample_rate, signal.len())
}

fn spectrum_over(signal: &[f64], sample_rate: f64, n: usize) -> Spectrum {
    if n == 0 {
        return Spectrum { frequencies: Vec::new(), amplitudes: Vec::new() };
    }

    let mut buf: Vec<Complex<f64>> =
        signal[..n].iter().map(|&x| Complex::new(x, 0.0)).collect();
    FftPlanner::new().plan_fft_forward(n).process(&mut buf);

    let half = n / 2;
    let df = sample_rate / n as f64;
    let scale = 2.0 / n as f64;

    let frequencies = (0..half).map(|i| i as f64 * df).collect();
    let amplitudes = buf[..half].iter().map(|c| scale * c.norm()).collect();

    Spectrum { frequencies, amplitudes }
}

/// Detect local maxima above `height_ratio` of the global maximum,
/// de-duplicated by `min_separation_hz` (the taller of two conflicting
/// peaks wins). Returns peaks sorted by descending amplitude.
pub fn find_peaks(spectrum: &Spectrum, config: &PeakConfig) -> Vec<SpectralPeak> {
    let amps = &spectrum.amplitudes;
    if amps.len() < 3 {
        return Vec::new();
    }

    let in_band = |f: f64| match config.band {
        Some((lo, hi)) => f > lo && f < hi,
        None => true,
    };

    // Global maximum over the band sets the height floor
    let mut global_max = 0.0f64;
    for (&f, &a) in spectrum.frequencies.iter().zip(amps) {
        if in_band(f) && a > global_max {
            global_max = a;
        }
    }
    if global_max <= 0.0 {
        return Vec::new();
    }
    let height = global_max * config.height_ratio;

    let mut candidates: Vec<SpectralPeak> = Vec::new();
    for i in 1..amps.len() - 1 {
        let f = spectrum.frequencies[i];
        if !in_band(f) {
            continue;
        }
        if amps[i] > amps[i - 1] && amps[i] >= amps[i + 1] && amps[i] >= height {
            candidates.push(SpectralPeak { frequency: f, amplitude: amps[i] });
        }
    }
    trace!(candidates = candidates.len(), height, "raw spectral maxima");

    // Tallest-first; drop anything too close to an already accepted peak
    candidates.sort_by(|a, b| {
        b.amplitude.partial_cmp(&a.amplitude).unwrap_or(core::cmp::Ordering::Equal)
    });
    let mut peaks: Vec<SpectralPeak> = Vec::new();
    for c in candidates {
        if peaks
            .iter()
            .all(|p| (p.frequency - c.frequency).abs() >= config.min_separation_hz)
        {
            peaks.push(c);
        }
    }

    peaks
}
