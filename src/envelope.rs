//! Analytic-signal envelope extraction.
//!
//! Computes the instantaneous envelope |analytic(x)| by zeroing the
//! negative-frequency half of the spectrum and inverse-transforming.
//! The transform assumes a periodic signal, so a finite window rings at
//! the edges; the signal is reflection-padded by `pad_ratio` of its
//! length at each end before the transform and the pads are discarded
//! afterwards, which pushes the ringing outside the returned window.
//!
//! The bound env >= |signal| holds reliably only in the interior; the
//! few samples nearest each boundary still carry residual truncation
//! error.

use rustfft::{num_complex::Complex, FftPlanner};

use crate::error::AnalysisError;

/// Fraction of the signal length mirrored onto each end before the transform
pub const DEFAULT_PAD_RATIO: f64 = 0.1;

/// Fewer samples than this cannot resolve an envelope at all
const MIN_SIGNAL_LEN: usize = 16;

/// Extract the non-negative envelope of `signal`.
///
/// # Arguments
/// * `signal` - Real input samples; callers should supply adequately
///   resolved grids (thousands of samples in practice)
/// * `pad_ratio` - Reflection padding as a fraction of the signal length
///   ([`DEFAULT_PAD_RATIO`] = 0.1)
///
/// # Returns
/// Envelope with the same length as `signal`, values >= 0
pub fn extract_envelope(signal: &[f64], pad_ratio: f64) -> Result<Vec<f64>, AnalysisError> {
    let n = signal.len();
    if n < MIN_SIGNAL_LEN {
        return Err(AnalysisError::SignalTooShort { len: n, min: MIN_SIGNAL_LEN });
    }

    let pad = ((n as f64 * pad_ratio) as usize).min(n - 1);
    let padded = reflect_pad(signal, pad);
    let magnitude = analytic_magnitude(&padded);

    Ok(magnitude[pad..pad + n].to_vec())
}

/// Mirror `pad` samples onto each end, excluding the edge sample itself:
/// [d c b | a b c d ... w x y z | y x w]
fn reflect_pad(signal: &[f64], pad: usize) -> Vec<f64> {
    let n = signal.len();
    let mut padded = Vec::with_capacity(n + 2 * pad);

    for i in (1..=pad).rev() {
        padded.push(signal[i]);
    }
    padded.extend_from_slice(signal);
    for i in 1..=pad {
        padded.push(signal[n - 1 - i]);
    }

    padded
}

/// |analytic(x)|: forward FFT, zero negative frequencies, double positive
/// ones (DC and Nyquist untouched), inverse FFT, magnitude.
fn analytic_magnitude(signal: &[f64]) -> Vec<f64> {
    let n = signal.len();
    let mut planner = FftPlanner::new();

    let mut buf: Vec<Complex<f64>> = signal.iter().map(|&x| Complex::new(x, 0.0)).collect();
    planner.plan_fft_forward(n).process(&mut buf);

    let half = n / 2;
    for (i, bin) in buf.iter_mut().enumerate() {
        if i == 0 || (n % 2 == 0 && i == half) {
            // DC and Nyquist stay as-is
        } else if i < half || (n % 2 == 1 && i == half) {
            *bin *= 2.0;
        } else {
            *bin = Complex::new(0.0, 0.0);
        }
    }

    planner.plan_fft_inverse(n).process(&mut buf);

    // rustfft leaves the inverse unscaled
    let scale = 1.0 / n as f64;
    buf.iter().map(|c| (c * scale).norm()).collect()
}
