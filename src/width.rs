//! Packet half-width estimation.
//!
//! Measures the localization width Δx of an envelope as the distance
//! between the first lateral minima on either side of the central
//! maximum. For a uniform-amplitude packet the envelope is sinc-shaped
//! and the lateral minima are the first side-lobe nulls, which is the
//! width that pairs with Δk to give Δx·Δk → 4π.
//!
//! When a qualifying minimum is missing on either side the estimator
//! falls back to full width at half maximum. For sinc envelopes that is
//! empirically ~0.6x the lateral-minimum width; the factor is an
//! observation, not a bound, and does not generalize to non-uniform
//! spectral weighting.

use tracing::debug;

use crate::constants::NUMERICAL_FLOOR;
use crate::error::AnalysisError;
use crate::grid::SampleGrid;

/// Tunable parameters for the lateral-minimum search
#[derive(Debug, Clone)]
pub struct WidthConfig {
    /// Normalized level a lateral minimum must fall below
    pub threshold: f64,
    /// Samples around the central maximum excluded from the search
    pub peak_margin: usize,
    /// Samples excluded at each end of the grid
    pub boundary_margin: usize,
    /// Envelope maxima below this count as "no signal"
    pub floor: f64,
}

impl Default for WidthConfig {
    fn default() -> Self {
        Self {
            threshold: 0.05,
            peak_margin: 10,
            boundary_margin: 10,
            floor: NUMERICAL_FLOOR,
        }
    }
}

/// Which rule produced the measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidthMethod {
    /// Distance between the first lateral minima below threshold
    LateralMinima,
    /// Full width at half maximum fallback
    HalfMaximum,
    /// Envelope below the numerical floor; width is zero
    NoSignal,
}

/// Measured half-width with its boundary indices into the grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WidthMeasurement {
    /// |coord[right] - coord[left]|
    pub width: f64,
    /// Left boundary index
    pub left: usize,
    /// Right boundary index, >= left
    pub right: usize,
    pub method: WidthMethod,
}

/// Measure the packet width of `envelope` over `grid`.
///
/// # Arguments
/// * `grid` - Coordinate axis the envelope is aligned to
/// * `envelope` - Non-negative envelope, same length as the grid
/// * `config` - Search thresholds and margins
pub fn measure_width(
    grid: &SampleGrid,
    envelope: &[f64],
    config: &WidthConfig,
) -> Result<WidthMeasurement, AnalysisError> {
    let n = envelope.len();
    if n != grid.len() {
        return Err(AnalysisError::LengthMismatch { grid: grid.len(), envelope: n });
    }
    if n == 0 {
        return Err(AnalysisError::EmptyInput);
    }

    let max_env = envelope.iter().cloned().fold(f64::MIN, f64::max);
    if max_env < config.floor {
        return Ok(WidthMeasurement {
            width: 0.0,
            left: 0,
            right: n - 1,
            method: WidthMethod::NoSignal,
        });
    }

    let norm: Vec<f64> = envelope.iter().map(|&e| e / max_env).collect();
    let center = norm
        .iter()
        .enumerate()
        .fold((0, f64::MIN), |(im, m), (i, &e)| if e > m { (i, e) } else { (im, m) })
        .0;

    let left = search_left(&norm, center, config);
    let right = search_right(&norm, center, config);

    let (left, right, method) = match (left, right) {
        (Some(l), Some(r)) => (l, r, WidthMethod::LateralMinima),
        _ => {
            debug!(center, "no qualifying lateral minima, falling back to FWHM");
            match half_maximum_bounds(&norm) {
                Some((l, r)) => (l, r, WidthMethod::HalfMaximum),
                None => {
                    return Ok(WidthMeasurement {
                        width: 0.0,
                        left: 0,
                        right: n - 1,
                        method: WidthMethod::NoSignal,
                    })
                }
            }
        }
    };

    let coords = grid.coords();
    Ok(WidthMeasurement {
        width: (coords[right] - coords[left]).abs(),
        left,
        right,
        method,
    })
}

/// First strict local minimum below threshold, scanning outward to the left
fn search_left(norm: &[f64], center: usize, config: &WidthConfig) -> Option<usize> {
    let start = center.saturating_sub(config.peak_margin);
    let mut i = start;
    while i > config.boundary_margin {
        if i >= 1 && i + 1 < norm.len() && is_minimum_below(norm, i, config.threshold) {
            return Some(i);
        }
        i -= 1;
    }
    None
}

/// First strict local minimum below threshold, scanning outward to the right
fn search_right(norm: &[f64], center: usize, config: &WidthConfig) -> Option<usize> {
    let end = norm.len().saturating_sub(config.boundary_margin);
    for i in (center + config.peak_margin)..end {
        if i >= 1 && i + 1 < norm.len() && is_minimum_below(norm, i, config.threshold) {
            return Some(i);
        }
    }
    None
}

fn is_minimum_below(norm: &[f64], i: usize, threshold: f64) -> bool {
    norm[i] < norm[i - 1] && norm[i] < norm[i + 1] && norm[i] < threshold
}

/// Leftmost/rightmost index where the normalized envelope exceeds 0.5
fn half_maximum_bounds(norm: &[f64]) -> Option<(usize, usize)> {
    let left = norm.iter().position(|&e| e > 0.5)?;
    let right = norm.iter().rposition(|&e| e > 0.5)?;
    Some((left, right))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::ComponentSet;
    use crate::envelope::{extract_envelope, DEFAULT_PAD_RATIO};
    use crate::synth::{synthesize, WaveMode};

    fn packet_envelope(f_min: f64, f_max: f64, m: usize) -> (SampleGrid, Vec<f64>) {
        let grid = SampleGrid::symmetric(35.0, 10000).unwrap();
        let set = ComponentSet::uniform(f_min, f_max, m).unwrap();
        let signal = synthesize(&grid, &set, WaveMode::Spatial { velocity: 340.0 });
        let env = extract_envelope(&signal, DEFAULT_PAD_RATIO).unwrap();
        (grid, env)
    }

    #[test]
    fn test_zero_envelope_returns_zero_width() {
        let grid = SampleGrid::symmetric(10.0, 1000).unwrap();
        let env = vec![0.0; 1000];
        let m = measure_width(&grid, &env, &WidthConfig::default()).unwrap();
        assert_eq!(m.width, 0.0);
        assert_eq!(m.left, 0);
        assert_eq!(m.right, 999);
        assert_eq!(m.method, WidthMethod::NoSignal);
    }

    #[test]
    fn test_lateral_minima_on_sinc_packet() {
        let (grid, env) = packet_envelope(100.0, 130.0, 50);
        let m = measure_width(&grid, &env, &WidthConfig::default()).unwrap();
        assert_eq!(m.method, WidthMethod::LateralMinima);
        assert!(m.right > m.left);
        assert!(m.width > 0.0);

        // Width between first nulls: Δx = 4π/Δk
        let delta_k = 2.0 * std::f64::consts::PI * 30.0 / 340.0;
        let expected = 4.0 * std::f64::consts::PI / delta_k;
        assert!(
            (m.width - expected).abs() / expected < 0.15,
            "width {} vs expected {}",
            m.width,
            expected
        );
    }

    #[test]
    fn test_fwhm_fallback_on_constant_envelope() {
        crate::tracing_init::init_test_tracing();

        // A flat envelope has no local minima at all; everything is above
        // half maximum so the fallback spans the whole grid
        let grid = SampleGrid::symmetric(10.0, 1000).unwrap();
        let env = vec![1.0; 1000];
        let m = measure_width(&grid, &env, &WidthConfig::default()).unwrap();
        assert_eq!(m.method, WidthMethod::HalfMaximum);
        assert_eq!(m.left, 0);
        assert_eq!(m.right, 999);
    }

    #[test]
    fn test_length_mismatch_is_error() {
        let grid = SampleGrid::symmetric(10.0, 1000).unwrap();
        let env = vec![1.0; 999];
        assert!(matches!(
            measure_width(&grid, &env, &WidthConfig::default()),
            Err(AnalysisError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn test_indices_are_ordered() {
        let (grid, env) = packet_envelope(100.0, 200.0, 80);
        let m = measure_width(&grid, &env, &WidthConfig::default()).unwrap();
        assert!(m.right >= m.left);
        assert!(m.right < grid.len());
    }
}
