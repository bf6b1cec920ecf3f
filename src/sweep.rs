//! Uncertainty-product validation sweeps.
//!
//! Sweeps the upper wavelength bound of a uniform packet, runs each
//! trial through the synthesize -> envelope -> width pipeline, and
//! aggregates the resulting Δx·Δk products: mean, standard deviation,
//! and an optional least-squares fit of Δx against 1/Δk whose slope
//! should approach 4π.

use std::f64::consts::PI;

use tracing::debug;

use crate::components::ComponentSet;
use crate::constants::{FOUR_PI, SPEED_OF_SOUND};
use crate::envelope::{extract_envelope, DEFAULT_PAD_RATIO};
use crate::error::AnalysisError;
use crate::grid::SampleGrid;
use crate::synth::{synthesize, WaveMode};
use crate::width::{measure_width, WidthConfig};

/// One sweep step's measurements
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrialRecord {
    /// Wavenumber span k_max - k_min, rad/m
    pub delta_k: f64,
    /// Measured packet width, m
    pub delta_x: f64,
    /// Δx·Δk
    pub product: f64,
    /// |product - 4π| / 4π
    pub relative_error: f64,
}

/// Sweep results in sweep (insertion) order
#[derive(Debug, Clone, Default)]
pub struct TrialSeries {
    /// Swept λ_max per trial, in order
    pub lambda_max: Vec<f64>,
    pub records: Vec<TrialRecord>,
}

/// Ordinary-least-squares fit of Δx = slope·(1/Δk) + intercept
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Regression {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
    /// |slope - 4π| / 4π
    pub slope_error: f64,
}

/// Sweep specification: the upper wavelength bound moves linearly from
/// `lambda_max_start` to `lambda_max_end` over `trials` steps while the
/// lower bound stays fixed, widening Δk = 2π/λ_min - 2π/λ_max
#[derive(Debug, Clone)]
pub struct SweepSpec {
    /// Fixed lower wavelength bound, m
    pub lambda_min: f64,
    /// Upper wavelength bound at the first trial, m
    pub lambda_max_start: f64,
    /// Upper wavelength bound at the last trial, m
    pub lambda_max_end: f64,
    /// Number of trials K
    pub trials: usize,
    /// Components per packet
    pub components: usize,
    /// Half-extent of the symmetric spatial grid, m
    pub grid_half_range: f64,
    /// Samples in the spatial grid
    pub grid_len: usize,
    pub width: WidthConfig,
}

impl Default for SweepSpec {
    fn default() -> Self {
        Self {
            lambda_min: 2.0,
            lambda_max_start: 3.5,
            lambda_max_end: 9.0,
            trials: 12,
            components: 70,
            grid_half_range: 45.0,
            grid_len: 10000,
            width: WidthConfig::default(),
        }
    }
}

impl TrialSeries {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Mean of the Δx·Δk products; order-independent
    pub fn mean_product(&self) -> f64 {
        if self.records.is_empty() {
            return 0.0;
        }
        self.records.iter().map(|r| r.product).sum::<f64>() / self.records.len() as f64
    }

    /// Sample standard deviation (n-1) of the products; 0 below two trials
    pub fn std_dev_product(&self) -> f64 {
        let n = self.records.len();
        if n < 2 {
            return 0.0;
        }
        let mean = self.mean_product();
        let ss: f64 = self.records.iter().map(|r| (r.product - mean).powi(2)).sum();
        (ss / (n - 1) as f64).sqrt()
    }

    /// OLS fit of Δx against 1/Δk. `None` below two usable points or
    /// when the regressor has no variance.
    pub fn regression(&self) -> Option<Regression> {
        let points: Vec<(f64, f64)> = self
            .records
            .iter()
            .filter(|r| r.delta_k > 0.0)
            .map(|r| (1.0 / r.delta_k, r.delta_x))
            .collect();
        let n = points.len();
        if n < 2 {
            return None;
        }

        let nf = n as f64;
        let mean_x = points.iter().map(|p| p.0).sum::<f64>() / nf;
        let mean_y = points.iter().map(|p| p.1).sum::<f64>() / nf;

        let ss_xx: f64 = points.iter().map(|p| (p.0 - mean_x).powi(2)).sum();
        let ss_yy: f64 = points.iter().map(|p| (p.1 - mean_y).powi(2)).sum();
        let ss_xy: f64 = points.iter().map(|p| (p.0 - mean_x) * (p.1 - mean_y)).sum();

        if ss_xx == 0.0 {
            return None;
        }

        let slope = ss_xy / ss_xx;
        let intercept = mean_y - slope * mean_x;
        let r_squared = if ss_yy > 0.0 { (ss_xy * ss_xy) / (ss_xx * ss_yy) } else { 1.0 };

        Some(Regression {
            slope,
            intercept,
            r_squared,
            slope_error: (slope - FOUR_PI).abs() / FOUR_PI,
        })
    }
}

/// Run the full sweep; zero trials yields an empty series.
pub fn run_sweep(spec: &SweepSpec) -> Result<TrialSeries, AnalysisError> {
    run_sweep_with_progress(spec, |_, _| true)
}

/// Run the sweep, reporting each completed trial to `observer`.
///
/// The observer receives the trial index and its record; returning
/// `false` stops the sweep early and the series holds the trials
/// completed so far. This is an observability hook; correctness does
/// not depend on it.
pub fn run_sweep_with_progress<F>(
    spec: &SweepSpec,
    mut observer: F,
) -> Result<TrialSeries, AnalysisError>
where
    F: FnMut(usize, &TrialRecord) -> bool,
{
    if !(spec.lambda_min > 0.0)
        || spec.lambda_max_start < spec.lambda_min
        || spec.lambda_max_end < spec.lambda_min
    {
        return Err(AnalysisError::InvalidComponents {
            reason: format!(
                "need 0 < lambda_min <= lambda_max bounds, got {} with [{}, {}]",
                spec.lambda_min, spec.lambda_max_start, spec.lambda_max_end
            ),
        });
    }

    let mut series = TrialSeries::default();
    if spec.trials == 0 {
        return Ok(series);
    }

    let grid = SampleGrid::symmetric(spec.grid_half_range, spec.grid_len)?;

    for i in 0..spec.trials {
        let lambda_max = if spec.trials == 1 {
            spec.lambda_max_start
        } else {
            let frac = i as f64 / (spec.trials - 1) as f64;
            spec.lambda_max_start + frac * (spec.lambda_max_end - spec.lambda_max_start)
        };

        let record = run_trial(&grid, spec, lambda_max)?;
        debug!(
            trial = i,
            lambda_max,
            delta_k = record.delta_k,
            delta_x = record.delta_x,
            product = record.product,
            "sweep trial"
        );

        series.lambda_max.push(lambda_max);
        series.records.push(record);

        if !observer(i, &series.records[i]) {
            debug!(completed = i + 1, "sweep cancelled by observer");
            break;
        }
    }

    Ok(series)
}

fn run_trial(
    grid: &SampleGrid,
    spec: &SweepSpec,
    lambda_max: f64,
) -> Result<TrialRecord, AnalysisError> {
    // Wavelength bounds map to frequency bounds through the phase
    // velocity; the spatial mode turns them back into k = 2π/λ
    let f_min = SPEED_OF_SOUND / lambda_max;
    let f_max = SPEED_OF_SOUND / spec.lambda_min;
    let components = ComponentSet::uniform(f_min, f_max, spec.components)?;

    let delta_k = 2.0 * PI / spec.lambda_min - 2.0 * PI / lambda_max;

    let signal = synthesize(grid, &components, WaveMode::Spatial { velocity: SPEED_OF_SOUND });
    let envelope = extract_envelope(&signal, DEFAULT_PAD_RATIO)?;
    let measurement = measure_width(grid, &envelope, &spec.width)?;

    let product = measurement.width * delta_k;
    Ok(TrialRecord {
        delta_k,
        delta_x: measurement.width,
        product,
        relative_error: (product - FOUR_PI).abs() / FOUR_PI,
    })
}
