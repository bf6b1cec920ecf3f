//! Multi-tone waveform synthesis.
//!
//! Superposes the components of a `ComponentSet` over a `SampleGrid` in one
//! of three phase conventions:
//! - temporal: phase_i = 2π·f_i·t (grid holds time)
//! - spatial: phase_i = k_i·x with k_i = 2π·f_i/v (grid holds position)
//! - traveling: phase_i = k_i·x - ω_i·t, a snapshot of the moving packet
//!   at a fixed time over a spatial grid
//!
//! All synthesis is pure: inputs in, samples out, no state.

use std::f64::consts::PI;

use crate::components::ComponentSet;
use crate::grid::SampleGrid;

/// Phase convention for synthesis
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WaveMode {
    /// Standing/temporal waveform: phase = 2π·f·t
    Temporal,
    /// Spatial packet: phase = k·x, k = 2π·f/velocity
    Spatial { velocity: f64 },
    /// Traveling-wave snapshot: phase = k·x - ω·time
    Traveling { velocity: f64, time: f64 },
}

/// Superpose cosine components over the grid.
///
/// Each sample is Σ_i a_i·cos(phase_i). A single component reduces to a
/// pure cosine; equal frequency bounds are valid and give zero bandwidth.
pub fn synthesize(grid: &SampleGrid, components: &ComponentSet, mode: WaveMode) -> Vec<f64> {
    superpose(grid, components, mode, f64::cos)
}

/// Sine variant of [`synthesize`], used for playable audio where the
/// waveform should start from zero amplitude.
pub fn synthesize_sine(grid: &SampleGrid, components: &ComponentSet, mode: WaveMode) -> Vec<f64> {
    superpose(grid, components, mode, f64::sin)
}

fn superpose(
    grid: &SampleGrid,
    components: &ComponentSet,
    mode: WaveMode,
    waveform: fn(f64) -> f64,
) -> Vec<f64> {
    let mut out = vec![0.0f64; grid.len()];

    for (&f, &a) in components.frequencies().iter().zip(components.amplitudes()) {
        match mode {
            WaveMode::Temporal => {
                let omega = 2.0 * PI * f;
                for (y, &t) in out.iter_mut().zip(grid.coords()) {
                    *y += a * waveform(omega * t);
                }
            }
            WaveMode::Spatial { velocity } => {
                let k = 2.0 * PI * f / velocity;
                for (y, &x) in out.iter_mut().zip(grid.coords()) {
                    *y += a * waveform(k * x);
                }
            }
            WaveMode::Traveling { velocity, time } => {
                let k = 2.0 * PI * f / velocity;
                let omega = 2.0 * PI * f;
                for (y, &x) in out.iter_mut().zip(grid.coords()) {
                    *y += a * waveform(k * x - omega * time);
                }
            }
        }
    }

    out
}

/// Repetition period of a uniform packet: (M-1)/Δf seconds.
///
/// M equally spaced tones produce a waveform that repeats with this
/// period; grids longer than ~0.8 of it show periodic images of the
/// packet. Returns `None` for a single tone or zero bandwidth.
pub fn repetition_period(components: &ComponentSet) -> Option<f64> {
    let df = components.bandwidth();
    if components.len() > 1 && df > 0.0 {
        Some((components.len() - 1) as f64 / df)
    } else {
        None
    }
}
