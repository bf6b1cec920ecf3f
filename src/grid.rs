//! Uniform sample grids for time and space axes.
//!
//! Every signal in this crate is sampled on a `SampleGrid`: a strictly
//! increasing, constant-step sequence of coordinates. The grid owns the
//! step so downstream code never re-derives it from adjacent samples.

use crate::error::AnalysisError;

/// Uniformly spaced coordinate axis (time in seconds or position in meters)
#[derive(Debug, Clone)]
pub struct SampleGrid {
    coords: Vec<f64>,
    step: f64,
}

impl SampleGrid {
    /// Build a grid of `n` evenly spaced coordinates from `start` to `end` inclusive.
    ///
    /// # Arguments
    /// * `start` - First coordinate
    /// * `end` - Last coordinate, must exceed `start`
    /// * `n` - Number of samples, at least 2
    pub fn linspace(start: f64, end: f64, n: usize) -> Result<Self, AnalysisError> {
        if n < 2 {
            return Err(AnalysisError::InvalidGrid {
                reason: format!("need at least 2 samples, got {}", n),
            });
        }
        if !start.is_finite() || !end.is_finite() || end <= start {
            return Err(AnalysisError::InvalidGrid {
                reason: format!("bounds must be finite with end > start, got [{}, {}]", start, end),
            });
        }

        let step = (end - start) / (n - 1) as f64;
        let coords = (0..n).map(|i| start + step * i as f64).collect();

        Ok(Self { coords, step })
    }

    /// Time grid covering `[0, duration)` at `sample_rate` Hz.
    ///
    /// Matches audio-buffer indexing: sample i sits at i / sample_rate.
    pub fn from_duration(duration: f64, sample_rate: f64) -> Result<Self, AnalysisError> {
        if !(duration > 0.0) || !(sample_rate > 0.0) {
            return Err(AnalysisError::InvalidGrid {
                reason: format!(
                    "duration and sample rate must be positive, got {} s at {} Hz",
                    duration, sample_rate
                ),
            });
        }

        let n = (duration * sample_rate) as usize;
        if n < 2 {
            return Err(AnalysisError::InvalidGrid {
                reason: format!("duration {} s at {} Hz yields {} samples", duration, sample_rate, n),
            });
        }

        let step = 1.0 / sample_rate;
        let coords = (0..n).map(|i| step * i as f64).collect();

        Ok(Self { coords, step })
    }

    /// Symmetric grid over `[-half_range, half_range]`, used for spatial packets
    /// centered at the origin.
    pub fn symmetric(half_range: f64, n: usize) -> Result<Self, AnalysisError> {
        Self::linspace(-half_range, half_range, n)
    }

    /// Constant spacing between adjacent coordinates
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Equivalent sampling rate, 1/step
    pub fn sample_rate(&self) -> f64 {
        1.0 / self.step
    }

    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    pub fn coords(&self) -> &[f64] {
        &self.coords
    }
}
