//! Frequency component sets for multi-tone superpositions.
//!
//! A `ComponentSet` is M equally spaced frequencies between `f_min` and
//! `f_max`, each carrying an amplitude. The uniform constructor weights
//! every component 1/M so the packet peak stays at unit amplitude; the
//! two-tone beat constructor keeps the amplitudes independent.

use std::f64::consts::PI;

use crate::error::AnalysisError;

/// Set of M >= 1 frequencies with per-component amplitudes
#[derive(Debug, Clone)]
pub struct ComponentSet {
    frequencies: Vec<f64>,
    amplitudes: Vec<f64>,
}

impl ComponentSet {
    /// M equally spaced frequencies in `[f_min, f_max]`, each weighted 1/M.
    ///
    /// `m == 1` requires `f_min == f_max` and yields a single pure tone
    /// with zero bandwidth.
    pub fn uniform(f_min: f64, f_max: f64, m: usize) -> Result<Self, AnalysisError> {
        if m == 0 {
            return Err(AnalysisError::InvalidComponents {
                reason: "component count must be at least 1".into(),
            });
        }
        if !(f_min > 0.0) || !(f_max >= f_min) {
            return Err(AnalysisError::InvalidComponents {
                reason: format!("need 0 < f_min <= f_max, got [{}, {}]", f_min, f_max),
            });
        }
        if m == 1 && f_min != f_max {
            return Err(AnalysisError::InvalidComponents {
                reason: "a single component needs f_min == f_max".into(),
            });
        }

        let frequencies: Vec<f64> = if m == 1 {
            vec![f_min]
        } else {
            let step = (f_max - f_min) / (m - 1) as f64;
            (0..m).map(|i| f_min + step * i as f64).collect()
        };
        let amplitudes = vec![1.0 / m as f64; m];

        Ok(Self { frequencies, amplitudes })
    }

    /// Two-tone beat pair with independent amplitudes.
    pub fn beat_pair(f1: f64, a1: f64, f2: f64, a2: f64) -> Result<Self, AnalysisError> {
        if !(f1 > 0.0) || !(f2 > 0.0) {
            return Err(AnalysisError::InvalidComponents {
                reason: format!("frequencies must be positive, got {} and {}", f1, f2),
            });
        }

        let (lo, a_lo, hi, a_hi) = if f1 <= f2 { (f1, a1, f2, a2) } else { (f2, a2, f1, a1) };
        Ok(Self {
            frequencies: vec![lo, hi],
            amplitudes: vec![a_lo, a_hi],
        })
    }

    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    pub fn amplitudes(&self) -> &[f64] {
        &self.amplitudes
    }

    pub fn f_min(&self) -> f64 {
        self.frequencies[0]
    }

    pub fn f_max(&self) -> f64 {
        self.frequencies[self.frequencies.len() - 1]
    }

    /// Frequency bandwidth Δf = f_max - f_min (0 for a single tone)
    pub fn bandwidth(&self) -> f64 {
        self.f_max() - self.f_min()
    }

    /// Wavenumber span Δk = 2π·Δf / v for phase velocity v
    pub fn wavenumber_span(&self, velocity: f64) -> f64 {
        2.0 * PI * self.bandwidth() / velocity
    }

    /// Wavenumbers k_i = 2π·f_i / v for phase velocity v
    pub fn wavenumbers(&self, velocity: f64) -> Vec<f64> {
        self.frequencies
            .iter()
            .map(|&f| 2.0 * PI * f / velocity)
            .collect()
    }
}
