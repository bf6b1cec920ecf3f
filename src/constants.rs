//! Physical constants shared across the analysis pipeline.

use std::f64::consts::PI;

/// Speed of sound in air at 20 °C, m/s
pub const SPEED_OF_SOUND: f64 = 340.0;

/// Default audio sample rate in Hz
pub const SAMPLE_RATE: f64 = 44100.0;

/// Localization-bandwidth target: Δx·Δk → 4π for uniform-amplitude packets
/// measured between first lateral minima
pub const FOUR_PI: f64 = 4.0 * PI;

/// Global maxima below this are treated as "no signal"
pub const NUMERICAL_FLOOR: f64 = 1e-10;
