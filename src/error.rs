//! Error taxonomy for the analysis pipeline.
//!
//! Only malformed input shapes and invalid counts surface as errors.
//! Degenerate-but-valid inputs (zero bandwidth, noise-floor envelopes,
//! missing spectral peaks) are absorbed by guards in the individual
//! modules and yield degenerate values or outcome variants instead.

use snafu::Snafu;

#[derive(Debug, Snafu, PartialEq)]
pub enum AnalysisError {
    /// Zero-length input where content is required
    #[snafu(display("Input is empty"))]
    EmptyInput,

    /// Signal too short for analytic-signal extraction
    #[snafu(display("Signal too short: {len} samples (need at least {min})"))]
    SignalTooShort { len: usize, min: usize },

    /// Grid and envelope lengths must match
    #[snafu(display("Length mismatch: grid has {grid} samples, envelope has {envelope}"))]
    LengthMismatch { grid: usize, envelope: usize },

    /// Invalid frequency component specification
    #[snafu(display("Invalid components: {reason}"))]
    InvalidComponents { reason: String },

    /// Invalid sample grid specification
    #[snafu(display("Invalid grid: {reason}"))]
    InvalidGrid { reason: String },
}
