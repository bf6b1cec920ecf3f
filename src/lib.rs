
pub mod constants;
pub mod error;
pub mod grid;
pub mod components;
pub mod synth;
pub mod envelope;
pub mod width;
pub mod spectrum;
pub mod beats;
pub mod sweep;
pub mod tracing_init;

pub use error::AnalysisError;
pub use grid::SampleGrid;
pub use components::ComponentSet;
pub use synth::{synthesize, synthesize_sine, repetition_period, WaveMode};
pub use envelope::{extract_envelope, DEFAULT_PAD_RATIO};
pub use width::{measure_width, WidthConfig, WidthMeasurement, WidthMethod};
pub use spectrum::{
    amplitude_spectrum, amplitude_spectrum_full, find_peaks, PeakConfig, SpectralPeak, Spectrum,
};
pub use beats::{recognize_beats, BeatAnalysis, BeatConfig, BeatOutcome};
pub use sweep::{run_sweep, run_sweep_with_progress, Regression, SweepSpec, TrialRecord, TrialSeries};
