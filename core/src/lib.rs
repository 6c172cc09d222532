//! Core signal-processing pipeline for resonant pressure sensor recordings.
//!
//! The modules convert a raw time-ordered resonance-frequency series into a
//! calibrated pressure series through three well-defined stages: temperature
//! compensation, adaptive-window minima extraction, and piecewise-linear
//! calibration lookup.

pub mod math;
pub mod prelude;
pub mod processing;
pub mod sensor_interface;
pub mod telemetry;

pub use prelude::{ProcessingStage, StageInput, StageOutput};
