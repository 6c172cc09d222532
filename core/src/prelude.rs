use serde::{Deserialize, Serialize};

use crate::sensor_interface::calibration::CalibrationTable;
use crate::sensor_interface::pressure::{PressureSample, RepresentativeMinimum};

/// Shared configuration for each processing stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StageConfig {
    /// Temperature measured during the recording, degrees Celsius.
    pub temp_celsius: f64,
    /// Reference temperature the calibration was taken at.
    pub reference_celsius: f64,
    /// Thermal frequency bias, Hz per degree Celsius.
    pub temp_coeff_hz_per_deg: f64,
    /// Initial extraction window length, samples.
    pub base_window: usize,
    /// How many lowest points are averaged per window.
    pub bottom_n: usize,
    /// Global percentile (0-100) below which a sample counts as very low.
    pub low_percentile: f64,
    /// Window length multiplier applied on growth, strictly above 1.
    pub growth_factor: f64,
    /// Hard cap on the window length, samples.
    pub max_window: usize,
    /// Ordered piecewise-linear frequency-to-pressure table.
    pub calibration: CalibrationTable,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            temp_celsius: 37.0,
            reference_celsius: 37.0,
            temp_coeff_hz_per_deg: 0.1,
            base_window: 300,
            bottom_n: 3,
            low_percentile: 5.0,
            growth_factor: 1.5,
            max_window: 1200,
            calibration: CalibrationTable::default(),
        }
    }
}

/// Input payload for a processing stage.
#[derive(Debug, Clone)]
pub struct StageInput {
    pub samples: Vec<f64>,
    /// Recording-level temperature override; the configured value applies
    /// when absent.
    pub temperature_c: Option<f64>,
}

/// Output produced by each stage.
#[derive(Debug, Clone)]
pub struct StageOutput {
    pub samples: Vec<f64>,
    pub metadata: StageMetadata,
}

/// Metadata used for chaining stages and telemetry.
#[derive(Debug, Clone, Default)]
pub struct StageMetadata {
    pub minima: Option<Vec<RepresentativeMinimum>>,
    pub pressures: Option<Vec<PressureSample>>,
    pub extrapolated_count: Option<usize>,
    pub notes: Vec<String>,
}

/// Common error type for stage execution.
#[derive(thiserror::Error, Debug)]
pub enum StageError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("empty input: {0}")]
    EmptyInput(String),
    #[error("empty calibration table")]
    EmptyCalibrationTable,
    #[error("buffer exhaustion: {0}")]
    BufferExhaustion(String),
    #[error("internal failure: {0}")]
    Internal(String),
}

pub type StageResult<T> = Result<T, StageError>;

/// Trait describing object-oriented signal-processing stages.
pub trait ProcessingStage {
    fn initialize(&mut self, config: &StageConfig) -> StageResult<()>;
    fn execute(&mut self, input: StageInput) -> StageResult<StageOutput>;
    fn cleanup(&mut self);
}
