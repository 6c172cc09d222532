use serde::{Deserialize, Serialize};

/// Averaged low point standing in for one extraction window.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RepresentativeMinimum {
    pub window_index: usize,
    /// How many consecutive samples the window consumed.
    pub span: usize,
    pub value: f64,
}

impl RepresentativeMinimum {
    pub fn new(window_index: usize, span: usize, value: f64) -> Self {
        Self {
            window_index,
            span,
            value,
        }
    }
}

/// Calibrated pressure emitted for one extraction window.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PressureSample {
    pub window_index: usize,
    pub pressure: f64,
    /// Set when the frequency fell outside every calibration segment and the
    /// nearest segment's line was applied beyond its bounds.
    pub extrapolated: bool,
}

impl PressureSample {
    pub fn new(window_index: usize, pressure: f64, extrapolated: bool) -> Self {
        Self {
            window_index,
            pressure,
            extrapolated,
        }
    }
}
