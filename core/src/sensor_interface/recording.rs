use serde::{Deserialize, Serialize};

/// One raw reading from the resonance sensor. The index is an ordinal or a
/// timestamp, whichever the recording carries.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FrequencySample {
    pub index: f64,
    pub frequency: f64,
}

impl FrequencySample {
    pub fn new(index: f64, frequency: f64) -> Self {
        Self { index, frequency }
    }
}

/// Recording-level metadata accompanying a captured frequency series.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordingAncillary {
    pub sensor: Option<String>,
    /// Temperature measured during the recording; overrides the configured
    /// value when present.
    pub temperature_c: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Frequency series consumed by the processing core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordingPayload {
    pub samples: Vec<FrequencySample>,
    pub ancillary: RecordingAncillary,
}

impl RecordingPayload {
    pub fn new(samples: Vec<FrequencySample>, ancillary: RecordingAncillary) -> Self {
        Self { samples, ancillary }
    }

    /// The raw frequency column, in recording order.
    pub fn frequencies(&self) -> Vec<f64> {
        self.samples.iter().map(|sample| sample.frequency).collect()
    }
}
