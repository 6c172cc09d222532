pub mod calibration;
pub mod pressure;
pub mod recording;

pub use calibration::{CalibrationSegment, CalibrationTable};
pub use pressure::{PressureSample, RepresentativeMinimum};
pub use recording::{FrequencySample, RecordingAncillary, RecordingPayload};
