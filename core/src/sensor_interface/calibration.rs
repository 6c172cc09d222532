use serde::{Deserialize, Serialize};

/// One linear frequency-to-pressure mapping, valid on the closed interval
/// between `f_low` and `f_high`. The interval may be decreasing (`f_low`
/// above `f_high`) since pressure can fall as frequency rises.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CalibrationSegment {
    pub f_low: f64,
    pub f_high: f64,
    pub p_at_low: f64,
    pub p_at_high: f64,
}

impl CalibrationSegment {
    pub fn new(f_low: f64, f_high: f64, p_at_low: f64, p_at_high: f64) -> Self {
        Self {
            f_low,
            f_high,
            p_at_low,
            p_at_high,
        }
    }

    /// Whether `frequency` falls inside the closed interval.
    pub fn contains(&self, frequency: f64) -> bool {
        let lo = self.f_low.min(self.f_high);
        let hi = self.f_low.max(self.f_high);
        frequency >= lo && frequency <= hi
    }

    /// Distance from `frequency` to the nearest interval boundary, zero
    /// inside the interval.
    pub fn boundary_distance(&self, frequency: f64) -> f64 {
        let lo = self.f_low.min(self.f_high);
        let hi = self.f_low.max(self.f_high);
        if frequency < lo {
            lo - frequency
        } else if frequency > hi {
            frequency - hi
        } else {
            0.0
        }
    }
}

/// Ordered piecewise-linear calibration table. Lookup walks the segments in
/// table order and the first match wins, so overlaps resolve
/// deterministically.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CalibrationTable {
    pub segments: Vec<CalibrationSegment>,
}

impl CalibrationTable {
    pub fn new(segments: Vec<CalibrationSegment>) -> Self {
        Self { segments }
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Parse a table from a JSON array of segments.
    pub fn from_json_str(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}

impl Default for CalibrationTable {
    /// Bench calibration of the reference sensor batch.
    fn default() -> Self {
        Self::new(vec![
            CalibrationSegment::new(505.0, 570.0, 7.5, 0.0),
            CalibrationSegment::new(505.0, 498.8, 7.5, 15.0),
            CalibrationSegment::new(498.8, 493.8, 15.0, 22.5),
            CalibrationSegment::new(493.8, 490.2, 22.5, 30.0),
            CalibrationSegment::new(490.2, 487.8, 30.0, 37.5),
            CalibrationSegment::new(487.8, 484.8, 37.5, 45.0),
            CalibrationSegment::new(484.8, 481.8, 45.0, 52.5),
        ])
    }
}
