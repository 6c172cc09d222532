use anyhow::Context;
use presscore::prelude::StageConfig;
use presscore::sensor_interface::calibration::CalibrationTable;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub temp_celsius: f64,
    pub reference_celsius: f64,
    pub temp_coeff_hz_per_deg: f64,
    pub base_window: usize,
    pub bottom_n: usize,
    pub low_percentile: f64,
    pub growth_factor: f64,
    /// Hard window cap; four times the base window when absent.
    pub max_window: Option<usize>,
    /// Calibration segments; the bench default table when absent.
    pub calibration: Option<CalibrationTable>,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            temp_celsius: 37.0,
            reference_celsius: 37.0,
            temp_coeff_hz_per_deg: 0.1,
            base_window: 300,
            bottom_n: 3,
            low_percentile: 5.0,
            growth_factor: 1.5,
            max_window: None,
            calibration: None,
        }
    }
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn to_stage_config(&self) -> StageConfig {
        StageConfig {
            temp_celsius: self.temp_celsius,
            reference_celsius: self.reference_celsius,
            temp_coeff_hz_per_deg: self.temp_coeff_hz_per_deg,
            base_window: self.base_window,
            bottom_n: self.bottom_n,
            low_percentile: self.low_percentile,
            growth_factor: self.growth_factor,
            max_window: self
                .max_window
                .unwrap_or_else(|| self.base_window.saturating_mul(4)),
            calibration: self.calibration.clone().unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn default_config_produces_stage_config() {
        let cfg = WorkflowConfig::default();
        let stage = cfg.to_stage_config();
        assert_eq!(stage.base_window, 300);
        assert_eq!(stage.max_window, 1200);
        assert_eq!(stage.calibration.segments.len(), 7);
    }

    #[test]
    fn explicit_max_window_is_kept() {
        let cfg = WorkflowConfig {
            base_window: 100,
            max_window: Some(150),
            ..Default::default()
        };
        assert_eq!(cfg.to_stage_config().max_window, 150);
    }

    #[test]
    fn config_load_reads_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"base_window: 120\nbottom_n: 5\nlow_percentile: 10.0\n")
            .unwrap();
        let path = temp.into_temp_path();
        let cfg = WorkflowConfig::load(&path).unwrap();
        assert_eq!(cfg.base_window, 120);
        assert_eq!(cfg.bottom_n, 5);
        assert_eq!(cfg.growth_factor, 1.5);
    }

    #[test]
    fn yaml_calibration_overrides_the_default_table() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(
            b"calibration:\n  - f_low: 505.0\n    f_high: 498.8\n    p_at_low: 7.5\n    p_at_high: 15.0\n",
        )
        .unwrap();
        let path = temp.into_temp_path();
        let cfg = WorkflowConfig::load(&path).unwrap();
        assert_eq!(cfg.to_stage_config().calibration.segments.len(), 1);
    }
}
