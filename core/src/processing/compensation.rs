use crate::prelude::{
    ProcessingStage, StageConfig, StageError, StageInput, StageMetadata, StageOutput, StageResult,
};
use crate::telemetry::log::LogManager;

/// Temperature-compensation stage removing the linear thermal bias from raw
/// resonance frequencies: `compensated = raw - coeff * (measured - reference)`.
pub struct CompensationStage {
    config: Option<StageConfig>,
    logger: LogManager,
}

impl CompensationStage {
    pub fn new() -> Self {
        Self {
            config: None,
            logger: LogManager::new(),
        }
    }
}

impl Default for CompensationStage {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessingStage for CompensationStage {
    fn initialize(&mut self, config: &StageConfig) -> StageResult<()> {
        if !config.temp_coeff_hz_per_deg.is_finite() {
            return Err(StageError::InvalidParameter(format!(
                "temperature coefficient {} is not finite",
                config.temp_coeff_hz_per_deg
            )));
        }
        if !config.reference_celsius.is_finite() {
            return Err(StageError::InvalidParameter(format!(
                "reference temperature {} is not finite",
                config.reference_celsius
            )));
        }
        if !config.temp_celsius.is_finite() {
            return Err(StageError::InvalidParameter(format!(
                "measured temperature {} is not finite",
                config.temp_celsius
            )));
        }
        self.config = Some(config.clone());
        Ok(())
    }

    fn execute(&mut self, input: StageInput) -> StageResult<StageOutput> {
        let config = self
            .config
            .as_ref()
            .ok_or_else(|| StageError::Internal("stage not initialized".into()))?;

        let measured = input.temperature_c.unwrap_or(config.temp_celsius);
        if !measured.is_finite() {
            return Err(StageError::InvalidParameter(format!(
                "measured temperature {} is not finite",
                measured
            )));
        }

        let shift = config.temp_coeff_hz_per_deg * (measured - config.reference_celsius);
        let samples: Vec<f64> = input.samples.iter().map(|raw| raw - shift).collect();

        self.logger
            .record(&format!("CompensationStage shift {:.4} Hz", shift));

        let metadata = StageMetadata {
            notes: vec![format!("thermal shift {:.4} Hz at {:.1} C", shift, measured)],
            ..Default::default()
        };

        Ok(StageOutput { samples, metadata })
    }

    fn cleanup(&mut self) {
        self.config = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_at(temp_celsius: f64) -> StageConfig {
        StageConfig {
            temp_celsius,
            ..Default::default()
        }
    }

    #[test]
    fn compensation_is_identity_at_reference_temperature() {
        let mut stage = CompensationStage::new();
        stage.initialize(&config_at(37.0)).unwrap();

        let input = StageInput {
            samples: vec![502.0, 498.5, 505.25],
            temperature_c: None,
        };
        let output = stage.execute(input).unwrap();
        assert_eq!(output.samples, vec![502.0, 498.5, 505.25]);
        stage.cleanup();
    }

    #[test]
    fn compensation_subtracts_the_thermal_shift() {
        let mut stage = CompensationStage::new();
        stage.initialize(&config_at(42.0)).unwrap();

        let output = stage
            .execute(StageInput {
                samples: vec![500.0],
                temperature_c: None,
            })
            .unwrap();
        // shift = 0.1 * (42 - 37) = 0.5 Hz
        assert_eq!(output.samples, vec![499.5]);
    }

    #[test]
    fn compensation_is_invertible() {
        let config = StageConfig {
            temp_celsius: 27.0,
            ..Default::default()
        };
        let mut stage = CompensationStage::new();
        stage.initialize(&config).unwrap();

        let raw = vec![501.7, 486.2, 499.9];
        let output = stage
            .execute(StageInput {
                samples: raw.clone(),
                temperature_c: None,
            })
            .unwrap();

        let shift = config.temp_coeff_hz_per_deg * (config.temp_celsius - config.reference_celsius);
        for (restored, original) in output.samples.iter().map(|c| c + shift).zip(&raw) {
            assert_eq!(restored, *original);
        }
    }

    #[test]
    fn ancillary_temperature_overrides_config() {
        let mut stage = CompensationStage::new();
        stage.initialize(&config_at(37.0)).unwrap();

        let output = stage
            .execute(StageInput {
                samples: vec![500.0],
                temperature_c: Some(47.0),
            })
            .unwrap();
        assert_eq!(output.samples, vec![499.0]);
    }

    #[test]
    fn non_finite_coefficient_is_rejected() {
        let config = StageConfig {
            temp_coeff_hz_per_deg: f64::NAN,
            ..Default::default()
        };
        let mut stage = CompensationStage::new();
        assert!(matches!(
            stage.initialize(&config),
            Err(StageError::InvalidParameter(_))
        ));
    }

    #[test]
    fn non_finite_reference_is_rejected() {
        let config = StageConfig {
            reference_celsius: f64::INFINITY,
            ..Default::default()
        };
        let mut stage = CompensationStage::new();
        assert!(matches!(
            stage.initialize(&config),
            Err(StageError::InvalidParameter(_))
        ));
    }

    #[test]
    fn execute_before_initialize_fails() {
        let mut stage = CompensationStage::new();
        let result = stage.execute(StageInput {
            samples: vec![500.0],
            temperature_c: None,
        });
        assert!(matches!(result, Err(StageError::Internal(_))));
    }
}
