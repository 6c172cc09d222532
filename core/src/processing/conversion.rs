use crate::prelude::{
    ProcessingStage, StageConfig, StageError, StageInput, StageMetadata, StageOutput, StageResult,
};
use crate::sensor_interface::calibration::{CalibrationSegment, CalibrationTable};
use crate::sensor_interface::pressure::PressureSample;
use crate::telemetry::log::LogManager;
use crate::telemetry::metrics::MetricsRecorder;

/// Calibration stage mapping representative minima to pressure through the
/// piecewise-linear segment table.
pub struct ConversionStage {
    config: Option<StageConfig>,
    logger: LogManager,
    metrics: MetricsRecorder,
}

impl ConversionStage {
    pub fn new() -> Self {
        Self {
            config: None,
            logger: LogManager::new(),
            metrics: MetricsRecorder::new(),
        }
    }

    pub fn metrics(&self) -> &MetricsRecorder {
        &self.metrics
    }

    /// First containing segment in table order, or the segment with the
    /// closest boundary when none contains the value. The second element is
    /// true when the lookup extrapolates.
    fn select(table: &CalibrationTable, frequency: f64) -> Option<(&CalibrationSegment, bool)> {
        if let Some(segment) = table.segments.iter().find(|s| s.contains(frequency)) {
            return Some((segment, false));
        }

        let mut nearest: Option<(&CalibrationSegment, f64)> = None;
        for segment in &table.segments {
            let distance = segment.boundary_distance(frequency);
            match nearest {
                Some((_, best)) if distance >= best => {}
                _ => nearest = Some((segment, distance)),
            }
        }
        nearest.map(|(segment, _)| (segment, true))
    }

    fn interpolate(segment: &CalibrationSegment, frequency: f64) -> StageResult<f64> {
        let width = segment.f_high - segment.f_low;
        if width == 0.0 {
            return Err(StageError::InvalidParameter(format!(
                "degenerate calibration segment at {} Hz",
                segment.f_low
            )));
        }
        // exact at the segment endpoints
        if frequency == segment.f_low {
            return Ok(segment.p_at_low);
        }
        if frequency == segment.f_high {
            return Ok(segment.p_at_high);
        }
        Ok(segment.p_at_low
            + (frequency - segment.f_low) / width * (segment.p_at_high - segment.p_at_low))
    }
}

impl Default for ConversionStage {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessingStage for ConversionStage {
    fn initialize(&mut self, config: &StageConfig) -> StageResult<()> {
        if config.calibration.is_empty() {
            return Err(StageError::EmptyCalibrationTable);
        }
        self.config = Some(config.clone());
        Ok(())
    }

    fn execute(&mut self, input: StageInput) -> StageResult<StageOutput> {
        let config = self
            .config
            .as_ref()
            .ok_or_else(|| StageError::Internal("stage not initialized".into()))?;
        let table = &config.calibration;

        let mut pressures: Vec<PressureSample> = Vec::with_capacity(input.samples.len());
        for (window_index, &frequency) in input.samples.iter().enumerate() {
            let (segment, extrapolated) =
                Self::select(table, frequency).ok_or(StageError::EmptyCalibrationTable)?;
            let pressure = Self::interpolate(segment, frequency)?;

            if extrapolated {
                self.metrics.record_extrapolated();
                self.logger.warn(&format!(
                    "frequency {:.4} Hz outside calibration bounds, extrapolating",
                    frequency
                ));
            } else {
                self.metrics.record_interpolated();
            }
            pressures.push(PressureSample::new(window_index, pressure, extrapolated));
        }

        let extrapolated_count = pressures.iter().filter(|p| p.extrapolated).count();
        self.logger.record(&format!(
            "ConversionStage pressures {} extrapolated {}",
            pressures.len(),
            extrapolated_count
        ));

        let samples: Vec<f64> = pressures.iter().map(|sample| sample.pressure).collect();
        let metadata = StageMetadata {
            pressures: Some(pressures),
            extrapolated_count: Some(extrapolated_count),
            notes: vec![format!("segments {}", table.segments.len())],
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

    fn config_with(segments: Vec<CalibrationSegment>) -> StageConfig {
        StageConfig {
            calibration: CalibrationTable::new(segments),
            ..Default::default()
        }
    }

    fn convert(stage_config: &StageConfig, frequencies: Vec<f64>) -> Vec<PressureSample> {
        let mut stage = ConversionStage::new();
        stage.initialize(stage_config).unwrap();
        let output = stage
            .execute(StageInput {
                samples: frequencies,
                temperature_c: None,
            })
            .unwrap();
        stage.cleanup();
        output.metadata.pressures.unwrap()
    }

    #[test]
    fn conversion_matches_the_segment_line() {
        let config = config_with(vec![CalibrationSegment::new(505.0, 498.8, 7.5, 15.0)]);
        let pressures = convert(&config, vec![502.0]);

        let expected = 7.5 + (502.0 - 505.0) / (498.8 - 505.0) * (15.0 - 7.5);
        assert_eq!(pressures[0].pressure, expected);
        assert!(!pressures[0].extrapolated);
    }

    #[test]
    fn segment_endpoints_convert_exactly() {
        let segment = CalibrationSegment::new(505.0, 498.8, 7.5, 15.0);
        let pressures = convert(&config_with(vec![segment]), vec![505.0, 498.8]);
        assert_eq!(pressures[0].pressure, 7.5);
        assert_eq!(pressures[1].pressure, 15.0);
    }

    #[test]
    fn first_matching_segment_wins_on_overlap() {
        let config = config_with(vec![
            CalibrationSegment::new(505.0, 498.8, 7.5, 15.0),
            CalibrationSegment::new(498.8, 493.8, 100.0, 200.0),
        ]);
        // 498.8 sits on the shared boundary; table order decides.
        let pressures = convert(&config, vec![498.8]);
        assert_eq!(pressures[0].pressure, 15.0);
    }

    #[test]
    fn out_of_band_values_extrapolate_from_the_nearest_segment() {
        let config = config_with(vec![
            CalibrationSegment::new(505.0, 498.8, 7.5, 15.0),
            CalibrationSegment::new(498.8, 493.8, 15.0, 22.5),
        ]);
        let pressures = convert(&config, vec![490.0]);

        // nearest boundary is 493.8 on the second segment; its line keeps
        // going rather than clamping
        let segment = CalibrationSegment::new(498.8, 493.8, 15.0, 22.5);
        let expected = segment.p_at_low
            + (490.0 - segment.f_low) / (segment.f_high - segment.f_low)
                * (segment.p_at_high - segment.p_at_low);
        assert!(pressures[0].extrapolated);
        assert_eq!(pressures[0].pressure, expected);
        assert!(pressures[0].pressure > 22.5);
    }

    #[test]
    fn extrapolation_tie_picks_the_first_segment() {
        let config = config_with(vec![
            CalibrationSegment::new(10.0, 20.0, 1.0, 2.0),
            CalibrationSegment::new(30.0, 40.0, 3.0, 4.0),
        ]);
        // 25.0 is 5.0 away from both segments
        let pressures = convert(&config, vec![25.0]);
        let expected = 1.0 + (25.0 - 10.0) / (20.0 - 10.0) * (2.0 - 1.0);
        assert_eq!(pressures[0].pressure, expected);
        assert!(pressures[0].extrapolated);
    }

    #[test]
    fn default_table_reproduces_the_bench_points() {
        let config = StageConfig::default();
        let pressures = convert(&config, vec![505.0, 498.8, 493.8, 490.2, 487.8, 484.8]);
        let expected = [7.5, 15.0, 22.5, 30.0, 37.5, 45.0];
        for (sample, want) in pressures.iter().zip(expected) {
            assert_eq!(sample.pressure, want);
            assert!(!sample.extrapolated);
        }
    }

    #[test]
    fn metrics_split_interpolated_and_extrapolated() {
        let mut stage = ConversionStage::new();
        stage
            .initialize(&config_with(vec![CalibrationSegment::new(
                505.0, 498.8, 7.5, 15.0,
            )]))
            .unwrap();
        stage
            .execute(StageInput {
                samples: vec![502.0, 400.0, 500.0],
                temperature_c: None,
            })
            .unwrap();
        let (_, interpolated, extrapolated) = stage.metrics().snapshot();
        assert_eq!(interpolated, 2);
        assert_eq!(extrapolated, 1);
    }

    #[test]
    fn degenerate_segment_is_rejected() {
        let config = config_with(vec![CalibrationSegment::new(500.0, 500.0, 7.5, 15.0)]);
        let mut stage = ConversionStage::new();
        stage.initialize(&config).unwrap();
        let result = stage.execute(StageInput {
            samples: vec![500.0],
            temperature_c: None,
        });
        assert!(matches!(result, Err(StageError::InvalidParameter(_))));
    }

    #[test]
    fn empty_table_is_rejected_at_initialize() {
        let config = config_with(vec![]);
        let mut stage = ConversionStage::new();
        assert!(matches!(
            stage.initialize(&config),
            Err(StageError::EmptyCalibrationTable)
        ));
    }
}
