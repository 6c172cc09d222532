use crate::math::stats::StatsHelper;
use crate::prelude::{
    ProcessingStage, StageConfig, StageError, StageInput, StageMetadata, StageOutput, StageResult,
};
use crate::processing::buffer_pool::BufferPool;
use crate::sensor_interface::pressure::RepresentativeMinimum;
use crate::telemetry::log::LogManager;
use crate::telemetry::metrics::MetricsRecorder;

/// Adaptive-window stage reducing a dense noisy frequency series to one
/// representative low point per window.
///
/// Windows are consecutive and non-overlapping. Each starts at `base_window`
/// samples and grows by `growth_factor` until it holds at least `bottom_n`
/// samples at or below the global `low_percentile` threshold, reaches
/// `max_window`, or runs into the end of the series. Growth is geometric and
/// capped, so a window settles after at most
/// log(max_window / base_window) / log(growth_factor) rounds.
pub struct ExtractionStage {
    pool: BufferPool,
    config: Option<StageConfig>,
    logger: LogManager,
    metrics: MetricsRecorder,
}

impl ExtractionStage {
    pub fn new(pool_size: usize) -> Self {
        Self {
            pool: BufferPool::with_capacity(pool_size),
            config: None,
            logger: LogManager::new(),
            metrics: MetricsRecorder::new(),
        }
    }

    pub fn metrics(&self) -> &MetricsRecorder {
        &self.metrics
    }

    fn grow(window: usize, growth_factor: f64, max_window: usize) -> usize {
        let grown = (window as f64 * growth_factor).ceil() as usize;
        grown.max(window + 1).min(max_window)
    }
}

impl ProcessingStage for ExtractionStage {
    fn initialize(&mut self, config: &StageConfig) -> StageResult<()> {
        if config.base_window < 1 {
            return Err(StageError::InvalidParameter(
                "base_window must be at least 1".into(),
            ));
        }
        if config.bottom_n < 1 {
            return Err(StageError::InvalidParameter(
                "bottom_n must be at least 1".into(),
            ));
        }
        if !(config.growth_factor > 1.0) {
            return Err(StageError::InvalidParameter(format!(
                "growth_factor {} must be above 1",
                config.growth_factor
            )));
        }
        if config.max_window < config.base_window {
            return Err(StageError::InvalidParameter(format!(
                "max_window {} is below base_window {}",
                config.max_window, config.base_window
            )));
        }
        if !config.low_percentile.is_finite()
            || config.low_percentile < 0.0
            || config.low_percentile > 100.0
        {
            return Err(StageError::InvalidParameter(format!(
                "low_percentile {} is outside 0-100",
                config.low_percentile
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

        if input.samples.is_empty() {
            return Err(StageError::EmptyInput("no samples to scan".into()));
        }

        let threshold = StatsHelper::percentile(&input.samples, config.low_percentile);
        let total = input.samples.len();

        let mut minima: Vec<RepresentativeMinimum> = Vec::new();
        let mut position = 0usize;

        while position < total {
            let remaining = total - position;
            let mut window = config.base_window;

            let span = loop {
                let clipped = window >= remaining;
                let length = window.min(remaining);
                let very_low = input.samples[position..position + length]
                    .iter()
                    .filter(|&&value| value <= threshold)
                    .count();

                if very_low >= config.bottom_n || window >= config.max_window || clipped {
                    break length;
                }
                window = Self::grow(window, config.growth_factor, config.max_window);
            };

            let mut scratch = self.pool.checkout(span)?;
            scratch.copy_from_slice(&input.samples[position..position + span]);
            scratch.sort_by(f64::total_cmp);
            let take = config.bottom_n.min(span);
            let value = StatsHelper::mean(&scratch[..take]);
            self.pool.release(scratch);

            minima.push(RepresentativeMinimum::new(minima.len(), span, value));
            self.metrics.record_window();
            position += span;
        }

        self.logger.record(&format!(
            "ExtractionStage windows {} threshold {:.4}",
            minima.len(),
            threshold
        ));

        let samples: Vec<f64> = minima.iter().map(|minimum| minimum.value).collect();
        let metadata = StageMetadata {
            minima: Some(minima),
            notes: vec![format!("threshold {:.4}", threshold)],
            ..Default::default()
        };

        Ok(StageOutput { samples, metadata })
    }

    fn cleanup(&mut self) {
        self.pool.reset();
        self.config = None;
    }
}
