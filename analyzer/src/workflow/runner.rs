use crate::workflow::config::WorkflowConfig;
use anyhow::Context;
use presscore::prelude::{ProcessingStage, StageInput};
use presscore::processing::{CompensationStage, ConversionStage, ExtractionStage};
use presscore::sensor_interface::pressure::{PressureSample, RepresentativeMinimum};
use presscore::sensor_interface::recording::RecordingPayload;

pub struct WorkflowResult {
    pub pressures: Vec<PressureSample>,
    pub minima: Vec<RepresentativeMinimum>,
    pub extrapolated_count: usize,
    pub notes: Vec<String>,
}

#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self, payload: &RecordingPayload) -> anyhow::Result<WorkflowResult> {
        let stage_config = self.config.to_stage_config();
        let temperature = payload.ancillary.temperature_c;

        let mut compensation_stage = CompensationStage::new();
        compensation_stage
            .initialize(&stage_config)
            .context("initializing compensation stage")?;
        let compensation_output = compensation_stage
            .execute(StageInput {
                samples: payload.frequencies(),
                temperature_c: temperature,
            })
            .context("executing compensation stage")?;
        compensation_stage.cleanup();

        let mut extraction_stage = ExtractionStage::new(4);
        extraction_stage
            .initialize(&stage_config)
            .context("initializing extraction stage")?;
        let extraction_output = extraction_stage
            .execute(StageInput {
                samples: compensation_output.samples.clone(),
                temperature_c: temperature,
            })
            .context("executing extraction stage")?;
        extraction_stage.cleanup();

        let mut conversion_stage = ConversionStage::new();
        conversion_stage
            .initialize(&stage_config)
            .context("initializing conversion stage")?;
        let conversion_output = conversion_stage
            .execute(StageInput {
                samples: extraction_output.samples.clone(),
                temperature_c: temperature,
            })
            .context("executing conversion stage")?;
        conversion_stage.cleanup();

        let minima = extraction_output.metadata.minima.clone().unwrap_or_default();
        let pressures = conversion_output
            .metadata
            .pressures
            .clone()
            .unwrap_or_default();
        let extrapolated_count = conversion_output.metadata.extrapolated_count.unwrap_or(0);

        let mut notes = compensation_output.metadata.notes.clone();
        notes.extend(extraction_output.metadata.notes.clone());
        notes.extend(conversion_output.metadata.notes.clone());

        Ok(WorkflowResult {
            pressures,
            minima,
            extrapolated_count,
            notes,
        })
    }
}
