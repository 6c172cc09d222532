use presscore::sensor_interface::recording::{
    FrequencySample, RecordingAncillary, RecordingPayload,
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Configuration for generating a synthetic resonance recording.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub samples: usize,
    /// Resting resonance frequency, Hz.
    pub baseline_hz: f64,
    /// Depth of the pressure-induced dips, Hz.
    pub dip_depth_hz: f64,
    /// Samples per dip cycle.
    pub dip_period: usize,
    /// Peak-to-peak measurement jitter, Hz.
    pub noise_hz: f64,
    pub temperature_c: Option<f64>,
    pub seed: u64,
    pub description: Option<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            samples: 2400,
            baseline_hz: 502.0,
            dip_depth_hz: 8.0,
            dip_period: 600,
            noise_hz: 0.05,
            temperature_c: None,
            seed: 0,
            description: None,
        }
    }
}

fn build_frequency_series(config: &GeneratorConfig) -> Vec<FrequencySample> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let period = config.dip_period.max(1) as f64;

    let mut samples = Vec::with_capacity(config.samples);
    for i in 0..config.samples {
        let phase = (i as f64 / period) * 2.0 * PI;
        let dip = config.dip_depth_hz * 0.5 * (1.0 - phase.cos());
        let jitter = if config.noise_hz > 0.0 {
            rng.gen_range(-config.noise_hz..config.noise_hz)
        } else {
            0.0
        };
        samples.push(FrequencySample::new(
            i as f64,
            config.baseline_hz - dip + jitter,
        ));
    }
    samples
}

pub fn build_recording_from_config(config: &GeneratorConfig) -> RecordingPayload {
    let samples = build_frequency_series(config);
    let ancillary = RecordingAncillary {
        sensor: Some("synthetic".into()),
        temperature_c: config.temperature_c,
        description: config.description.clone(),
    };
    RecordingPayload::new(samples, ancillary)
}

pub fn build_recording(samples: usize, seed: u64) -> RecordingPayload {
    let config = GeneratorConfig {
        samples,
        seed,
        ..Default::default()
    };
    build_recording_from_config(&config)
}
