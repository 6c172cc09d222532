use anyhow::Context;
use clap::Parser;
use generator::profile::{build_recording_from_config, GeneratorConfig};
use ingest::reader::read_recording;
use ingest::writer::write_pressures;
use log::info;
use presscore::sensor_interface::calibration::CalibrationTable;
use serde_json::json;
use std::fs;
use std::path::PathBuf;
use workflow::config::WorkflowConfig;
use workflow::runner::Runner;

mod generator;
mod ingest;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Offline resonant pressure sensor analysis driver")]
struct Args {
    /// Recording CSV with index/time and raw frequency in the first two columns
    #[arg(long)]
    input: Option<PathBuf>,
    /// Destination CSV for the pressure series; stdout when omitted
    #[arg(long)]
    output: Option<PathBuf>,
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    /// Calibration table as a JSON array of segments
    #[arg(long)]
    calibration: Option<PathBuf>,
    /// Write a JSON run report to this path
    #[arg(long)]
    report: Option<PathBuf>,
    /// Run on a seeded synthetic recording instead of a file
    #[arg(long, default_value_t = false)]
    synthetic: bool,
    #[arg(long, default_value_t = 37.0)]
    temp_celsius: f64,
    #[arg(long, default_value_t = 37.0)]
    reference_celsius: f64,
    #[arg(long, default_value_t = 0.1)]
    temp_coeff: f64,
    #[arg(long, default_value_t = 300)]
    base_window: usize,
    #[arg(long, default_value_t = 3)]
    bottom_n: usize,
    #[arg(long, default_value_t = 5.0)]
    low_percentile: f64,
    #[arg(long, default_value_t = 1.5)]
    growth_factor: f64,
    /// Hard window cap; defaults to four times the base window
    #[arg(long)]
    max_window: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut workflow_config = if let Some(path) = &args.workflow {
        WorkflowConfig::load(path)?
    } else {
        WorkflowConfig {
            temp_celsius: args.temp_celsius,
            reference_celsius: args.reference_celsius,
            temp_coeff_hz_per_deg: args.temp_coeff,
            base_window: args.base_window,
            bottom_n: args.bottom_n,
            low_percentile: args.low_percentile,
            growth_factor: args.growth_factor,
            max_window: args.max_window,
            calibration: None,
        }
    };

    if let Some(path) = &args.calibration {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("reading calibration table {}", path.display()))?;
        let table = CalibrationTable::from_json_str(&contents)
            .with_context(|| format!("parsing calibration table {}", path.display()))?;
        workflow_config.calibration = Some(table);
    }

    let payload = if args.synthetic {
        info!("running on a synthetic recording");
        build_recording_from_config(&GeneratorConfig::default())
    } else {
        let input = args
            .input
            .as_ref()
            .context("either --input or --synthetic is required")?;
        info!("reading recording {}", input.display());
        read_recording(input)?
    };

    let runner = Runner::new(workflow_config);
    let result = runner.execute(&payload)?;

    println!(
        "Offline run -> samples {}, windows {}, pressures {}, extrapolated {}",
        payload.samples.len(),
        result.minima.len(),
        result.pressures.len(),
        result.extrapolated_count
    );

    if let Some(output) = &args.output {
        write_pressures(output, &result.pressures)?;
    } else {
        for sample in &result.pressures {
            println!(
                "{},{},{}",
                sample.window_index, sample.pressure, sample.extrapolated
            );
        }
    }

    if let Some(report_path) = &args.report {
        let report = json!({
            "samples": payload.samples.len(),
            "windows": result.minima.len(),
            "extrapolated": result.extrapolated_count,
            "notes": result.notes,
        });
        if let Some(parent) = report_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(report_path, serde_json::to_string_pretty(&report)?)
            .with_context(|| format!("writing report {}", report_path.display()))?;
    }

    Ok(())
}
