use anyhow::{bail, Context};
use presscore::sensor_interface::recording::{
    FrequencySample, RecordingAncillary, RecordingPayload,
};
use std::path::Path;

/// Read a recording from a CSV file whose first two columns are the sample
/// index (or timestamp) and the raw resonance frequency. A leading
/// non-numeric header row is skipped; any further columns are ignored.
pub fn read_recording<P: AsRef<Path>>(path: P) -> anyhow::Result<RecordingPayload> {
    let path_ref = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path_ref)
        .with_context(|| format!("opening recording {}", path_ref.display()))?;

    let mut samples = Vec::new();
    for (row, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row}"))?;
        if record.len() < 2 {
            bail!(
                "CSV row {row}: expected at least two columns, got {}",
                record.len()
            );
        }

        let index = record.get(0).unwrap_or("").trim().parse::<f64>();
        let frequency = record.get(1).unwrap_or("").trim().parse::<f64>();
        match (index, frequency) {
            (Ok(index), Ok(frequency)) => {
                samples.push(FrequencySample::new(index, frequency));
            }
            // header row
            _ if row == 0 => continue,
            (Err(err), _) | (_, Err(err)) => {
                bail!("CSV row {row}: not a number: {err}")
            }
        }
    }

    let ancillary = RecordingAncillary {
        description: Some(path_ref.display().to_string()),
        ..Default::default()
    };
    Ok(RecordingPayload::new(samples, ancillary))
}
