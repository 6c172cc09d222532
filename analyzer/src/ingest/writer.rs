use anyhow::Context;
use presscore::sensor_interface::pressure::PressureSample;
use std::path::Path;

/// Write the pressure series as CSV with a `window,pressure,extrapolated`
/// header row.
pub fn write_pressures<P: AsRef<Path>>(
    path: P,
    pressures: &[PressureSample],
) -> anyhow::Result<()> {
    let path_ref = path.as_ref();
    let mut writer = csv::Writer::from_path(path_ref)
        .with_context(|| format!("creating output {}", path_ref.display()))?;

    writer
        .write_record(["window", "pressure", "extrapolated"])
        .context("writing CSV header")?;
    for sample in pressures {
        writer
            .write_record([
                sample.window_index.to_string(),
                sample.pressure.to_string(),
                sample.extrapolated.to_string(),
            ])
            .with_context(|| format!("writing window {}", sample.window_index))?;
    }
    writer.flush().context("flushing output")?;
    Ok(())
}
