use anyhow::{Context, Result};
use chrono::Utc;
use clap::ValueEnum;
use snapstats_core::export::{ExportFormat, MetricsExporter};
use snapstats_core::metrics::{SampleReader, normalize};
use std::path::{Path, PathBuf};

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum ExportAs {
    Json,
    Csv,
}

impl From<ExportAs> for ExportFormat {
    fn from(value: ExportAs) -> Self {
        match value {
            ExportAs::Json => ExportFormat::Json,
            ExportAs::Csv => ExportFormat::Csv,
        }
    }
}

/// Export the normalized metrics of a saved sample
///
/// Without `output` the export goes to stdout. A directory as `output`
/// receives a dated `snapstats-YYYY-MM-DD.<ext>` file.
pub fn execute(file: &Path, export_as: ExportAs, output: Option<PathBuf>) -> Result<()> {
    tracing::info!("Exporting metrics from sample: {}", file.display());

    let sample = SampleReader::from_file(file)?;
    let metrics = normalize(&sample);
    let format = ExportFormat::from(export_as);

    let Some(output) = output else {
        println!("{}", MetricsExporter::render(&metrics, format)?);
        return Ok(());
    };

    let destination = if output.is_dir() {
        output.join(MetricsExporter::file_name(format, Utc::now()))
    } else {
        output
    };

    MetricsExporter::to_file(&metrics, format, &destination)
        .with_context(|| format!("Failed to export to {}", destination.display()))?;
    println!("Exported {} to {}", format.extension(), destination.display());

    Ok(())
}
