use crate::Result;
use crate::metrics::NormalizedMetrics;
use chrono::{DateTime, SecondsFormat, Utc};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Column order of the CSV export
pub const CSV_HEADER: [&str; 14] = [
    "timestamp",
    "ttfb",
    "fcp",
    "lcp",
    "cls",
    "domContentLoaded",
    "load",
    "resourceCount",
    "totalResourceSize",
    "jsSize",
    "cssSize",
    "imgSize",
    "thirdPartySize",
    "thirdPartyCount",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }
}

pub struct MetricsExporter;

impl MetricsExporter {
    /// Pretty-printed JSON of the full metrics record
    pub fn to_json(metrics: &NormalizedMetrics) -> Result<String> {
        tracing::debug!("Converting metrics to JSON");

        let json = serde_json::to_string_pretty(metrics)?;
        Ok(json)
    }

    /// Header row plus one data row, stamped with `at`
    pub fn to_csv(metrics: &NormalizedMetrics, at: DateTime<Utc>) -> String {
        tracing::debug!("Converting metrics to CSV");

        let values = [
            at.to_rfc3339_opts(SecondsFormat::Millis, true),
            metrics.ttfb.to_string(),
            metrics.fcp.to_string(),
            metrics.lcp.to_string(),
            metrics.cls.to_string(),
            metrics.dom_content_loaded.to_string(),
            metrics.load.to_string(),
            metrics.resource_count.to_string(),
            metrics.total_resource_size.to_string(),
            metrics.js_size.to_string(),
            metrics.css_size.to_string(),
            metrics.img_size.to_string(),
            metrics.third_party_size.to_string(),
            metrics.third_party_count.to_string(),
        ];

        [CSV_HEADER.join(","), values.join(",")].join("\n")
    }

    /// Render `metrics` in `format`, stamping CSV output with the current time
    pub fn render(metrics: &NormalizedMetrics, format: ExportFormat) -> Result<String> {
        match format {
            ExportFormat::Json => Self::to_json(metrics),
            ExportFormat::Csv => Ok(Self::to_csv(metrics, Utc::now())),
        }
    }

    /// Write an export to a file
    pub fn to_file(metrics: &NormalizedMetrics, format: ExportFormat, path: &Path) -> Result<()> {
        tracing::debug!("Writing {} export to: {}", format.extension(), path.display());

        let content = Self::render(metrics, format)?;
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(content.as_bytes())?;
        writer.flush()?;

        tracing::info!("Successfully wrote export to {}", path.display());

        Ok(())
    }

    /// Suggested download name, e.g. `snapstats-2026-10-16.csv`
    pub fn file_name(format: ExportFormat, at: DateTime<Utc>) -> String {
        format!("snapstats-{}.{}", at.format("%Y-%m-%d"), format.extension())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{MetricsSample, ResourceEntry, normalize};
    use chrono::TimeZone;

    fn sample_metrics() -> NormalizedMetrics {
        normalize(&MetricsSample {
            ttfb: Some(50.0),
            fcp: Some(900.0),
            lcp: Some(1300.0),
            cls: Some(0.02),
            dom_content_loaded: Some(900.0),
            load: Some(1300.5),
            current_domain: "example.com".to_string(),
            resources: vec![ResourceEntry {
                name: "https://other.com/lib.js".to_string(),
                initiator_type: "script".to_string(),
                transfer_size: Some(4096),
                ..Default::default()
            }],
            ..Default::default()
        })
    }

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_csv_has_fixed_header_and_one_row() {
        let csv = MetricsExporter::to_csv(&sample_metrics(), at());
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            "timestamp,ttfb,fcp,lcp,cls,domContentLoaded,load,resourceCount,totalResourceSize,jsSize,cssSize,imgSize,thirdPartySize,thirdPartyCount"
        );
        assert_eq!(
            lines[1],
            "2026-10-16T09:30:00.000Z,50,900,1300,0.02,900,1300.5,1,4096,4096,0,0,4096,1"
        );
    }

    #[test]
    fn test_json_is_pretty_camel_case() {
        let json = MetricsExporter::to_json(&sample_metrics()).unwrap();
        assert!(json.contains("\n  \"ttfb\": 50.0"));
        assert!(json.contains("\"domContentLoaded\": 900.0"));
        assert!(json.contains("\"thirdPartyCount\": 1"));
        assert!(json.contains("\"currentDomain\": \"example.com\""));
    }

    #[test]
    fn test_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        MetricsExporter::to_file(&sample_metrics(), ExportFormat::Csv, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("timestamp,ttfb"));
    }

    #[test]
    fn test_file_name() {
        assert_eq!(
            MetricsExporter::file_name(ExportFormat::Json, at()),
            "snapstats-2026-10-16.json"
        );
    }
}
