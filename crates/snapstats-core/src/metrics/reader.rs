use super::types::MetricsSample;
use crate::{Error, Result};
use serde_json::Value;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub struct SampleReader;

impl SampleReader {
    /// Read and parse a raw metrics sample from the given path
    pub fn from_file(path: &Path) -> Result<MetricsSample> {
        tracing::debug!("Reading metrics sample from: {}", path.display());

        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let sample = Self::from_value(serde_json::from_reader(reader)?)?;

        Self::log_parsed(&sample);
        Ok(sample)
    }

    /// Parse a raw metrics sample from a JSON string
    pub fn from_str(content: &str) -> Result<MetricsSample> {
        tracing::debug!("Parsing metrics sample from string");

        let sample = Self::from_value(serde_json::from_str(content)?)?;

        Self::log_parsed(&sample);
        Ok(sample)
    }

    fn from_value(value: Value) -> Result<MetricsSample> {
        if !value.is_object() {
            return Err(Error::InvalidSample(format!(
                "expected a JSON object, found {}",
                kind_of(&value)
            )));
        }
        Ok(serde_json::from_value(value)?)
    }

    fn log_parsed(sample: &MetricsSample) {
        if sample.current_domain.is_empty() {
            tracing::warn!("Metrics sample has no currentDomain, third-party attribution is disabled");
        }

        tracing::info!(
            "Successfully parsed metrics sample with {} resources",
            sample.resources.len()
        );
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
