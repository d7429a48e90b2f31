use serde::{Deserialize, Serialize};

/// Raw timing and resource data gathered from an instrumented page
///
/// Every timing field may be missing, zero or negative, all of which mean
/// "not measured". See [`crate::metrics::normalize`] for how gaps are filled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsSample {
    #[serde(
        default,
        deserialize_with = "lenient::number",
        skip_serializing_if = "Option::is_none"
    )]
    pub ttfb: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient::number",
        skip_serializing_if = "Option::is_none"
    )]
    pub fcp: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient::number",
        skip_serializing_if = "Option::is_none"
    )]
    pub lcp: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient::number",
        skip_serializing_if = "Option::is_none"
    )]
    pub fid: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient::number",
        skip_serializing_if = "Option::is_none"
    )]
    pub inp: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient::number",
        skip_serializing_if = "Option::is_none"
    )]
    pub cls: Option<f64>,
    #[serde(
        rename = "domContentLoaded",
        default,
        deserialize_with = "lenient::number",
        skip_serializing_if = "Option::is_none"
    )]
    pub dom_content_loaded: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient::number",
        skip_serializing_if = "Option::is_none"
    )]
    pub load: Option<f64>,
    #[serde(default, deserialize_with = "lenient::resources")]
    pub resources: Vec<ResourceEntry>,
    #[serde(rename = "currentDomain", default, deserialize_with = "lenient::text")]
    pub current_domain: String,
}

/// A single entry from the page's resource timing buffer
///
/// Unreadable fields fall back to empty or zero values instead of failing
/// the whole sample.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceEntry {
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(rename = "initiatorType", default, deserialize_with = "lenient::text")]
    pub initiator_type: String,
    #[serde(rename = "transferSize", default, deserialize_with = "lenient::bytes")]
    pub transfer_size: Option<u64>,
    #[serde(default, deserialize_with = "lenient::millis")]
    pub duration: f64,
    #[serde(rename = "startTime", default, deserialize_with = "lenient::millis")]
    pub start_time: f64,
    #[serde(
        rename = "connectStart",
        default,
        deserialize_with = "lenient::number",
        skip_serializing_if = "Option::is_none"
    )]
    pub connect_start: Option<f64>,
    #[serde(
        rename = "connectEnd",
        default,
        deserialize_with = "lenient::number",
        skip_serializing_if = "Option::is_none"
    )]
    pub connect_end: Option<f64>,
}

impl ResourceEntry {
    /// Bytes transferred, with an unknown size counted as zero
    pub fn size(&self) -> u64 {
        self.transfer_size.unwrap_or(0)
    }

    /// Time spent establishing the connection
    ///
    /// Zero when the browser did not report a connection start.
    pub fn wait_time(&self) -> f64 {
        match (self.connect_start, self.connect_end) {
            (Some(start), Some(end)) if start > 0.0 => (end - start).max(0.0),
            _ => 0.0,
        }
    }

    /// Time at which the resource finished loading
    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }
}

/// A complete metrics record with every timing field filled in
///
/// Produced by [`crate::metrics::normalize`]. Timing fields other than `cls`
/// are always strictly positive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedMetrics {
    pub ttfb: f64,
    pub fcp: f64,
    pub lcp: f64,
    pub fid: f64,
    pub inp: f64,
    pub cls: f64,
    #[serde(rename = "domContentLoaded")]
    pub dom_content_loaded: f64,
    pub load: f64,
    #[serde(rename = "resourceCount")]
    pub resource_count: usize,
    #[serde(rename = "totalResourceSize")]
    pub total_resource_size: u64,
    #[serde(rename = "jsSize")]
    pub js_size: u64,
    #[serde(rename = "cssSize")]
    pub css_size: u64,
    #[serde(rename = "imgSize")]
    pub img_size: u64,
    #[serde(rename = "thirdPartySize")]
    pub third_party_size: u64,
    #[serde(rename = "thirdPartyCount")]
    pub third_party_count: usize,
    #[serde(rename = "currentDomain")]
    pub current_domain: String,
    pub resources: Vec<ResourceEntry>,
}

impl From<NormalizedMetrics> for MetricsSample {
    fn from(metrics: NormalizedMetrics) -> Self {
        Self {
            ttfb: Some(metrics.ttfb),
            fcp: Some(metrics.fcp),
            lcp: Some(metrics.lcp),
            fid: Some(metrics.fid),
            inp: Some(metrics.inp),
            cls: Some(metrics.cls),
            dom_content_loaded: Some(metrics.dom_content_loaded),
            load: Some(metrics.load),
            resources: metrics.resources,
            current_domain: metrics.current_domain,
        }
    }
}

/// Field readers that accept whatever the page reported
mod lenient {
    use super::ResourceEntry;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    /// A number, or `None` for null, strings and other non-numbers
    pub fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(value.as_f64().filter(|v| v.is_finite()))
    }

    /// Milliseconds; null, NaN and negative values read as 0
    pub fn millis<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(number(deserializer)?.filter(|v| *v > 0.0).unwrap_or(0.0))
    }

    /// Whole bytes; fractional sizes are rounded and negative sizes are unknown
    pub fn bytes<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(number(deserializer)?
            .filter(|v| *v >= 0.0)
            .map(|v| v.round() as u64))
    }

    pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::String(s) => Ok(s),
            _ => Ok(String::new()),
        }
    }

    /// Resource entries, skipping any that are not JSON objects
    pub fn resources<'de, D>(deserializer: D) -> Result<Vec<ResourceEntry>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let entries = match Value::deserialize(deserializer)? {
            Value::Array(entries) => entries,
            Value::Null => return Ok(Vec::new()),
            other => {
                tracing::warn!("Ignoring resources that are not a list: {}", other);
                return Ok(Vec::new());
            }
        };

        Ok(entries
            .into_iter()
            .filter_map(|entry| match serde_json::from_value(entry) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!("Skipping unreadable resource entry: {}", e);
                    None
                }
            })
            .collect())
    }
}
