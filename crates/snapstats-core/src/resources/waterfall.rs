use crate::metrics::ResourceEntry;
use serde::{Deserialize, Serialize};

/// Width the latest resource end time is scaled to
pub const WATERFALL_WIDTH: f64 = 500.0;

/// One row of the request waterfall, in waterfall width units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterfallBar {
    pub label: String,
    pub url: String,
    pub offset: f64,
    pub wait: f64,
    pub width: f64,
    pub duration: f64,
}

/// Lay out resources as a start-time ordered waterfall
///
/// Returns no bars when there is nothing to scale against.
pub fn waterfall(resources: &[ResourceEntry]) -> Vec<WaterfallBar> {
    let max_end = resources
        .iter()
        .map(ResourceEntry::end_time)
        .fold(0.0_f64, f64::max);

    if max_end <= 0.0 {
        return Vec::new();
    }

    let scale = WATERFALL_WIDTH / max_end;

    let mut sorted: Vec<&ResourceEntry> = resources.iter().collect();
    sorted.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));

    sorted
        .into_iter()
        .map(|r| {
            let wait = (r.wait_time() * scale).max(0.0);
            WaterfallBar {
                label: short_name(&r.name),
                url: r.name.clone(),
                offset: (r.start_time * scale).max(0.0),
                wait,
                width: (r.duration * scale - wait).max(1.0),
                duration: r.duration,
            }
        })
        .collect()
}

/// Last path segment of a URL, used as a compact label
fn short_name(url: &str) -> String {
    match url.rsplit('/').next() {
        Some(last) if !last.is_empty() => last.to_string(),
        _ => "unknown".to_string(),
    }
}
