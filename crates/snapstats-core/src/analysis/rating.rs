use crate::metrics::NormalizedMetrics;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Two-tier threshold: at or below `good` is good, at or below `poor` is a warning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Threshold {
    pub good: f64,
    pub poor: f64,
}

impl Threshold {
    pub const fn new(good: f64, poor: f64) -> Self {
        Self { good, poor }
    }

    pub fn rate(&self, value: f64) -> Rating {
        rate(value, *self)
    }
}

pub const TTFB: Threshold = Threshold::new(100.0, 300.0);
pub const FCP: Threshold = Threshold::new(1800.0, 3000.0);
pub const LCP: Threshold = Threshold::new(2500.0, 4000.0);
pub const FID: Threshold = Threshold::new(100.0, 300.0);
pub const DOM_CONTENT_LOADED: Threshold = Threshold::new(2000.0, 4000.0);
pub const LOAD: Threshold = Threshold::new(3000.0, 6000.0);

/// Layout shift is unitless and rated on its own scale
pub const CLS: Threshold = Threshold::new(0.1, 0.25);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    Good,
    Warning,
    Poor,
}

impl Rating {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rating::Good => "good",
            Rating::Warning => "warning",
            Rating::Poor => "poor",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Rating::Good => "Good performance",
            Rating::Warning => "Needs improvement",
            Rating::Poor => "Poor performance",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rate a value against a threshold; both bounds are inclusive
pub fn rate(value: f64, threshold: Threshold) -> Rating {
    if value <= threshold.good {
        Rating::Good
    } else if value <= threshold.poor {
        Rating::Warning
    } else {
        Rating::Poor
    }
}

/// Metrics shown in the report, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Metric {
    Ttfb,
    Fcp,
    Lcp,
    Fid,
    Cls,
    DomContentLoaded,
    Load,
}

impl Metric {
    pub const ALL: [Metric; 7] = [
        Metric::Ttfb,
        Metric::Fcp,
        Metric::Lcp,
        Metric::Fid,
        Metric::Cls,
        Metric::DomContentLoaded,
        Metric::Load,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Metric::Ttfb => "Time to First Byte",
            Metric::Fcp => "First Contentful Paint",
            Metric::Lcp => "Largest Contentful Paint",
            Metric::Fid => "First Input Delay",
            Metric::Cls => "Cumulative Layout Shift",
            Metric::DomContentLoaded => "DOM Content Loaded",
            Metric::Load => "Page Load Complete",
        }
    }

    pub fn tooltip(&self) -> &'static str {
        match self {
            Metric::Ttfb => {
                "Time from navigation start to when the first byte of the response is received from the server. Lower is better."
            }
            Metric::Fcp => {
                "Time when the browser renders the first bit of content (text, image, etc.). Target: < 1.8s"
            }
            Metric::Lcp => {
                "Time when the largest content element becomes visible. Target: < 2.5s"
            }
            Metric::Fid => {
                "Time from when a user first interacts with your page to when the browser responds. Target: < 100ms"
            }
            Metric::Cls => {
                "Measures visual stability - how much elements move around. Target: < 0.1"
            }
            Metric::DomContentLoaded => {
                "Time when the HTML document has been completely loaded and parsed"
            }
            Metric::Load => "Time when the page and all resources have finished loading",
        }
    }

    pub fn threshold(&self) -> Threshold {
        match self {
            Metric::Ttfb => TTFB,
            Metric::Fcp => FCP,
            Metric::Lcp => LCP,
            Metric::Fid => FID,
            Metric::Cls => CLS,
            Metric::DomContentLoaded => DOM_CONTENT_LOADED,
            Metric::Load => LOAD,
        }
    }

    /// Whether the value is a duration in milliseconds
    pub fn is_timing(&self) -> bool {
        !matches!(self, Metric::Cls)
    }

    pub fn value(&self, metrics: &NormalizedMetrics) -> f64 {
        match self {
            Metric::Ttfb => metrics.ttfb,
            Metric::Fcp => metrics.fcp,
            Metric::Lcp => metrics.lcp,
            Metric::Fid => metrics.fid,
            Metric::Cls => metrics.cls,
            Metric::DomContentLoaded => metrics.dom_content_loaded,
            Metric::Load => metrics.load,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRating {
    pub metric: Metric,
    pub value: f64,
    pub rating: Rating,
}

/// Rate every displayed metric
pub fn rate_all(metrics: &NormalizedMetrics) -> Vec<MetricRating> {
    Metric::ALL
        .iter()
        .map(|metric| {
            let value = metric.value(metrics);
            MetricRating {
                metric: *metric,
                value,
                rating: metric.threshold().rate(value),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries_are_inclusive() {
        let t = Threshold::new(100.0, 300.0);
        assert_eq!(rate(100.0, t), Rating::Good);
        assert_eq!(rate(100.001, t), Rating::Warning);
        assert_eq!(rate(300.0, t), Rating::Warning);
        assert_eq!(rate(300.001, t), Rating::Poor);
    }

    #[test]
    fn test_every_threshold_boundary() {
        for metric in Metric::ALL {
            let t = metric.threshold();
            assert_eq!(t.rate(t.good), Rating::Good, "{:?}", metric);
            assert_eq!(t.rate(t.good + 1e-6), Rating::Warning, "{:?}", metric);
            assert_eq!(t.rate(t.poor), Rating::Warning, "{:?}", metric);
            assert_eq!(t.rate(t.poor + 1e-6), Rating::Poor, "{:?}", metric);
        }
    }

    #[test]
    fn test_zero_is_good() {
        assert_eq!(rate(0.0, CLS), Rating::Good);
        assert_eq!(rate(0.0, LOAD), Rating::Good);
    }

    #[test]
    fn test_rating_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Rating::Warning).unwrap(), "\"warning\"");
        assert_eq!(Rating::Poor.to_string(), "poor");
    }
}
