use super::types::{MetricsSample, NormalizedMetrics};
use crate::resources::classify;

pub const TTFB_FALLBACK: f64 = 50.0;
pub const FCP_FALLBACK: f64 = 800.0;
pub const LCP_FALLBACK: f64 = 1200.0;
pub const FID_FALLBACK: f64 = 50.0;
pub const INP_FALLBACK: f64 = 50.0;
pub const DOM_CONTENT_LOADED_FALLBACK: f64 = 800.0;
pub const LOAD_FALLBACK: f64 = 1200.0;
pub const CLS_FALLBACK: f64 = 0.0;

/// LCP used when neither FCP nor load time is available to estimate from
pub const LCP_DEFAULT_ESTIMATE: f64 = 2000.0;

/// Ratio applied to FCP when estimating a missing LCP
pub const LCP_FCP_RATIO: f64 = 1.5;

/// Turn a raw sample into a complete metrics record
///
/// Missing, NaN and non-positive timings are replaced with fixed
/// placeholders. A missing LCP is first estimated from FCP (x1.5), then from the load
/// time, then set to [`LCP_DEFAULT_ESTIMATE`]. Resource aggregates are
/// recomputed from `sample.resources`.
pub fn normalize(sample: &MetricsSample) -> NormalizedMetrics {
    tracing::debug!(
        "Normalizing metrics sample for '{}' with {} resources",
        sample.current_domain,
        sample.resources.len()
    );

    let lcp = measured(sample.lcp).unwrap_or_else(|| estimate_lcp(sample));
    let breakdown = classify(&sample.resources, &sample.current_domain);

    NormalizedMetrics {
        ttfb: with_fallback("ttfb", sample.ttfb, TTFB_FALLBACK),
        fcp: with_fallback("fcp", sample.fcp, FCP_FALLBACK),
        lcp: fallback_or(lcp, LCP_FALLBACK),
        fid: with_fallback("fid", sample.fid, FID_FALLBACK),
        inp: with_fallback("inp", sample.inp, INP_FALLBACK),
        cls: sample
            .cls
            .filter(|cls| *cls >= 0.0)
            .unwrap_or(CLS_FALLBACK),
        dom_content_loaded: with_fallback(
            "domContentLoaded",
            sample.dom_content_loaded,
            DOM_CONTENT_LOADED_FALLBACK,
        ),
        load: with_fallback("load", sample.load, LOAD_FALLBACK),
        resource_count: breakdown.resource_count,
        total_resource_size: breakdown.total_size,
        js_size: breakdown.js_size,
        css_size: breakdown.css_size,
        img_size: breakdown.img_size,
        third_party_size: breakdown.third_party_size,
        third_party_count: breakdown.third_party_count,
        current_domain: sample.current_domain.clone(),
        resources: sample.resources.clone(),
    }
}

/// Keep a positive measurement, otherwise substitute `fallback`
pub fn fallback_or(value: f64, fallback: f64) -> f64 {
    if value > 0.0 { value } else { fallback }
}

/// A measurement counts only when it is a positive number
fn measured(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v > 0.0)
}

fn with_fallback(name: &str, value: Option<f64>, fallback: f64) -> f64 {
    match measured(value) {
        Some(v) => v,
        None => {
            tracing::debug!("{} not measured, using fallback {}ms", name, fallback);
            fallback
        }
    }
}

fn estimate_lcp(sample: &MetricsSample) -> f64 {
    if let Some(fcp) = measured(sample.fcp) {
        tracing::debug!("lcp not measured, estimating from fcp");
        fcp * LCP_FCP_RATIO
    } else if let Some(load) = measured(sample.load) {
        tracing::debug!("lcp not measured, estimating from load time");
        load
    } else {
        tracing::debug!("lcp not measured, using default estimate");
        LCP_DEFAULT_ESTIMATE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::ResourceEntry;

    fn complete_sample() -> MetricsSample {
        MetricsSample {
            ttfb: Some(50.0),
            fcp: Some(900.0),
            lcp: Some(1300.0),
            fid: Some(12.0),
            inp: Some(40.0),
            cls: Some(0.02),
            dom_content_loaded: Some(900.0),
            load: Some(1300.0),
            resources: vec![],
            current_domain: "example.com".to_string(),
        }
    }

    #[test]
    fn test_positive_values_pass_through() {
        let metrics = normalize(&complete_sample());
        assert_eq!(metrics.ttfb, 50.0);
        assert_eq!(metrics.fcp, 900.0);
        assert_eq!(metrics.lcp, 1300.0);
        assert_eq!(metrics.fid, 12.0);
        assert_eq!(metrics.inp, 40.0);
        assert_eq!(metrics.cls, 0.02);
        assert_eq!(metrics.dom_content_loaded, 900.0);
        assert_eq!(metrics.load, 1300.0);
    }

    #[test]
    fn test_missing_values_use_fallbacks() {
        let metrics = normalize(&MetricsSample::default());
        assert_eq!(metrics.ttfb, TTFB_FALLBACK);
        assert_eq!(metrics.fcp, FCP_FALLBACK);
        assert_eq!(metrics.fid, FID_FALLBACK);
        assert_eq!(metrics.inp, INP_FALLBACK);
        assert_eq!(metrics.cls, 0.0);
        assert_eq!(metrics.dom_content_loaded, DOM_CONTENT_LOADED_FALLBACK);
        assert_eq!(metrics.load, LOAD_FALLBACK);
        assert_eq!(metrics.lcp, LCP_DEFAULT_ESTIMATE);
    }

    #[test]
    fn test_zero_negative_and_nan_use_fallbacks() {
        let sample = MetricsSample {
            ttfb: Some(0.0),
            fcp: Some(-5.0),
            fid: Some(f64::NAN),
            dom_content_loaded: Some(-1.0),
            load: Some(0.0),
            cls: Some(-0.3),
            ..Default::default()
        };

        let metrics = normalize(&sample);
        assert_eq!(metrics.ttfb, TTFB_FALLBACK);
        assert_eq!(metrics.fcp, FCP_FALLBACK);
        assert_eq!(metrics.fid, FID_FALLBACK);
        assert_eq!(metrics.dom_content_loaded, DOM_CONTENT_LOADED_FALLBACK);
        assert_eq!(metrics.load, LOAD_FALLBACK);
        assert_eq!(metrics.cls, 0.0);
    }

    #[test]
    fn test_lcp_estimated_from_fcp() {
        let sample = MetricsSample {
            fcp: Some(1000.0),
            lcp: Some(0.0),
            load: Some(3000.0),
            ..Default::default()
        };
        assert_eq!(normalize(&sample).lcp, 1500.0);
    }

    #[test]
    fn test_lcp_estimated_from_load_without_fcp() {
        let sample = MetricsSample {
            lcp: None,
            load: Some(2600.0),
            ..Default::default()
        };
        let metrics = normalize(&sample);
        assert_eq!(metrics.lcp, 2600.0);
        // fcp itself still falls back to its own placeholder
        assert_eq!(metrics.fcp, FCP_FALLBACK);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let samples = vec![
            MetricsSample::default(),
            complete_sample(),
            MetricsSample {
                fcp: Some(700.0),
                cls: Some(0.0),
                ..Default::default()
            },
        ];

        for sample in samples {
            let once = normalize(&sample);
            let twice = normalize(&MetricsSample::from(once.clone()));
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_aggregates_come_from_resources() {
        let mut sample = complete_sample();
        sample.resources = vec![
            ResourceEntry {
                name: "https://example.com/app.js".to_string(),
                initiator_type: "script".to_string(),
                transfer_size: Some(1000),
                ..Default::default()
            },
            ResourceEntry {
                name: "https://fonts.other.net/a.css".to_string(),
                initiator_type: "link".to_string(),
                transfer_size: Some(500),
                ..Default::default()
            },
        ];

        let metrics = normalize(&sample);
        assert_eq!(metrics.resource_count, 2);
        assert_eq!(metrics.total_resource_size, 1500);
        assert_eq!(metrics.js_size, 1000);
        assert_eq!(metrics.css_size, 500);
        assert_eq!(metrics.third_party_size, 500);
        assert_eq!(metrics.third_party_count, 1);
    }

    #[test]
    fn test_fallback_or() {
        assert_eq!(fallback_or(0.0, 100.0), 100.0);
        assert_eq!(fallback_or(-3.0, 100.0), 100.0);
        assert_eq!(fallback_or(f64::NAN, 100.0), 100.0);
        assert_eq!(fallback_or(42.0, 100.0), 42.0);
    }
}
