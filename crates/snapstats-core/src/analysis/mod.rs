mod accessibility;
pub mod rating;
mod recommend;
mod score;

pub use accessibility::{AccessibilityAnalyzer, AccessibilityFinding, AccessibilityReport, Impact};
pub use rating::{Metric, MetricRating, Rating, Threshold, rate, rate_all};
pub use recommend::{Category, Priority, Recommendation, RecommendationEngine, recommend};
pub use score::{Grade, PerformanceScore, Scorer, score};

use crate::metrics::{MetricsSample, NormalizedMetrics, normalize};
use crate::resources::{ResourceBreakdown, WaterfallBar, classify, waterfall};
use serde::{Deserialize, Serialize};

/// Everything the report view needs for one analysis run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub score: PerformanceScore,
    pub ratings: Vec<MetricRating>,
    pub recommendations: Vec<Recommendation>,
    pub resources: ResourceBreakdown,
    pub waterfall: Vec<WaterfallBar>,
    pub accessibility: AccessibilityReport,
    pub metrics: NormalizedMetrics,
}

impl AnalysisReport {
    /// Run every analyzer over an already normalized record
    pub fn build(metrics: NormalizedMetrics) -> Self {
        tracing::debug!("Building analysis report");

        let report = Self {
            score: Scorer.analyze(&metrics),
            ratings: rate_all(&metrics),
            recommendations: RecommendationEngine.analyze(&metrics),
            resources: classify(&metrics.resources, &metrics.current_domain),
            waterfall: waterfall(&metrics.resources),
            accessibility: AccessibilityAnalyzer.analyze(&metrics),
            metrics,
        };

        tracing::info!(
            "Analysis complete: score={} grade={}, {} recommendations",
            report.score.score,
            report.score.grade,
            report.recommendations.len()
        );

        report
    }
}

/// Normalize a raw sample and build its report
pub fn analyze(sample: &MetricsSample) -> AnalysisReport {
    AnalysisReport::build(normalize(sample))
}

pub trait Analyzer {
    type Output;

    fn analyze(&self, metrics: &NormalizedMetrics) -> Self::Output;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fast_empty_page_end_to_end() {
        let sample = MetricsSample {
            ttfb: Some(50.0),
            fcp: Some(900.0),
            lcp: Some(1300.0),
            cls: Some(0.02),
            dom_content_loaded: Some(900.0),
            load: Some(1300.0),
            resources: vec![],
            current_domain: "example.com".to_string(),
            ..Default::default()
        };

        let report = analyze(&sample);

        assert_eq!(report.metrics.ttfb, 50.0);
        assert_eq!(report.metrics.fcp, 900.0);
        assert_eq!(report.metrics.lcp, 1300.0);
        assert_eq!(report.metrics.cls, 0.02);
        assert_eq!(report.metrics.dom_content_loaded, 900.0);
        assert_eq!(report.metrics.load, 1300.0);
        assert_eq!(report.score.score, 100);
        assert_eq!(report.score.grade, Grade::A);
        assert!(report.recommendations.is_empty());
        assert_eq!(report.resources, ResourceBreakdown::default());
        assert!(report.waterfall.is_empty());
        assert!(report.ratings.iter().all(|r| r.rating == Rating::Good));
    }

    #[test]
    fn test_report_serializes() {
        let report = analyze(&MetricsSample::default());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["score"]["grade"], "A");
        assert_eq!(json["metrics"]["domContentLoaded"], 800.0);
    }
}
