use super::Analyzer;
use crate::metrics::NormalizedMetrics;
use serde::{Deserialize, Serialize};

const MIB: u64 = 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessibilityFinding {
    pub title: String,
    pub description: String,
    pub impact: Impact,
}

impl AccessibilityFinding {
    fn new(title: &str, description: &str, impact: Impact) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            impact,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessibilityReport {
    pub issues: Vec<AccessibilityFinding>,
    pub warnings: Vec<AccessibilityFinding>,
    pub good: Vec<AccessibilityFinding>,
}

impl AccessibilityReport {
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty() && self.warnings.is_empty() && self.good.is_empty()
    }
}

/// Flags timing problems that make a page harder to use with assistive technology
pub struct AccessibilityAnalyzer;

impl Analyzer for AccessibilityAnalyzer {
    type Output = AccessibilityReport;

    fn analyze(&self, metrics: &NormalizedMetrics) -> Self::Output {
        let mut report = AccessibilityReport::default();

        if metrics.cls > 0.1 {
            report.issues.push(AccessibilityFinding::new(
                "Layout Shifts",
                "Significant layout shifts detected which can disorient users with disabilities.",
                Impact::High,
            ));
        } else if metrics.cls > 0.05 {
            report.warnings.push(AccessibilityFinding::new(
                "Minor Layout Shifts",
                "Some layout shifts detected. Consider setting explicit dimensions for images.",
                Impact::Medium,
            ));
        } else {
            report.good.push(AccessibilityFinding::new(
                "Stable Layout",
                "Good layout stability with minimal shifts.",
                Impact::Low,
            ));
        }

        if metrics.fid > 300.0 {
            report.issues.push(AccessibilityFinding::new(
                "Slow Interactivity",
                "Slow response to user interactions can make the site difficult to use.",
                Impact::High,
            ));
        } else if metrics.fid > 100.0 {
            report.warnings.push(AccessibilityFinding::new(
                "Moderate Interactivity",
                "Response time could be improved for better accessibility.",
                Impact::Medium,
            ));
        } else {
            report.good.push(AccessibilityFinding::new(
                "Fast Interactivity",
                "Good response time for user interactions.",
                Impact::Low,
            ));
        }

        if metrics.resource_count > 100 {
            report.warnings.push(AccessibilityFinding::new(
                "Many Resources",
                "High number of resources may slow down assistive technologies.",
                Impact::Medium,
            ));
        }

        if metrics.total_resource_size > 10 * MIB {
            report.warnings.push(AccessibilityFinding::new(
                "Large Page Size",
                "Large page size may impact users with slower connections.",
                Impact::Medium,
            ));
        }

        report
    }
}
