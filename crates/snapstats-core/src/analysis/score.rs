use super::Analyzer;
use super::rating::{CLS, FCP, LCP, TTFB};
use crate::metrics::NormalizedMetrics;
use serde::{Deserialize, Serialize};
use std::fmt;

const MIB: u64 = 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    /// Map a score to a letter grade, highest band first
    pub fn from_score(score: u8) -> Self {
        match score {
            90.. => Grade::A,
            80..=89 => Grade::B,
            70..=79 => Grade::C,
            60..=69 => Grade::D,
            _ => Grade::F,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Grade::A => "Excellent",
            Grade::B => "Good",
            Grade::C => "Needs improvement",
            Grade::D => "Poor",
            Grade::F => "Failing",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceScore {
    pub score: u8,
    pub grade: Grade,
}

/// Deducts points from 100 for every metric past its good or poor line
pub struct Scorer;

impl Analyzer for Scorer {
    type Output = PerformanceScore;

    fn analyze(&self, metrics: &NormalizedMetrics) -> Self::Output {
        let deductions = deduction(metrics.ttfb, TTFB.poor, 15, TTFB.good, 8)
            + deduction(metrics.fcp, FCP.poor, 15, FCP.good, 8)
            + deduction(metrics.lcp, LCP.poor, 15, LCP.good, 8)
            + deduction(metrics.cls, CLS.poor, 10, CLS.good, 5)
            + deduction(metrics.resource_count as f64, 100.0, 5, 50.0, 2)
            + deduction(
                metrics.total_resource_size as f64,
                (10 * MIB) as f64,
                5,
                (5 * MIB) as f64,
                2,
            );

        let score = 100u32.saturating_sub(deductions) as u8;
        let grade = Grade::from_score(score);

        tracing::debug!("Performance score {} (grade {})", score, grade);

        PerformanceScore { score, grade }
    }
}

/// Points lost by one metric; only the worse tier applies
fn deduction(value: f64, poor: f64, poor_points: u32, good: f64, good_points: u32) -> u32 {
    if value > poor {
        poor_points
    } else if value > good {
        good_points
    } else {
        0
    }
}

/// Score a metrics record and grade it
pub fn score(metrics: &NormalizedMetrics) -> PerformanceScore {
    Scorer.analyze(metrics)
}
