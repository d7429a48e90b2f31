use super::Analyzer;
use super::rating::{CLS, FCP, FID, LCP, TTFB};
use crate::metrics::NormalizedMetrics;
use serde::{Deserialize, Serialize};
use std::fmt;

const KIB: u64 = 1024;
const MIB: u64 = 1024 * KIB;

/// Recommendation priority; variants are declared in sort order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Server,
    Rendering,
    Content,
    Interactivity,
    Layout,
    Resources,
    Size,
    ThirdParty,
    Javascript,
    Css,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Server => "server",
            Category::Rendering => "rendering",
            Category::Content => "content",
            Category::Interactivity => "interactivity",
            Category::Layout => "layout",
            Category::Resources => "resources",
            Category::Size => "size",
            Category::ThirdParty => "third-party",
            Category::Javascript => "javascript",
            Category::Css => "css",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub priority: Priority,
    pub category: Category,
    pub text: String,
}

struct Rule {
    priority: Priority,
    category: Category,
    text: &'static str,
    fires: fn(&NormalizedMetrics) -> bool,
}

/// Evaluated in this order; the order breaks ties within a priority
const RULES: &[Rule] = &[
    Rule {
        priority: Priority::High,
        category: Category::Server,
        text: "Consider improving server response time through caching, CDN, or server optimization",
        fires: |m| m.ttfb > TTFB.good,
    },
    Rule {
        priority: Priority::High,
        category: Category::Rendering,
        text: "Optimize critical rendering path by reducing render-blocking resources and inline critical CSS",
        fires: |m| m.fcp > FCP.good,
    },
    Rule {
        priority: Priority::High,
        category: Category::Content,
        text: "Improve Largest Contentful Paint by optimizing images, using next-gen formats, and implementing lazy loading",
        fires: |m| m.lcp > LCP.good,
    },
    Rule {
        priority: Priority::Medium,
        category: Category::Interactivity,
        text: "Reduce JavaScript execution time and implement code splitting to improve interactivity",
        fires: |m| m.fid > FID.good,
    },
    Rule {
        priority: Priority::Medium,
        category: Category::Layout,
        text: "Prevent layout shifts by setting explicit dimensions for images and avoiding dynamic content insertion",
        fires: |m| m.cls > CLS.good,
    },
    Rule {
        priority: Priority::Medium,
        category: Category::Resources,
        text: "High number of resource requests. Consider bundling, using HTTP/2, and reducing external resources",
        fires: |m| m.resource_count > 50,
    },
    Rule {
        priority: Priority::Medium,
        category: Category::Size,
        text: "Large total resource size. Consider optimizing images, implementing code splitting, and using compression",
        fires: |m| m.total_resource_size > 5 * MIB,
    },
    Rule {
        priority: Priority::Low,
        category: Category::ThirdParty,
        text: "Third-party resources account for a significant portion of your page size. Consider reducing third-party dependencies",
        fires: |m| m.third_party_size as f64 > m.total_resource_size as f64 * 0.4,
    },
    Rule {
        priority: Priority::Medium,
        category: Category::Javascript,
        text: "JavaScript size is large. Consider code splitting, tree shaking, and lazy loading techniques",
        fires: |m| m.js_size > MIB,
    },
    Rule {
        priority: Priority::Low,
        category: Category::Css,
        text: "CSS size is large. Consider removing unused CSS, optimizing stylesheets, and using CSS-in-JS",
        fires: |m| m.css_size > 200 * KIB,
    },
];

/// Turns threshold breaches into actionable findings, most urgent first
pub struct RecommendationEngine;

impl Analyzer for RecommendationEngine {
    type Output = Vec<Recommendation>;

    fn analyze(&self, metrics: &NormalizedMetrics) -> Self::Output {
        let mut recommendations: Vec<Recommendation> = RULES
            .iter()
            .filter(|rule| (rule.fires)(metrics))
            .map(|rule| Recommendation {
                priority: rule.priority,
                category: rule.category,
                text: rule.text.to_string(),
            })
            .collect();

        // sort_by_key is stable
        recommendations.sort_by_key(|r| r.priority);

        tracing::debug!("{} recommendations generated", recommendations.len());

        recommendations
    }
}

pub fn recommend(metrics: &NormalizedMetrics) -> Vec<Recommendation> {
    RecommendationEngine.analyze(metrics)
}
