use crate::metrics::ResourceEntry;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use url::Url;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "svg"];

/// Resource category used for byte totals
///
/// Categories are not exclusive: an entry is tested against each one on its
/// own, by initiator type or by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Script,
    Stylesheet,
    Image,
}

impl ResourceKind {
    /// Check whether a resource entry counts toward this category
    pub fn matches(&self, entry: &ResourceEntry) -> bool {
        let name = entry.name.as_str();
        match self {
            ResourceKind::Script => entry.initiator_type == "script" || name.ends_with(".js"),
            ResourceKind::Stylesheet => entry.initiator_type == "css" || name.ends_with(".css"),
            ResourceKind::Image => {
                entry.initiator_type == "img"
                    || IMAGE_EXTENSIONS
                        .iter()
                        .any(|ext| name.ends_with(&format!(".{}", ext)))
            }
        }
    }
}

/// Bytes and request count attributed to one third-party host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThirdPartyDomainGroup {
    pub domain: String,
    pub size: u64,
    pub count: usize,
}

/// Byte and count aggregates over a page's resources
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceBreakdown {
    pub resource_count: usize,
    pub total_size: u64,
    pub js_size: u64,
    pub css_size: u64,
    pub img_size: u64,
    pub third_party_size: u64,
    pub third_party_count: usize,
    /// Third-party hosts, largest first
    pub third_party_domains: Vec<ThirdPartyDomainGroup>,
}

/// Partition resources into byte totals by type and by origin
pub fn classify(resources: &[ResourceEntry], current_domain: &str) -> ResourceBreakdown {
    tracing::debug!(
        "Classifying {} resources against '{}'",
        resources.len(),
        current_domain
    );

    let size_of = |kind: ResourceKind| -> u64 {
        resources
            .iter()
            .filter(|r| kind.matches(r))
            .map(ResourceEntry::size)
            .sum()
    };

    let third_party: Vec<&ResourceEntry> = resources
        .iter()
        .filter(|r| is_third_party(r, current_domain))
        .collect();

    let breakdown = ResourceBreakdown {
        resource_count: resources.len(),
        total_size: resources.iter().map(ResourceEntry::size).sum(),
        js_size: size_of(ResourceKind::Script),
        css_size: size_of(ResourceKind::Stylesheet),
        img_size: size_of(ResourceKind::Image),
        third_party_size: third_party.iter().map(|r| r.size()).sum(),
        third_party_count: third_party.len(),
        third_party_domains: group_by_domain(&third_party),
    };

    tracing::debug!(
        "Classification complete: {} bytes total, {} third-party requests",
        breakdown.total_size,
        breakdown.third_party_count
    );

    breakdown
}

/// Check whether a resource is served from outside the page's domain
///
/// Subdomains of `current_domain` count as first-party. Resources whose URL
/// has no parseable host are never counted as third-party.
pub fn is_third_party(entry: &ResourceEntry, current_domain: &str) -> bool {
    if entry.name.is_empty() || current_domain.is_empty() {
        return false;
    }

    let Some(host) = parse_host(&entry.name) else {
        tracing::debug!("Could not parse host from resource URL: {}", entry.name);
        return false;
    };

    let current = current_domain.to_lowercase();
    host != current && !host.ends_with(&format!(".{}", current))
}

/// Group third-party resources by host, largest total size first
pub fn group_third_party(
    resources: &[ResourceEntry],
    current_domain: &str,
) -> Vec<ThirdPartyDomainGroup> {
    let third_party: Vec<&ResourceEntry> = resources
        .iter()
        .filter(|r| is_third_party(r, current_domain))
        .collect();
    group_by_domain(&third_party)
}

/// Host name of a resource URL
///
/// Falls back to the text before the first `/`, or "unknown" when that is
/// empty, if the URL cannot be parsed.
pub fn extract_domain(url: &str) -> String {
    if let Some(host) = parse_host(url) {
        return host;
    }

    match url.split('/').next() {
        Some(prefix) if !prefix.is_empty() => prefix.to_string(),
        _ => "unknown".to_string(),
    }
}

fn parse_host(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_lowercase()))
}

fn group_by_domain(resources: &[&ResourceEntry]) -> Vec<ThirdPartyDomainGroup> {
    let mut groups: Vec<ThirdPartyDomainGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for resource in resources {
        let domain = extract_domain(&resource.name);
        match index.get(&domain) {
            Some(&i) => {
                groups[i].size += resource.size();
                groups[i].count += 1;
            }
            None => {
                index.insert(domain.clone(), groups.len());
                groups.push(ThirdPartyDomainGroup {
                    domain,
                    size: resource.size(),
                    count: 1,
                });
            }
        }
    }

    // Stable: equal sizes keep first-seen order
    groups.sort_by(|a, b| b.size.cmp(&a.size));
    groups
}
