//! Capped rolling history of past runs, for trend display.
//!
//! The history never fails loudly: a corrupt persisted value is discarded
//! and a write that does not fit is retried with fewer entries.

mod store;

pub use store::{FileStore, HistoryStore, MemoryStore};

use crate::metrics::{FCP_FALLBACK, LCP_FALLBACK, NormalizedMetrics, TTFB_FALLBACK, fallback_or};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Number of runs kept; the oldest is evicted first
pub const MAX_ENTRIES: usize = 5;

/// Serialized histories above this size are cut to the last 3 runs before saving
pub const MAX_SERIALIZED_BYTES: usize = 1024 * 1024;

/// Windows tried, in order, after a failed save
const RETRY_WINDOWS: [usize; 2] = [3, 2];

/// Bars never shrink below this percentage, so they stay visible
pub const MIN_BAR_HEIGHT: f64 = 5.0;
pub const MAX_BAR_HEIGHT: f64 = 100.0;

/// Smallest value bars are scaled against
pub const MIN_SCALE: f64 = 100.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: String,
    #[serde(default)]
    pub ttfb: f64,
    #[serde(default)]
    pub fcp: f64,
    #[serde(default)]
    pub lcp: f64,
}

impl HistoryEntry {
    /// Project a metrics record down to the fields shown in the trend view
    pub fn from_metrics(metrics: &NormalizedMetrics, at: DateTime<Utc>) -> Self {
        Self {
            timestamp: at.to_rfc3339_opts(SecondsFormat::Millis, true),
            ttfb: fallback_or(metrics.ttfb, TTFB_FALLBACK),
            fcp: fallback_or(metrics.fcp, FCP_FALLBACK),
            lcp: fallback_or(metrics.lcp, LCP_FALLBACK),
        }
    }
}

/// One bar of the trend chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    pub timestamp: String,
    pub lcp: f64,
    /// Bar height as a percentage of the chart
    pub height: f64,
}

pub struct History<S: HistoryStore> {
    store: S,
    entries: Vec<HistoryEntry>,
}

impl<S: HistoryStore> History<S> {
    /// Load the persisted history
    ///
    /// Anything that is not a JSON array of entries is treated as corruption:
    /// the stored value is cleared and the history starts empty.
    pub fn load(mut store: S) -> Self {
        let entries = match store.load_raw() {
            Ok(None) => Vec::new(),
            Ok(Some(raw)) => match parse_entries(&raw) {
                Some(mut entries) => {
                    trim_to(&mut entries, MAX_ENTRIES);
                    tracing::debug!("Loaded {} history entries", entries.len());
                    entries
                }
                None => {
                    tracing::warn!("Invalid history data format, resetting");
                    if let Err(e) = store.clear() {
                        tracing::error!("Error removing corrupted history data: {}", e);
                    }
                    Vec::new()
                }
            },
            Err(e) => {
                tracing::warn!("Could not read history data, starting empty: {}", e);
                Vec::new()
            }
        };

        Self { store, entries }
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Record a run at the current time and persist the history
    pub fn append(&mut self, metrics: &NormalizedMetrics) {
        self.append_at(metrics, Utc::now());
    }

    /// Record a run at the given time and persist the history
    pub fn append_at(&mut self, metrics: &NormalizedMetrics, at: DateTime<Utc>) {
        self.entries.push(HistoryEntry::from_metrics(metrics, at));
        trim_to(&mut self.entries, MAX_ENTRIES);
        self.persist();
    }

    /// Drop every entry and the persisted value
    pub fn clear(&mut self) {
        self.entries.clear();
        if let Err(e) = self.store.clear() {
            tracing::error!("Error clearing history: {}", e);
        }
    }

    pub fn render_points(&self) -> Vec<HistoryPoint> {
        render_points(&self.entries)
    }

    fn persist(&mut self) {
        match serde_json::to_string(&self.entries) {
            Ok(raw) if raw.len() > MAX_SERIALIZED_BYTES => {
                tracing::warn!("History data too large, keeping only last 3 entries");
                trim_to(&mut self.entries, RETRY_WINDOWS[0]);
            }
            Ok(_) => {}
            Err(e) => {
                tracing::error!("Error serializing history data: {}", e);
                return;
            }
        }

        let mut last_error = match self.try_save() {
            Ok(()) => return,
            Err(e) => e,
        };

        for window in RETRY_WINDOWS {
            tracing::warn!(
                "Error saving history data ({}), retrying with last {} entries",
                last_error,
                window
            );
            trim_to(&mut self.entries, window);
            match self.try_save() {
                Ok(()) => {
                    tracing::info!("Saved reduced history data ({} entries)", self.entries.len());
                    return;
                }
                Err(e) => last_error = e,
            }
        }

        tracing::error!("Failed to save even reduced history data: {}", last_error);
    }

    fn try_save(&mut self) -> crate::Result<()> {
        let raw = serde_json::to_string(&self.entries)?;
        self.store.save_raw(&raw)?;
        tracing::debug!("Saved {} history entries", self.entries.len());
        Ok(())
    }
}

/// Scale each entry's LCP into a bar height
///
/// Heights are relative to the largest TTFB, FCP or LCP in the history, but
/// never to less than [`MIN_SCALE`], and are kept within 5..=100 percent.
pub fn render_points(entries: &[HistoryEntry]) -> Vec<HistoryPoint> {
    let max_value = entries
        .iter()
        .flat_map(|e| [e.ttfb, e.fcp, e.lcp])
        .fold(MIN_SCALE, f64::max);

    entries
        .iter()
        .map(|entry| HistoryPoint {
            timestamp: entry.timestamp.clone(),
            lcp: entry.lcp,
            height: (entry.lcp / max_value * 100.0).clamp(MIN_BAR_HEIGHT, MAX_BAR_HEIGHT),
        })
        .collect()
}

fn parse_entries(raw: &str) -> Option<Vec<HistoryEntry>> {
    let value: serde_json::Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("Error parsing history data: {}", e);
            return None;
        }
    };

    if !value.is_array() {
        return None;
    }

    serde_json::from_value(value)
        .map_err(|e| tracing::warn!("History entries are malformed: {}", e))
        .ok()
}

/// Keep only the newest `max` entries
fn trim_to(entries: &mut Vec<HistoryEntry>, max: usize) {
    if entries.len() > max {
        entries.drain(..entries.len() - max);
    }
}
