//! Per-name yearly series: resource parsing and the selection-reconciled cache.

use std::collections::{HashMap, HashSet};

use color_eyre::eyre::eyre;
use color_eyre::Result;

use crate::catalog::SelectionKey;

/// Fixed year range of the source data.
pub const YEAR_MIN: u16 = 1900;
pub const YEAR_MAX: u16 = 2023;
pub const YEARS_LEN: usize = (YEAR_MAX - YEAR_MIN + 1) as usize;

/// One name's year-by-year population counts, 1900–2023.
/// Created on first fetch after selection; evicted when its key leaves the
/// selection.
#[derive(Debug, Clone)]
pub struct NameSeries {
    pub key: SelectionKey,
    pub display_name: String,
    pub total_count: u64,
    /// Counts indexed by `year - YEAR_MIN`; years absent in the resource are 0.
    pub yearly: Vec<u64>,
}

/// Parse a per-name series resource: a JSON object with `processedName`,
/// `count`, and one numeric field per year key ("1900".."2023"). Year keys
/// absent from the resource default to 0.
pub fn parse_series_json(key: SelectionKey, text: &str) -> Result<NameSeries> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    let object = value
        .as_object()
        .ok_or_else(|| eyre!("series resource is not a JSON object"))?;

    let display_name = object
        .get("processedName")
        .and_then(|v| v.as_str())
        .ok_or_else(|| eyre!("series resource missing 'processedName'"))?
        .to_string();
    let total_count = object
        .get("count")
        .and_then(|v| v.as_u64())
        .ok_or_else(|| eyre!("series resource missing numeric 'count'"))?;

    let mut yearly = vec![0u64; YEARS_LEN];
    for (i, slot) in yearly.iter_mut().enumerate() {
        let year = (YEAR_MIN as usize + i).to_string();
        if let Some(v) = object.get(&year) {
            // Year values may be serialized as integers or floats.
            *slot = v
                .as_u64()
                .or_else(|| v.as_f64().map(|f| f.max(0.0) as u64))
                .ok_or_else(|| eyre!("year '{}' is not numeric", year))?;
        }
    }

    Ok(NameSeries {
        key,
        display_name,
        total_count,
        yearly,
    })
}

/// Fetches to start and cache entries to drop so the cache matches the
/// current selection. Produced by [`reconcile`], applied by the event loop.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ReconcilePlan {
    pub to_fetch: Vec<SelectionKey>,
    pub to_evict: Vec<SelectionKey>,
}

impl ReconcilePlan {
    pub fn is_empty(&self) -> bool {
        self.to_fetch.is_empty() && self.to_evict.is_empty()
    }
}

/// In-memory cache of fetched series, reconciled against the selection.
/// Entries are derived state; they are never mutated independently.
#[derive(Debug, Default)]
pub struct SeriesCache {
    entries: HashMap<SelectionKey, NameSeries>,
    in_flight: HashSet<SelectionKey>,
    /// Keys whose fetch failed (after retry) while still selected. Kept so
    /// reconciliation does not refetch in a hot loop; dropped on eviction,
    /// which makes re-selecting a name the manual retry path.
    failed: HashSet<SelectionKey>,
}

impl SeriesCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: SelectionKey) -> Option<&NameSeries> {
        self.entries.get(&key)
    }

    pub fn contains(&self, key: SelectionKey) -> bool {
        self.entries.contains_key(&key)
    }

    pub fn in_flight(&self, key: SelectionKey) -> bool {
        self.in_flight.contains(&key)
    }

    pub fn keys(&self) -> impl Iterator<Item = SelectionKey> + '_ {
        self.entries.keys().copied()
    }

    /// Mark a key as having an outstanding fetch so repeated reconciliation
    /// with the same selection does not start duplicate fetches.
    pub fn mark_in_flight(&mut self, key: SelectionKey) {
        self.in_flight.insert(key);
    }

    /// Record a fetch failure. The key stays out of the cache and out of
    /// future fetch plans until it leaves the selection.
    pub fn mark_failed(&mut self, key: SelectionKey) {
        self.in_flight.remove(&key);
        self.failed.insert(key);
    }

    /// Insert a completed fetch, guarded against stale writes: if the key was
    /// deselected while the fetch was outstanding the result is discarded.
    /// Returns whether the series was inserted.
    pub fn insert_if_selected(&mut self, series: NameSeries, selection: &[SelectionKey]) -> bool {
        let key = series.key;
        self.in_flight.remove(&key);
        if !selection.contains(&key) {
            return false;
        }
        self.entries.insert(key, series);
        true
    }

    /// Drop the entries named by the plan, and forget failure markers for
    /// keys no longer selected.
    pub fn apply_evictions(&mut self, plan: &ReconcilePlan, selection: &[SelectionKey]) {
        for key in &plan.to_evict {
            self.entries.remove(key);
        }
        self.failed.retain(|k| selection.contains(k));
    }

    /// Pure reconciliation: fetches for selected-but-uncached keys (skipping
    /// in-flight and failed ones), evictions for cached-but-deselected keys.
    pub fn reconcile(&self, selection: &[SelectionKey]) -> ReconcilePlan {
        let to_fetch = selection
            .iter()
            .copied()
            .filter(|k| {
                !self.entries.contains_key(k)
                    && !self.in_flight.contains(k)
                    && !self.failed.contains(k)
            })
            .collect();
        let to_evict = self
            .entries
            .keys()
            .copied()
            .filter(|k| !selection.contains(k))
            .collect();
        ReconcilePlan { to_fetch, to_evict }
    }
}
