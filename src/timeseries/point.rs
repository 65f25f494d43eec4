//! Series point data structure
//!
//! This module contains the SeriesPoint struct, a single timestamped reading
//! of cumulative interface counters together with the correction offset that
//! keeps its effective values monotonic across counter resets.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One timestamped snapshot of raw counter values for a single interface
///
/// The raw values are never mutated after creation. The correction offset is
/// assigned exactly once, when the point is accepted into a series, and is
/// immutable afterwards. Consumers only ever see the effective values
/// (raw plus correction), which continue the cumulative total across counter
/// resets caused by driver reloads or suspend/resume cycles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    /// UTC timestamp when the reading was taken
    pub timestamp: DateTime<Utc>,
    /// Counter key (e.g. "received", "transmitted") to the value as read
    /// from the source at `timestamp`
    raw: HashMap<String, u64>,
    /// Per-key offset re-anchoring this point after a counter reset;
    /// `None` until the point is accepted into a series
    correction: Option<HashMap<String, u64>>,
}

impl SeriesPoint {
    /// Creates a new point with no correction assigned yet
    pub fn new(timestamp: DateTime<Utc>, raw: HashMap<String, u64>) -> Self {
        Self {
            timestamp,
            raw,
            correction: None,
        }
    }

    /// Returns the raw counter values exactly as read from the source
    pub fn raw_values(&self) -> &HashMap<String, u64> {
        &self.raw
    }

    /// Returns the correction offset assigned at insertion time, if any
    pub fn correction(&self) -> Option<&HashMap<String, u64>> {
        self.correction.as_ref()
    }

    /// Returns the reset-corrected value for a single counter key
    ///
    /// The correction is applied per key; a key missing from the correction
    /// map contributes an offset of zero. Returns `None` when the key was
    /// never read for this point.
    pub fn effective_value(&self, key: &str) -> Option<u64> {
        let raw = *self.raw.get(key)?;
        let offset = self
            .correction
            .as_ref()
            .and_then(|fix| fix.get(key))
            .copied()
            .unwrap_or(0);
        Some(raw.saturating_add(offset))
    }

    /// Returns all reset-corrected counter values
    ///
    /// This is the only view of the data exposed to usage calculations.
    pub fn effective_values(&self) -> HashMap<String, u64> {
        self.raw
            .keys()
            .map(|key| {
                // effective_value cannot miss for a key taken from the raw map
                (key.clone(), self.effective_value(key).unwrap_or(0))
            })
            .collect()
    }

    /// Assigns this point's correction based on the previous accepted point
    ///
    /// If any key shared with the previous point's raw data dropped in value,
    /// the underlying counter was reset and this point is re-anchored on the
    /// previous point's effective values, so its effective values continue
    /// the prior cumulative total. Otherwise the previous point's correction
    /// carries forward unchanged.
    ///
    /// Called exactly once, from `Timeseries::add`, before the point becomes
    /// visible to readers.
    pub(crate) fn reconcile_with(&mut self, prev: &SeriesPoint) {
        for (key, value) in &self.raw {
            if let Some(prev_value) = prev.raw.get(key) {
                if prev_value > value {
                    // Counter reset: one dropped key is enough to re-anchor
                    // every key on the previous cumulative totals
                    self.correction = Some(prev.effective_values());
                    return;
                }
            }
        }

        self.correction = prev.correction.clone();
    }
}
