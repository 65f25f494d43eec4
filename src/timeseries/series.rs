//! Ordered point store with retention policy
//!
//! This module contains the Timeseries struct, an append-only, time-ordered
//! collection of SeriesPoint readings for one interface. It owns duplicate
//! suppression, counter-reset correction propagation, nearest-time lookup,
//! and retention pruning.

use chrono::{DateTime, Duration, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::timeseries::point::SeriesPoint;

/// Retention and spacing policy for a single series
///
/// Injected into each series rather than read from globals so tests can run
/// with tight spacing and small caps.
#[derive(Debug, Clone)]
pub struct SeriesConfig {
    /// Minimum time between two accepted points; closer submissions are
    /// silently dropped
    pub min_spacing: Duration,
    /// Maximum age of a retained point relative to the prune invocation time
    pub max_age: Duration,
    /// Hard cap on series length after each prune
    pub max_points: usize,
}

impl Default for SeriesConfig {
    fn default() -> Self {
        Self {
            min_spacing: Duration::seconds(50),
            max_age: Duration::days(2),
            // Three days of one-minute samples
            max_points: 60 * 24 * 3,
        }
    }
}

/// Append-only, time-ordered counter history for one network interface
///
/// Points are kept sorted lazily: mutation marks the series dirty when order
/// could have been violated, and every order-dependent read re-sorts first.
/// Reads therefore take `&mut self`, mirroring the single-threaded
/// read-modify-write cycle this engine is built for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timeseries {
    points: Vec<SeriesPoint>,
    sorted: bool,
    #[serde(skip, default)]
    config: SeriesConfig,
}

impl Default for Timeseries {
    fn default() -> Self {
        Self::new()
    }
}

impl Timeseries {
    /// Creates an empty series with the default retention policy
    pub fn new() -> Self {
        Self::with_config(SeriesConfig::default())
    }

    /// Creates an empty series with a custom retention policy
    pub fn with_config(config: SeriesConfig) -> Self {
        Self {
            points: Vec::new(),
            sorted: false,
            config,
        }
    }

    /// Replaces the retention policy
    ///
    /// Needed after deserialization, which restores points but not the
    /// policy the owning collector runs with.
    pub fn set_config(&mut self, config: SeriesConfig) {
        self.config = config;
    }

    /// Number of retained points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the series has no retained points
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Appends a new reading taken at `now`
    ///
    /// The submission is silently dropped when it falls within `min_spacing`
    /// of the latest accepted point; duplicate-spacing violations are not an
    /// error. Otherwise the new point's reset correction is derived from the
    /// chronological latest point (see `SeriesPoint::reconcile_with`) before
    /// it is appended.
    pub fn add(&mut self, raw: HashMap<String, u64>, now: DateTime<Utc>) {
        self.ensure_sorted();

        if let Some(latest) = self.points.last() {
            if now - latest.timestamp < self.config.min_spacing {
                debug!(
                    "previous point at {} too close to new point at {}, ignoring",
                    latest.timestamp, now
                );
                return;
            }
        }

        let mut point = SeriesPoint::new(now, raw);
        if let Some(latest) = self.points.last() {
            point.reconcile_with(latest);
        }

        // The spacing guard only admits timestamps past the sorted tail, so
        // a plain append preserves order; the flag is cleared defensively in
        // case that precondition ever stops holding
        let is_new_max = self.points.last().map_or(true, |p| p.timestamp <= now);
        self.points.push(point);
        if !is_new_max {
            self.sorted = false;
        }
    }

    /// Returns the chronologically last point, or `None` when empty
    pub fn latest(&mut self) -> Option<&SeriesPoint> {
        self.ensure_sorted();
        self.points.last()
    }

    /// Returns the point whose timestamp is nearest to `time`
    ///
    /// Queries before the first point clamp to the first point, queries past
    /// the last clamp to the last. Between two points the smaller absolute
    /// distance wins; an exact tie resolves to the later point.
    pub fn closest_to(&mut self, time: DateTime<Utc>) -> Option<&SeriesPoint> {
        self.closest_index(time).map(|idx| &self.points[idx])
    }

    /// Binary search for the retained point nearest to `time`
    fn closest_index(&mut self, time: DateTime<Utc>) -> Option<usize> {
        self.ensure_sorted();
        if self.points.is_empty() {
            return None;
        }

        // Leftmost insertion index for `time`
        let idx = self.points.partition_point(|p| p.timestamp < time);
        if idx == 0 {
            return Some(0);
        }
        if idx == self.points.len() {
            return Some(idx - 1);
        }

        let before = &self.points[idx - 1];
        let after = &self.points[idx];
        if after.timestamp - time <= time - before.timestamp {
            Some(idx)
        } else {
            Some(idx - 1)
        }
    }

    /// Discards points older than `max_age` relative to `now`, then enforces
    /// the `max_points` cap by evicting the oldest points
    ///
    /// The point bracketing the age cutoff is retained when it sits on or
    /// after the cutoff, so a boundary lookup still has something to return.
    pub fn prune(&mut self, now: DateTime<Utc>) {
        let cutoff = now - self.config.max_age;

        if let Some(idx) = self.closest_index(cutoff) {
            let end = if self.points[idx].timestamp < cutoff {
                idx + 1
            } else {
                idx
            };
            if end > 0 {
                debug!("discarding {} points older than {}", end, cutoff);
                self.points.drain(..end);
            }
        }

        if self.points.len() > self.config.max_points {
            let excess = self.points.len() - self.config.max_points;
            info!(
                "too many points ({} > {}), deleting the {} oldest",
                self.points.len(),
                self.config.max_points,
                excess
            );
            self.points.drain(..excess);
        }
    }

    /// Stable sort by timestamp
    pub fn sort(&mut self) {
        self.points.sort_by_key(|p| p.timestamp);
        self.sorted = true;
    }

    fn ensure_sorted(&mut self) {
        if !self.sorted {
            self.sort();
        }
    }
}
