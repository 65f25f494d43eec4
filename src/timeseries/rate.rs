//! Window-based usage deltas
//!
//! This module contains the RateCalculator, which derives per-counter usage
//! deltas from a series over a configurable lookback window, optionally
//! extrapolated to the full window length when less history is available.

use chrono::Duration;
use log::trace;
use std::collections::HashMap;

use crate::timeseries::series::Timeseries;

/// Derives per-key usage deltas from a series over a lookback window
#[derive(Debug, Clone)]
pub struct RateCalculator {
    window: Duration,
    weighted: bool,
}

impl RateCalculator {
    /// Creates a calculator for the given lookback window
    ///
    /// With `weighted` set, deltas computed from a shorter actual history
    /// are scaled up to the requested window: 12 hours of data queried over
    /// a 24 hour window yields twice the observed consumption.
    pub fn new(window: Duration, weighted: bool) -> Self {
        Self { window, weighted }
    }

    /// Computes the usage delta between the latest point and the point
    /// closest to `latest - window`
    ///
    /// Returns `None` for an empty series; an empty series contributes no
    /// entry to a usage report rather than a zero-filled one. Keys present
    /// in only one of the two points are omitted. The computation is a pure
    /// function of the series contents.
    pub fn compute(&self, series: &mut Timeseries) -> Option<HashMap<String, f64>> {
        let latest = series.latest()?.clone();
        let reference = series.closest_to(latest.timestamp - self.window)?.clone();
        let actual_span = latest.timestamp - reference.timestamp;

        let multiplier = if self.weighted && actual_span > Duration::zero() {
            self.window.num_milliseconds() as f64 / actual_span.num_milliseconds() as f64
        } else {
            // Unweighted, or degenerate data created at a single instant
            1.0
        };

        let latest_values = latest.effective_values();
        let reference_values = reference.effective_values();

        let mut usage = HashMap::new();
        for (key, current) in &latest_values {
            let Some(prior) = reference_values.get(key) else {
                continue;
            };
            usage.insert(
                key.clone(),
                current.saturating_sub(*prior) as f64 * multiplier,
            );
        }

        trace!(
            "usage over {}s window: span {}s, multiplier {:.3}, {} keys",
            self.window.num_seconds(),
            actual_span.num_seconds(),
            multiplier,
            usage.len()
        );

        Some(usage)
    }
}
