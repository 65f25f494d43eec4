//! Usage collector orchestration
//!
//! This module contains the UsageCollector, which owns the per-interface
//! series map and drives one collection cycle: ingest a fresh snapshot into
//! each interface's series, prune every tracked series, and drop the ones
//! left empty. Usage queries over the map are delegated to the
//! RateCalculator per retained interface.

use chrono::{DateTime, Duration, Utc};
use log::{debug, info};
use std::collections::HashMap;

use crate::collectors::snapshot::InterfaceSnapshot;
use crate::timeseries::{RateCalculator, SeriesConfig, Timeseries};

/// Per-interface usage deltas keyed by interface name
pub type UsageReport = HashMap<String, HashMap<String, f64>>;

/// Maintains one counter series per network interface
///
/// State mutates only inside `update`, once per collection cycle; the
/// collector assumes exclusive access for the duration of a cycle and offers
/// no internal concurrency control.
#[derive(Debug, Default)]
pub struct UsageCollector {
    /// Interface name to its retained counter history
    series: HashMap<String, Timeseries>,
    /// Retention policy applied to every series
    config: SeriesConfig,
    /// Counter for total collection cycles performed
    cycle_count: u64,
}

impl UsageCollector {
    /// Creates an empty collector with the default retention policy
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty collector with a custom retention policy
    pub fn with_config(config: SeriesConfig) -> Self {
        Self {
            series: HashMap::new(),
            config,
            cycle_count: 0,
        }
    }

    /// Rebuilds a collector around previously persisted series
    ///
    /// Deserialized series come back without a retention policy, so the
    /// collector's policy is pushed down into each of them.
    pub fn from_series(mut series: HashMap<String, Timeseries>, config: SeriesConfig) -> Self {
        for ts in series.values_mut() {
            ts.set_config(config.clone());
        }
        Self {
            series,
            config,
            cycle_count: 0,
        }
    }

    /// Returns the tracked series map, for persistence
    pub fn series(&self) -> &HashMap<String, Timeseries> {
        &self.series
    }

    /// Consumes the collector and returns the tracked series map
    pub fn into_series(self) -> HashMap<String, Timeseries> {
        self.series
    }

    /// Runs one collection cycle at `now`
    ///
    /// Every interface in the snapshot gets a series on first observation.
    /// Pruning runs over all tracked series, including interfaces absent
    /// from this snapshot, so an unplugged interface ages out of the map
    /// once its points expire.
    pub fn update(&mut self, snapshot: &InterfaceSnapshot, now: DateTime<Utc>) {
        self.cycle_count += 1;

        for (name, counters) in snapshot {
            let series = self
                .series
                .entry(name.clone())
                .or_insert_with(|| Timeseries::with_config(self.config.clone()));
            series.add(counters.clone(), now);
        }

        for series in self.series.values_mut() {
            series.prune(now);
        }

        let tracked_before = self.series.len();
        self.series.retain(|name, series| {
            if series.is_empty() {
                debug!("interface '{}' has no retained points, dropping it", name);
                false
            } else {
                true
            }
        });

        info!(
            "usage collection #{} at {}: {} interfaces in snapshot, {} tracked, {} aged out",
            self.cycle_count,
            now.format("%H:%M:%S"),
            snapshot.len(),
            self.series.len(),
            tracked_before - self.series.len()
        );
    }

    /// Computes per-interface usage deltas over the lookback window
    ///
    /// With `interface` set, only that interface is queried; otherwise every
    /// tracked interface is. Interfaces whose series is empty contribute no
    /// entry to the report.
    pub fn compute_usage(
        &mut self,
        interface: Option<&str>,
        window: Duration,
        weighted: bool,
    ) -> UsageReport {
        let calculator = RateCalculator::new(window, weighted);
        let mut report = UsageReport::new();

        match interface {
            Some(name) => {
                if let Some(series) = self.series.get_mut(name) {
                    if let Some(usage) = calculator.compute(series) {
                        report.insert(name.to_string(), usage);
                    }
                }
            }
            None => {
                for (name, series) in self.series.iter_mut() {
                    if let Some(usage) = calculator.compute(series) {
                        report.insert(name.clone(), usage);
                    }
                }
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collectors::snapshot::{RECEIVED, TRANSMITTED};
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap() + Duration::seconds(secs)
    }

    fn snapshot_for(interface: &str, received: u64, transmitted: u64) -> InterfaceSnapshot {
        InterfaceSnapshot::from([(
            interface.to_string(),
            HashMap::from([
                (RECEIVED.to_string(), received),
                (TRANSMITTED.to_string(), transmitted),
            ]),
        )])
    }

    #[test]
    fn test_update_creates_series_on_first_observation() {
        let mut collector = UsageCollector::new();
        collector.update(&snapshot_for("eth0", 100, 50), at(0));

        assert_eq!(collector.series().len(), 1);
        assert_eq!(collector.series()["eth0"].len(), 1);
    }

    #[test]
    fn test_update_appends_to_existing_series() {
        let mut collector = UsageCollector::new();
        collector.update(&snapshot_for("eth0", 100, 50), at(0));
        collector.update(&snapshot_for("eth0", 200, 80), at(60));

        assert_eq!(collector.series()["eth0"].len(), 2);
    }

    #[test]
    fn test_update_drops_aged_out_interface() {
        let mut collector = UsageCollector::new();
        collector.update(&snapshot_for("usb0", 100, 50), at(0));

        // The interface disappears from later snapshots; once its only
        // point exceeds max_age the series empties and the entry goes away
        collector.update(&snapshot_for("eth0", 10, 5), at(0) + Duration::days(3));

        assert!(!collector.series().contains_key("usb0"));
        assert!(collector.series().contains_key("eth0"));
    }

    #[test]
    fn test_compute_usage_skips_interfaces_without_data() {
        let mut collector = UsageCollector::new();
        let report = collector.compute_usage(None, Duration::hours(24), false);
        assert!(report.is_empty());
    }

    #[test]
    fn test_compute_usage_for_single_interface() {
        let mut collector = UsageCollector::new();
        collector.update(&snapshot_for("eth0", 0, 0), at(0));
        collector.update(&snapshot_for("eth0", 300, 120), at(60));

        let report = collector.compute_usage(Some("eth0"), Duration::hours(24), false);
        assert_eq!(report["eth0"][RECEIVED], 300.0);
        assert_eq!(report["eth0"][TRANSMITTED], 120.0);

        let missing = collector.compute_usage(Some("wlan0"), Duration::hours(24), false);
        assert!(missing.is_empty());
    }

    #[test]
    fn test_compute_usage_corrects_counter_reset() {
        let mut collector = UsageCollector::new();
        for (i, received) in [50u64, 60, 5, 15].into_iter().enumerate() {
            collector.update(&snapshot_for("ppp0", received, 0), at(i as i64 * 60));
        }

        let report = collector.compute_usage(None, Duration::hours(24), false);
        // Effective sequence 50, 60, 65, 75 against the earliest reading
        assert_eq!(report["ppp0"][RECEIVED], 25.0);
    }
}
