//! Interface counter snapshot source
//!
//! This module wraps the sysinfo network interface list behind a small
//! snapshot type: one mapping from interface name to its cumulative
//! received/transmitted byte counters at call time. Malformed or
//! unreadable source data is sysinfo's concern and never reaches the
//! time-series engine.

use log::{debug, trace};
use std::collections::HashMap;
use sysinfo::Networks;

use crate::collectors::errors::CollectorError;

/// Counter key for cumulative bytes received
pub const RECEIVED: &str = "received";
/// Counter key for cumulative bytes transmitted
pub const TRANSMITTED: &str = "transmitted";

/// Counter key to cumulative value for one interface
pub type CounterMap = HashMap<String, u64>;
/// Interface name to its counters at a single instant
pub type InterfaceSnapshot = HashMap<String, CounterMap>;

/// Reads cumulative per-interface byte counters from the operating system
#[derive(Debug)]
pub struct SnapshotSource {
    /// System network interfaces manager from sysinfo crate
    networks: Networks,
}

impl Default for SnapshotSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotSource {
    /// Creates a source with a freshly refreshed interface list
    pub fn new() -> Self {
        Self {
            networks: Networks::new_with_refreshed_list(),
        }
    }

    /// Takes one snapshot of every interface's cumulative counters
    pub fn take(&mut self) -> Result<InterfaceSnapshot, CollectorError> {
        // refresh(true) refreshes the statistics, not just the interface list
        self.networks.refresh(true);

        let interface_count = self.networks.len();
        if interface_count == 0 {
            return Err(CollectorError::NoInterfaces);
        }

        let snapshot: InterfaceSnapshot = self
            .networks
            .iter()
            .map(|(name, network)| {
                let counters = HashMap::from([
                    (RECEIVED.to_string(), network.total_received()),
                    (TRANSMITTED.to_string(), network.total_transmitted()),
                ]);
                trace!(
                    "interface '{}': rx={} bytes, tx={} bytes",
                    name,
                    network.total_received(),
                    network.total_transmitted()
                );
                (name.to_string(), counters)
            })
            .collect();

        debug!("snapshot taken for {} interfaces", snapshot.len());
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_counters_are_complete() {
        let mut source = SnapshotSource::new();

        // Test environments may expose no interfaces at all; only check the
        // shape of whatever comes back
        if let Ok(snapshot) = source.take() {
            for (name, counters) in &snapshot {
                assert!(!name.is_empty());
                assert!(counters.contains_key(RECEIVED));
                assert!(counters.contains_key(TRANSMITTED));
            }
        }
    }
}
