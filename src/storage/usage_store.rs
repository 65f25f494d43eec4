//! File-backed series persistence
//!
//! This module persists the per-interface series map as a JSON document.
//! The store is deliberately forgiving on the read side: a missing or
//! unparseable file means "start from empty", never a fatal error. Writes
//! surface their failures to the caller. Concurrent writers are the
//! surrounding system's concern; the store assumes one read-modify-write
//! cycle at a time.

use anyhow::{Context, Result};
use log::{debug, error, info};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::timeseries::Timeseries;

/// JSON-file-backed store for the per-interface series map
///
/// A series round-trips completely: every point's timestamp, raw counter
/// values, and correction offset survive `save` followed by `load`.
#[derive(Debug, Clone)]
pub struct UsageStore {
    path: PathBuf,
}

impl UsageStore {
    /// Creates a store backed by the given file path
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// Returns the backing file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the persisted series map
    ///
    /// Returns an empty map when no store exists yet or the file fails to
    /// parse; prior history is a convenience, not a requirement.
    pub fn load(&self) -> HashMap<String, Timeseries> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) => {
                debug!(
                    "no usage store at {} ({}), starting from empty",
                    self.path.display(),
                    e
                );
                return HashMap::new();
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(series) => series,
            Err(e) => {
                error!(
                    "failed to parse usage store at {}, starting new: {}",
                    self.path.display(),
                    e
                );
                HashMap::new()
            }
        }
    }

    /// Persists the series map, creating the parent directory if needed
    pub fn save(&self, series: &HashMap<String, Timeseries>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).context("Failed to create store directory")?;
            }
        }

        let json = serde_json::to_vec(series).context("Failed to serialize series map")?;
        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write usage store at {}", self.path.display()))?;

        debug!(
            "saved {} series to {}",
            series.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Resets the store to an empty series map
    pub fn clear(&self) -> Result<()> {
        self.save(&HashMap::new())?;
        info!("cleared usage store at {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use tempfile::tempdir;

    fn sample_series() -> HashMap<String, Timeseries> {
        let start = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let mut series = Timeseries::new();
        for (i, received) in [50u64, 60, 5].into_iter().enumerate() {
            series.add(
                HashMap::from([("received".to_string(), received)]),
                start + Duration::minutes(i as i64),
            );
        }
        HashMap::from([("eth0".to_string(), series)])
    }

    #[test]
    fn test_load_missing_store_is_empty() {
        let dir = tempdir().unwrap();
        let store = UsageStore::new(dir.path().join("missing.json"));
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_load_corrupt_store_is_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stats.json");
        fs::write(&path, b"{ not json").unwrap();

        let store = UsageStore::new(path);
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_save_load_round_trip_preserves_corrections() {
        let dir = tempdir().unwrap();
        let store = UsageStore::new(dir.path().join("stats.json"));

        store.save(&sample_series()).unwrap();
        let mut restored = store.load();

        let series = restored.get_mut("eth0").unwrap();
        assert_eq!(series.len(), 3);
        // The third reading had a counter reset; its correction must survive
        assert_eq!(series.latest().unwrap().effective_value("received"), Some(65));
    }

    #[test]
    fn test_save_creates_parent_directory() {
        let dir = tempdir().unwrap();
        let store = UsageStore::new(dir.path().join("nested/deeper/stats.json"));

        store.save(&sample_series()).unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn test_clear_empties_the_store() {
        let dir = tempdir().unwrap();
        let store = UsageStore::new(dir.path().join("stats.json"));

        store.save(&sample_series()).unwrap();
        store.clear().unwrap();

        assert!(store.load().is_empty());
        // The file itself remains, holding an empty map
        assert!(store.path().exists());
    }
}
