use anyhow::Result;
use chrono::{Duration, Utc};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::collectors::{format_bytes, SnapshotSource, UsageCollector, RECEIVED, TRANSMITTED};
use crate::storage::UsageStore;
use crate::timeseries::SeriesConfig;

/// Main CLI structure for the netusage application
/// Uses clap's derive macros for automatic CLI generation
#[derive(Parser)]
#[command(version)] // Automatically uses version from Cargo.toml
#[command(about = "Track cumulative network interface usage across collection cycles")]
#[command(long_about = "Netusage keeps a rolling history of per-interface byte counters and \
reports how much was received and transmitted over a lookback window. Counter resets caused \
by driver reloads or suspend/resume cycles are corrected transparently, so totals keep \
accumulating across them. Each invocation performs one collection cycle against the \
file-backed history store.")]
pub struct Cli {
    /// Path of the file-backed usage history store
    #[arg(
        long,
        default_value = "/tmp/netusage.json",
        help = "Path of the usage history store"
    )]
    pub store: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands for the netusage application
#[derive(Subcommand)]
pub enum Commands {
    /// Collect a fresh counter snapshot and report usage over a window
    #[command(about = "Collect a snapshot and report per-interface usage")]
    #[command(long_about = "Loads the usage history, ingests one fresh counter snapshot, \
prunes expired points, saves the history back, and prints the usage delta per interface.\n\n\
Examples:\n  \
netusage usage                        # Usage over the last 24 hours\n  \
netusage usage --window 6             # Usage over the last 6 hours\n  \
netusage usage --interface eth0       # Single interface only\n  \
netusage usage --weighted             # Extrapolate short history to the window\n  \
netusage usage --json                 # Machine-readable output")]
    Usage {
        /// Lookback window in hours
        #[arg(
            short,
            long,
            default_value = "24",
            help = "Lookback window in hours"
        )]
        window: u64,

        /// Report only a specific network interface
        #[arg(short = 'I', long, help = "Report a specific network interface")]
        interface: Option<String>,

        /// Scale the delta up when less history than the window is available
        #[arg(
            long,
            help = "Extrapolate the delta to the full window when less history is available"
        )]
        weighted: bool,

        /// Emit the report as JSON instead of formatted text
        #[arg(long, help = "Emit the report as JSON")]
        json: bool,
    },

    /// Reset the usage history store
    #[command(about = "Clear all recorded usage history")]
    Clear,
}

/// Runs one collection cycle and prints the usage report
pub fn run_usage(
    store_path: &Path,
    window_hours: u64,
    interface: Option<&str>,
    weighted: bool,
    json: bool,
) -> Result<()> {
    let store = UsageStore::new(store_path);
    let mut collector = UsageCollector::from_series(store.load(), SeriesConfig::default());

    let mut source = SnapshotSource::new();
    let snapshot = source.take()?;
    collector.update(&snapshot, Utc::now());
    store.save(collector.series())?;

    let window = Duration::hours(window_hours as i64);
    let report = collector.compute_usage(interface, window, weighted);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Network Usage (last {}h)", window_hours);
    println!("========================");

    let mut names: Vec<&String> = report.keys().collect();
    names.sort();
    for name in names {
        let usage = &report[name];
        println!("\nInterface: {}", name);
        if let Some(received) = usage.get(RECEIVED) {
            println!("  Received: {}", format_bytes(*received));
        }
        if let Some(transmitted) = usage.get(TRANSMITTED) {
            println!("  Transmitted: {}", format_bytes(*transmitted));
        }
    }

    Ok(())
}

/// Clears the usage history store
pub fn run_clear(store_path: &Path) -> Result<()> {
    let store = UsageStore::new(store_path);
    store.clear()?;
    println!("Cleared usage history at {}", store_path.display());
    Ok(())
}
