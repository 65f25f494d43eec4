//! Rolling per-interface counter history
//!
//! This module contains the time-series engine at the heart of netusage:
//! an append-only store of timestamped counter readings with counter-reset
//! correction, nearest-timestamp lookup, retention pruning, and the usage
//! calculation built on top of it.
//!
//! ## Module Organization
//!
//! - `point`: SeriesPoint, one immutable reading with its reset correction
//! - `series`: Timeseries, the ordered point store and its retention policy
//! - `rate`: RateCalculator, window-based usage deltas over a series

pub mod point;
pub mod rate;
pub mod series;

pub use point::SeriesPoint;
pub use rate::RateCalculator;
pub use series::{SeriesConfig, Timeseries};
