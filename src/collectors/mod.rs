pub mod errors;
pub mod formatting;
pub mod snapshot;
pub mod usage_collector;

pub use errors::CollectorError;
pub use formatting::format_bytes;
pub use snapshot::{CounterMap, InterfaceSnapshot, SnapshotSource, RECEIVED, TRANSMITTED};
pub use usage_collector::{UsageCollector, UsageReport};
