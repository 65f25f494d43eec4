//! Error types for snapshot collection

use thiserror::Error;

/// Errors raised while acquiring an interface counter snapshot
#[derive(Debug, Error)]
pub enum CollectorError {
    /// The system reported no network interfaces after a refresh
    #[error(
        "no network interfaces found - possible causes: system network subsystem issues, insufficient permissions, all interfaces down"
    )]
    NoInterfaces,
}
