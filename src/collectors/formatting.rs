//! Formatting utilities for usage reports
//!
//! This module provides the byte formatting used by the CLI output. It keeps
//! unit handling in one place so reports stay consistent.

/// Formats byte values with appropriate units
///
/// Converts raw byte values into human-readable format with appropriate
/// unit prefixes (B, KB, MB, GB, TB).
///
/// # Examples
///
/// ```
/// use netusage::collectors::formatting::format_bytes;
///
/// assert_eq!(format_bytes(0.0), "0 B");
/// assert_eq!(format_bytes(512.0), "512 B");
/// assert_eq!(format_bytes(1024.0), "1.00 KB");
/// assert_eq!(format_bytes(1048576.0), "1.00 MB");
/// assert_eq!(format_bytes(1073741824.0), "1.00 GB");
/// assert_eq!(format_bytes(1099511627776.0), "1.00 TB");
/// ```
pub fn format_bytes(bytes: f64) -> String {
    if bytes < 1024.0 {
        format!("{:.0} B", bytes)
    } else if bytes < 1024.0 * 1024.0 {
        format!("{:.2} KB", bytes / 1024.0)
    } else if bytes < 1024.0 * 1024.0 * 1024.0 {
        format!("{:.2} MB", bytes / (1024.0 * 1024.0))
    } else if bytes < 1024.0 * 1024.0 * 1024.0 * 1024.0 {
        format!("{:.2} GB", bytes / (1024.0 * 1024.0 * 1024.0))
    } else {
        format!("{:.2} TB", bytes / (1024.0 * 1024.0 * 1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        // Test bytes formatting
        assert_eq!(format_bytes(0.0), "0 B");
        assert_eq!(format_bytes(512.0), "512 B");
        assert_eq!(format_bytes(1023.0), "1023 B");

        // Test kilobytes formatting
        assert_eq!(format_bytes(1024.0), "1.00 KB");
        assert_eq!(format_bytes(1536.0), "1.50 KB");

        // Test megabytes formatting
        assert_eq!(format_bytes(1048576.0), "1.00 MB");
        assert_eq!(format_bytes(1572864.0), "1.50 MB");

        // Test gigabytes and terabytes formatting
        assert_eq!(format_bytes(1073741824.0), "1.00 GB");
        assert_eq!(format_bytes(1099511627776.0), "1.00 TB");
    }

    #[test]
    fn test_format_bytes_precision() {
        assert_eq!(format_bytes(1024.123), "1.00 KB");
        assert_eq!(format_bytes(1024.999), "1.00 KB");
    }
}
