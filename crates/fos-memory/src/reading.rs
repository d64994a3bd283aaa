//! Total physical memory readings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Total physical memory in kilobytes, or unknown (0).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemoryReading(u64);

impl MemoryReading {
    /// The reading used when the report could not be read or trusted.
    pub const UNKNOWN: Self = Self(0);

    /// Wrap a raw kilobyte value. 0 means unknown.
    pub fn from_kb(kb: u64) -> Self {
        Self(kb)
    }

    /// Raw kilobytes (0 when unknown).
    pub fn kilobytes(&self) -> u64 {
        self.0
    }

    /// Whole megabytes, rounded down.
    pub fn megabytes(&self) -> u64 {
        self.0 / 1024
    }

    /// Whether the reading came from a usable report.
    pub fn is_known(&self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for MemoryReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_known() {
            f.write_str(&format_kb(self.0))
        } else {
            f.write_str("unknown")
        }
    }
}

/// Format a kilobyte count for display.
pub fn format_kb(kb: u64) -> String {
    const MB: u64 = 1024;
    const GB: u64 = MB * 1024;

    if kb >= GB {
        format!("{:.2} GB", kb as f64 / GB as f64)
    } else if kb >= MB {
        format!("{:.2} MB", kb as f64 / MB as f64)
    } else {
        format!("{} kB", kb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_reading() {
        let reading = MemoryReading::UNKNOWN;
        assert!(!reading.is_known());
        assert_eq!(reading.megabytes(), 0);
        assert_eq!(reading.to_string(), "unknown");
    }

    #[test]
    fn test_megabytes_round_down() {
        // 400000 kB is ~390.6 MB
        assert_eq!(MemoryReading::from_kb(400_000).megabytes(), 390);
        assert_eq!(MemoryReading::from_kb(800_000).megabytes(), 781);
        assert_eq!(MemoryReading::from_kb(524_287).megabytes(), 511);
        assert_eq!(MemoryReading::from_kb(524_288).megabytes(), 512);
    }

    #[test]
    fn test_format_kb() {
        assert_eq!(format_kb(500), "500 kB");
        assert_eq!(format_kb(1024), "1.00 MB");
        assert_eq!(format_kb(800_000), "781.25 MB");
        assert_eq!(format_kb(2 * 1024 * 1024), "2.00 GB");
    }
}
