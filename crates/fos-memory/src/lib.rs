//! fOS Memory Report
//!
//! Reads the total amount of physical memory from the system memory
//! report (`/proc/meminfo` on Linux and Android), with a `sysinfo`
//! fallback on platforms that have no text report.
//!
//! Failures never escape [`read_physical_memory_kb`]: an unreadable or
//! malformed report collapses to [`MemoryReading::UNKNOWN`] (0 kB).

mod reading;
mod report;
mod source;

pub use reading::{MemoryReading, format_kb};
pub use report::{ReportError, MEMTOTAL_LABEL, MIN_PLAUSIBLE_TOTAL_KB, parse_total_memory_kb};
pub use source::{
    default_source, read_physical_memory_kb, FallbackSource, MemoryReportSource, ProcMeminfo,
    StaticReport, SysinfoTotal, DEFAULT_MEMINFO_PATH,
};
