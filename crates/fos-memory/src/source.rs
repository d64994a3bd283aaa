//! Memory report sources.
//!
//! A [`MemoryReportSource`] answers one question: how much physical
//! memory does this device have? Each call re-reads the source; callers
//! that need a stable answer cache it themselves.

use crate::reading::format_kb;
use crate::report::{check_plausible, parse_total_memory_kb, ReportError};
use std::fs::File;
use std::io::{BufReader, Cursor};
use std::path::{Path, PathBuf};
use sysinfo::System;
use tracing::{debug, warn};

/// Location of the memory report on Linux and Android.
pub const DEFAULT_MEMINFO_PATH: &str = "/proc/meminfo";

/// Something that can report total physical memory.
pub trait MemoryReportSource: Send + Sync {
    /// Total physical memory in kB.
    fn total_memory_kb(&self) -> Result<u64, ReportError>;

    /// Short description for logs.
    fn describe(&self) -> String;
}

/// A `/proc/meminfo`-format report on disk.
#[derive(Debug, Clone)]
pub struct ProcMeminfo {
    path: PathBuf,
}

impl ProcMeminfo {
    /// Read the report at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for ProcMeminfo {
    fn default() -> Self {
        Self::new(DEFAULT_MEMINFO_PATH)
    }
}

impl MemoryReportSource for ProcMeminfo {
    fn total_memory_kb(&self) -> Result<u64, ReportError> {
        // The handle lives only for this call and is closed on every return path.
        let file = File::open(&self.path).map_err(|source| ReportError::Unavailable {
            path: self.path.clone(),
            source,
        })?;

        parse_total_memory_kb(BufReader::new(file))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// A report already held in memory.
#[derive(Debug, Clone)]
pub struct StaticReport(String);

impl StaticReport {
    pub fn new(report: impl Into<String>) -> Self {
        Self(report.into())
    }
}

impl MemoryReportSource for StaticReport {
    fn total_memory_kb(&self) -> Result<u64, ReportError> {
        parse_total_memory_kb(Cursor::new(self.0.as_bytes()))
    }

    fn describe(&self) -> String {
        "in-memory report".to_string()
    }
}

/// Total memory as reported by `sysinfo`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SysinfoTotal;

impl MemoryReportSource for SysinfoTotal {
    fn total_memory_kb(&self) -> Result<u64, ReportError> {
        let mut system = System::new();
        system.refresh_memory();

        let bytes = system.total_memory();
        if bytes == 0 {
            return Err(ReportError::Platform(
                "sysinfo reported no physical memory".to_string(),
            ));
        }

        check_plausible(bytes / 1024)
    }

    fn describe(&self) -> String {
        "sysinfo".to_string()
    }
}

/// Try `primary`, then `fallback` if the primary fails.
pub struct FallbackSource {
    primary: Box<dyn MemoryReportSource>,
    fallback: Box<dyn MemoryReportSource>,
}

impl FallbackSource {
    pub fn new(
        primary: impl MemoryReportSource + 'static,
        fallback: impl MemoryReportSource + 'static,
    ) -> Self {
        Self {
            primary: Box::new(primary),
            fallback: Box::new(fallback),
        }
    }
}

impl MemoryReportSource for FallbackSource {
    fn total_memory_kb(&self) -> Result<u64, ReportError> {
        match self.primary.total_memory_kb() {
            Ok(kb) => Ok(kb),
            Err(e) => {
                debug!(
                    source = %self.primary.describe(),
                    error = %e,
                    "Primary memory source failed, trying {}",
                    self.fallback.describe()
                );
                self.fallback.total_memory_kb()
            }
        }
    }

    fn describe(&self) -> String {
        format!("{} (fallback: {})", self.primary.describe(), self.fallback.describe())
    }
}

/// The platform's default memory source.
pub fn default_source() -> Box<dyn MemoryReportSource> {
    if cfg!(any(target_os = "linux", target_os = "android")) {
        Box::new(ProcMeminfo::default())
    } else {
        Box::new(FallbackSource::new(ProcMeminfo::default(), SysinfoTotal))
    }
}

/// Read total physical memory in kB, or 0 if it cannot be determined.
///
/// Every failure is logged and absorbed; callers only see 0.
pub fn read_physical_memory_kb(source: &dyn MemoryReportSource) -> u64 {
    match source.total_memory_kb() {
        Ok(kb) => {
            debug!(source = %source.describe(), "Total physical memory: {}", format_kb(kb));
            kb
        }
        Err(e) if e.is_malformed() => {
            warn!(source = %source.describe(), "Malformed memory report: {}", e);
            0
        }
        Err(e) => {
            warn!(source = %source.describe(), "Memory report unreadable: {}", e);
            0
        }
    }
}
