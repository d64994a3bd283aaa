//! Memory Report Parser
//!
//! Extracts the total-memory entry from a line-oriented memory report in
//! the `/proc/meminfo` format:
//!
//! ```text
//! MemTotal:        3951284 kB
//! MemFree:          215696 kB
//! MemAvailable:    1874528 kB
//! ```
//!
//! Only the `MemTotal` line is consulted. Label and unit are matched
//! case-insensitively and whitespace around the fields is ignored.

use std::io::{self, BufRead};
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

/// Label of the total-memory entry.
pub const MEMTOTAL_LABEL: &str = "MemTotal";

/// Values at or below this (in kB) are treated as a truncated or
/// malformed report.
pub const MIN_PLAUSIBLE_TOTAL_KB: u64 = 1024;

const UNIT_KB: &str = "kB";

/// Errors while reading a memory report
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Memory report {path} is unavailable: {source}")]
    Unavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("I/O error while reading memory report: {0}")]
    Io(#[from] io::Error),

    #[error("No total-memory entry in memory report")]
    MissingTotal,

    #[error("Implausible total memory size: {0} kB")]
    Implausible(u64),

    #[error("Platform memory query failed: {0}")]
    Platform(String),
}

impl ReportError {
    /// True for errors caused by the report content rather than access to it.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MissingTotal | Self::Implausible(_))
    }
}

/// Parse the total physical memory (kB) out of a memory report.
///
/// Scanning stops at the first well-formed `MemTotal` line. A `MemTotal`
/// line whose value cannot be parsed does not count as a match.
pub fn parse_total_memory_kb<R: BufRead>(reader: R) -> Result<u64, ReportError> {
    for line in reader.lines() {
        let line = line?;

        if let Some(kb) = match_total_line(&line) {
            debug!(total_kb = kb, "Found total-memory entry");
            return check_plausible(kb);
        }
    }

    Err(ReportError::MissingTotal)
}

/// Validate a total-memory value in kB.
pub(crate) fn check_plausible(kb: u64) -> Result<u64, ReportError> {
    if kb <= MIN_PLAUSIBLE_TOTAL_KB {
        return Err(ReportError::Implausible(kb));
    }
    Ok(kb)
}

/// Match `<label>:<ws><integer><ws>kB`, returning the integer.
fn match_total_line(line: &str) -> Option<u64> {
    let (label, rest) = line.trim().split_once(':')?;
    if !label.trim_end().eq_ignore_ascii_case(MEMTOTAL_LABEL) {
        return None;
    }

    let mut fields = rest.split_whitespace();
    let value = fields.next()?;
    if !value.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }
    let value = value.parse::<u64>().ok()?;
    let unit = fields.next()?;

    if !unit.eq_ignore_ascii_case(UNIT_KB) || fields.next().is_some() {
        return None;
    }

    Some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufReader, Cursor, Read};

    const SAMPLE: &str = "\
MemTotal:        3951284 kB
MemFree:          215696 kB
MemAvailable:    1874528 kB
Buffers:           81536 kB
";

    fn parse(text: &str) -> Result<u64, ReportError> {
        parse_total_memory_kb(Cursor::new(text))
    }

    #[test]
    fn test_parse_well_formed_report() {
        assert_eq!(parse(SAMPLE).unwrap(), 3_951_284);
    }

    #[test]
    fn test_total_line_not_first() {
        let report = "MemFree: 215696 kB\nMemTotal: 800000 kB\n";
        assert_eq!(parse(report).unwrap(), 800_000);
    }

    #[test]
    fn test_case_and_whitespace_tolerant() {
        assert_eq!(parse("  memtotal:\t 400000   KB  \n").unwrap(), 400_000);
        assert_eq!(parse("MEMTOTAL :400000 kb").unwrap(), 400_000);
    }

    #[test]
    fn test_first_match_wins() {
        let report = "MemTotal: 400000 kB\nMemTotal: 800000 kB\n";
        assert_eq!(parse(report).unwrap(), 400_000);
    }

    #[test]
    fn test_malformed_total_line_is_skipped() {
        let report = "MemTotal: lots kB\nMemTotal: 2048 MB\nMemTotal: 600000 kB\n";
        assert_eq!(parse(report).unwrap(), 600_000);
    }

    #[test]
    fn test_signed_value_is_not_an_integer_field() {
        assert!(matches!(
            parse("MemTotal: +400000 kB").unwrap_err(),
            ReportError::MissingTotal
        ));
        assert_eq!(parse("MemTotal: +400000 kB\nMemTotal: 600000 kB\n").unwrap(), 600_000);
    }

    #[test]
    fn test_missing_total() {
        let err = parse("MemFree: 215696 kB\n").unwrap_err();
        assert!(matches!(err, ReportError::MissingTotal));
        assert!(err.is_malformed());

        assert!(matches!(parse("").unwrap_err(), ReportError::MissingTotal));
    }

    #[test]
    fn test_implausible_values_rejected() {
        assert!(matches!(
            parse("MemTotal: 1024 kB").unwrap_err(),
            ReportError::Implausible(1024)
        ));
        assert!(matches!(
            parse("MemTotal: 0 kB").unwrap_err(),
            ReportError::Implausible(0)
        ));
        assert_eq!(parse("MemTotal: 1025 kB").unwrap(), 1025);
    }

    #[test]
    fn test_stops_scanning_after_match() {
        // A reader that fails after the first line: the parser must not touch it.
        struct FailAfter<'a> {
            data: Cursor<&'a [u8]>,
        }

        impl Read for FailAfter<'_> {
            fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
                let n = self.data.read(buf)?;
                if n == 0 {
                    return Err(io::Error::other("read past the total line"));
                }
                Ok(n)
            }
        }

        let reader = BufReader::new(FailAfter {
            data: Cursor::new(&b"MemTotal: 400000 kB\n"[..]),
        });
        assert_eq!(parse_total_memory_kb(reader).unwrap(), 400_000);
    }

    #[test]
    fn test_read_error_surfaces_as_io() {
        struct Broken;

        impl Read for Broken {
            fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
            }
        }

        let err = parse_total_memory_kb(BufReader::new(Broken)).unwrap_err();
        assert!(matches!(err, ReportError::Io(_)));
        assert!(!err.is_malformed());
    }
}
