//! OS version signal supplied by the embedding platform.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Highest API level treated as a legacy OS.
pub const LEGACY_OS_THRESHOLD: OsVersion = OsVersion(18);

/// Platform API level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OsVersion(pub u32);

impl OsVersion {
    /// Memory introspection on legacy versions is unreliable, so they
    /// are never classified by memory.
    pub fn is_legacy(&self) -> bool {
        *self <= LEGACY_OS_THRESHOLD
    }
}

impl fmt::Display for OsVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "API {}", self.0)
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid OS API level: {0:?}")]
pub struct OsVersionParseError(String);

impl FromStr for OsVersion {
    type Err = OsVersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u32>()
            .map(Self)
            .map_err(|_| OsVersionParseError(s.to_string()))
    }
}
