//! fOS Device Tier
//!
//! Decides once per process whether the device is "low-end"
//! (memory-constrained) so memory-hungry features can be gated.
//!
//! # Decision order
//!
//! 1. `--enable-low-end-device-mode` forces low-end.
//! 2. `--disable-low-end-device-mode` forces not low-end.
//! 3. Legacy OS versions (API level 18 and below) are never low-end.
//! 4. Otherwise the device is low-end iff total memory is known and
//!    below 512 MB.
//!
//! The result is memoized permanently; later queries never re-read the
//! memory report.

mod classifier;
mod config;
mod global;
mod os;
mod overrides;

pub use classifier::{
    classify, Classification, ClassificationReason, DeviceTierClassifier,
    LOW_END_MEMORY_THRESHOLD_MB,
};
pub use config::{ClassifierConfig, ConfigError};
pub use global::{
    classification, install, is_classification_initialized, is_low_end_device,
    read_physical_memory_kb, AlreadyInstalled,
};
pub use os::{OsVersion, OsVersionParseError, LEGACY_OS_THRESHOLD};
pub use overrides::{Overrides, DISABLE_LOW_END_DEVICE_MODE, ENABLE_LOW_END_DEVICE_MODE};
