//! Device Tier Classifier
//!
//! Classifies the device as low-end or not, exactly once. The decision
//! runs inside a once-only initializer: concurrent first callers block
//! until it finishes and then all see the same [`Classification`].

use crate::config::ClassifierConfig;
use fos_memory::{read_physical_memory_kb, MemoryReading, MemoryReportSource};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{info, warn};

/// Devices with less total memory than this are low-end.
pub const LOW_END_MEMORY_THRESHOLD_MB: u64 = 512;

/// Which rule decided the classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationReason {
    /// Forced low-end by override
    ForcedLowEnd,
    /// Forced not low-end by override
    ForcedNotLowEnd,
    /// Legacy OS, never low-end
    LegacyOs,
    /// Memory report unreadable or untrusted
    MemoryUnknown,
    /// Total memory below the threshold
    BelowThreshold,
    /// Total memory at or above the threshold
    AtOrAboveThreshold,
}

impl ClassificationReason {
    pub fn description(&self) -> &'static str {
        match self {
            Self::ForcedLowEnd => "forced low-end",
            Self::ForcedNotLowEnd => "forced not low-end",
            Self::LegacyOs => "legacy OS version",
            Self::MemoryUnknown => "memory unknown",
            Self::BelowThreshold => "memory below threshold",
            Self::AtOrAboveThreshold => "memory at or above threshold",
        }
    }
}

impl fmt::Display for ClassificationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Outcome of the device tier decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub low_end: bool,
    pub reason: ClassificationReason,
    /// Total memory consulted; unknown when memory was never read.
    pub memory_kb: MemoryReading,
}

impl Classification {
    fn decided(low_end: bool, reason: ClassificationReason) -> Self {
        Self {
            low_end,
            reason,
            memory_kb: MemoryReading::UNKNOWN,
        }
    }
}

/// Run the decision procedure. Reads `source` at most once.
pub fn classify(config: &ClassifierConfig, source: &dyn MemoryReportSource) -> Classification {
    match config.overrides.forced() {
        Some(true) => return Classification::decided(true, ClassificationReason::ForcedLowEnd),
        Some(false) => return Classification::decided(false, ClassificationReason::ForcedNotLowEnd),
        None => {}
    }

    if config.os_version.is_some_and(|version| version.is_legacy()) {
        return Classification::decided(false, ClassificationReason::LegacyOs);
    }

    let memory = MemoryReading::from_kb(read_physical_memory_kb(source));
    if !memory.is_known() {
        return Classification::decided(false, ClassificationReason::MemoryUnknown);
    }

    let (low_end, reason) = if memory.megabytes() < LOW_END_MEMORY_THRESHOLD_MB {
        (true, ClassificationReason::BelowThreshold)
    } else {
        (false, ClassificationReason::AtOrAboveThreshold)
    };

    Classification {
        low_end,
        reason,
        memory_kb: memory,
    }
}

/// Memoizing device tier classifier
pub struct DeviceTierClassifier {
    config: ClassifierConfig,
    source: Box<dyn MemoryReportSource>,
    result: OnceCell<Classification>,
}

impl DeviceTierClassifier {
    /// Create a classifier reading the memory source selected by `config`.
    pub fn new(config: ClassifierConfig) -> Self {
        let source = config.memory_source();
        Self::with_boxed_source(config, source)
    }

    /// Create a classifier with an explicit memory source.
    pub fn with_source(config: ClassifierConfig, source: impl MemoryReportSource + 'static) -> Self {
        Self::with_boxed_source(config, Box::new(source))
    }

    fn with_boxed_source(config: ClassifierConfig, source: Box<dyn MemoryReportSource>) -> Self {
        if config.overrides.is_conflicting() {
            warn!("Both low-end device mode switches are set; forcing low-end");
        }

        Self {
            config,
            source,
            result: OnceCell::new(),
        }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Whether the device is low-end. Computed on first call, cached after.
    pub fn is_low_end_device(&self) -> bool {
        self.classification().low_end
    }

    /// Full classification record, computed on first call.
    pub fn classification(&self) -> &Classification {
        self.result.get_or_init(|| {
            let classification = classify(&self.config, self.source.as_ref());
            info!(
                low_end = classification.low_end,
                reason = %classification.reason,
                "Device classified (total memory {})",
                classification.memory_kb
            );
            classification
        })
    }

    /// Whether a classification has been computed.
    pub fn is_classification_initialized(&self) -> bool {
        self.result.get().is_some()
    }

    /// Read total physical memory now, bypassing the cached classification.
    /// Returns 0 when unknown.
    pub fn read_physical_memory_kb(&self) -> u64 {
        read_physical_memory_kb(self.source.as_ref())
    }
}

impl fmt::Debug for DeviceTierClassifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceTierClassifier")
            .field("config", &self.config)
            .field("source", &self.source.describe())
            .field("result", &self.result.get())
            .finish()
    }
}
