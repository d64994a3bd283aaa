//! Process-wide classifier.
//!
//! The embedding application may [`install`] a configured classifier
//! before the first classification. Otherwise the first classification
//! creates one from [`ClassifierConfig::default`]. Memory reads and the
//! initialization check never create it.

use crate::classifier::{Classification, DeviceTierClassifier};
use crate::config::ClassifierConfig;
use once_cell::sync::OnceCell;
use thiserror::Error;
use tracing::debug;

static CLASSIFIER: OnceCell<DeviceTierClassifier> = OnceCell::new();

/// Returned when a process-wide classifier already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Process-wide device classifier is already installed")]
pub struct AlreadyInstalled;

/// Install the process-wide classifier. The first installation wins.
pub fn install(config: ClassifierConfig) -> Result<(), AlreadyInstalled> {
    CLASSIFIER
        .set(DeviceTierClassifier::new(config))
        .map_err(|_| AlreadyInstalled)?;
    debug!("Installed process-wide device classifier");
    Ok(())
}

fn classifier() -> &'static DeviceTierClassifier {
    CLASSIFIER.get_or_init(|| DeviceTierClassifier::new(ClassifierConfig::default()))
}

/// Whether this device is low-end. Computed once per process.
pub fn is_low_end_device() -> bool {
    classifier().is_low_end_device()
}

/// The process-wide classification record.
pub fn classification() -> &'static Classification {
    classifier().classification()
}

/// Whether the process-wide classification has been computed.
pub fn is_classification_initialized() -> bool {
    CLASSIFIER
        .get()
        .is_some_and(DeviceTierClassifier::is_classification_initialized)
}

/// Total physical memory in kB from the process-wide memory source, or 0.
///
/// Uses the installed classifier's source if there is one, otherwise the
/// default source, without installing anything.
pub fn read_physical_memory_kb() -> u64 {
    match CLASSIFIER.get() {
        Some(classifier) => classifier.read_physical_memory_kb(),
        None => {
            let source = ClassifierConfig::default().memory_source();
            fos_memory::read_physical_memory_kb(source.as_ref())
        }
    }
}
