//! Forced classification switches.

use serde::{Deserialize, Serialize};

/// Switch that forces the device to be treated as low-end.
pub const ENABLE_LOW_END_DEVICE_MODE: &str = "enable-low-end-device-mode";

/// Switch that forces the device to be treated as not low-end.
pub const DISABLE_LOW_END_DEVICE_MODE: &str = "disable-low-end-device-mode";

/// Explicit classification overrides set by the embedding application.
///
/// `force_low_end` takes precedence when both are set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Overrides {
    pub force_low_end: bool,
    pub force_not_low_end: bool,
}

impl Overrides {
    /// No overrides: classify by measurement.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn force_low_end() -> Self {
        Self {
            force_low_end: true,
            ..Self::default()
        }
    }

    pub fn force_not_low_end() -> Self {
        Self {
            force_not_low_end: true,
            ..Self::default()
        }
    }

    /// Collect overrides from a command-line style argument list.
    ///
    /// Switches may be given as `--name` or as the bare name. Unrelated
    /// arguments are ignored.
    pub fn from_switches<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut overrides = Self::default();
        for arg in args {
            let arg = arg.as_ref();
            match arg.strip_prefix("--").unwrap_or(arg) {
                ENABLE_LOW_END_DEVICE_MODE => overrides.force_low_end = true,
                DISABLE_LOW_END_DEVICE_MODE => overrides.force_not_low_end = true,
                _ => {}
            }
        }
        overrides
    }

    /// The forced result, if any.
    pub fn forced(&self) -> Option<bool> {
        if self.force_low_end {
            Some(true)
        } else if self.force_not_low_end {
            Some(false)
        } else {
            None
        }
    }

    /// Both switches set at once.
    pub fn is_conflicting(&self) -> bool {
        self.force_low_end && self.force_not_low_end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_switches() {
        let overrides = Overrides::from_switches(["fos-devtier", "--enable-low-end-device-mode", "--foo"]);
        assert_eq!(overrides, Overrides::force_low_end());

        let overrides = Overrides::from_switches(vec![String::from(DISABLE_LOW_END_DEVICE_MODE)]);
        assert_eq!(overrides, Overrides::force_not_low_end());

        let overrides = Overrides::from_switches(["-enable-low-end-device-mode"]);
        assert_eq!(overrides, Overrides::none());

        let overrides = Overrides::from_switches(Vec::<String>::new());
        assert_eq!(overrides, Overrides::none());
    }

    #[test]
    fn test_force_low_end_wins() {
        let overrides = Overrides::from_switches([
            DISABLE_LOW_END_DEVICE_MODE,
            ENABLE_LOW_END_DEVICE_MODE,
        ]);
        assert!(overrides.is_conflicting());
        assert_eq!(overrides.forced(), Some(true));
    }

    #[test]
    fn test_forced() {
        assert_eq!(Overrides::none().forced(), None);
        assert_eq!(Overrides::force_not_low_end().forced(), Some(false));
    }
}
