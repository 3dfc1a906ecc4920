//! Preview/live sync configuration section

use crate::validation::{ConfigSection, ValidationError, Validator};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SyncConfig {
    /// Drift in seconds between preview and live media before the preview is
    /// snapped to the live position (0.0 - 5.0)
    pub snap_tolerance_secs: f64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            snap_tolerance_secs: 0.5,
        }
    }
}

impl ConfigSection for SyncConfig {
    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        Validator::collect_errors(vec![Validator::in_range(
            self.snap_tolerance_secs,
            0.0,
            5.0,
            "sync.snap_tolerance_secs",
        )])
    }

    fn merge(&mut self, other: Self) {
        self.snap_tolerance_secs = other.snap_tolerance_secs;
    }

    fn section_name(&self) -> &'static str {
        "sync"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tolerance_range() {
        assert!(SyncConfig::default().validate().is_ok());
        assert!(SyncConfig { snap_tolerance_secs: -0.1 }.validate().is_err());
        assert!(SyncConfig { snap_tolerance_secs: 5.0 }.validate().is_ok());
    }
}
