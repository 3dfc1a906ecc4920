//! Output display configuration section

use crate::validation::{ConfigSection, ValidationError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// How media is scaled to the output
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ScalingMode {
    #[default]
    Fit,
    Fill,
    Stretch,
}

impl std::fmt::Display for ScalingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScalingMode::Fit => write!(f, "fit"),
            ScalingMode::Fill => write!(f, "fill"),
            ScalingMode::Stretch => write!(f, "stretch"),
        }
    }
}

/// Output display settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct DisplayConfig {
    /// Image shown while nothing is live; black when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub standby_image: Option<PathBuf>,

    pub scaling_mode: ScalingMode,
}

impl ConfigSection for DisplayConfig {
    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        match &self.standby_image {
            Some(path) if path.as_os_str().is_empty() => Err(vec![ValidationError::new(
                "display.standby_image",
                "must not be empty when set",
            )]),
            _ => Ok(()),
        }
    }

    fn merge(&mut self, other: Self) {
        self.standby_image = other.standby_image;
        self.scaling_mode = other.scaling_mode;
    }

    fn section_name(&self) -> &'static str {
        "display"
    }
}
