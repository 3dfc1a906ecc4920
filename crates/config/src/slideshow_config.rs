//! Slideshow defaults configuration section

use crate::validation::{ConfigSection, ValidationError, Validator};
use serde::{Deserialize, Serialize};
use stagecast_core::{SlideshowSettings, TransitionStyle, MAX_INTERVAL_MS, MIN_INTERVAL_MS};

/// Defaults applied to newly created slideshows
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SlideshowConfig {
    /// Time each image or quick slide stays up (1000 - 60000)
    pub default_interval_ms: u64,

    /// Start over after the last entry
    pub default_loop: bool,

    pub default_transition: TransitionStyle,
}

impl SlideshowConfig {
    pub fn settings(&self) -> SlideshowSettings {
        SlideshowSettings {
            interval_ms: self.default_interval_ms,
            looping: self.default_loop,
            transition: self.default_transition,
        }
    }
}

impl Default for SlideshowConfig {
    fn default() -> Self {
        Self {
            default_interval_ms: 7000,
            default_loop: true,
            default_transition: TransitionStyle::Fade,
        }
    }
}

impl ConfigSection for SlideshowConfig {
    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        Validator::collect_errors(vec![Validator::in_range(
            self.default_interval_ms,
            MIN_INTERVAL_MS,
            MAX_INTERVAL_MS,
            "slideshow.default_interval_ms",
        )])
    }

    fn merge(&mut self, other: Self) {
        self.default_interval_ms = other.default_interval_ms;
        self.default_loop = other.default_loop;
        self.default_transition = other.default_transition;
    }

    fn section_name(&self) -> &'static str {
        "slideshow"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(SlideshowConfig::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_interval() {
        let mut config = SlideshowConfig::default();
        config.default_interval_ms = 500;
        assert!(config.validate().is_err());

        config.default_interval_ms = 61_000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_settings() {
        let config = SlideshowConfig {
            default_interval_ms: 3000,
            default_loop: false,
            default_transition: TransitionStyle::Slide,
        };
        let settings = config.settings();
        assert_eq!(settings.interval_ms, 3000);
        assert!(!settings.looping);
        assert_eq!(settings.transition, TransitionStyle::Slide);
    }
}
