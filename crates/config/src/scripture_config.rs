//! Scripture lookup and rendering configuration section

use crate::validation::{ConfigSection, ValidationError, Validator};
use serde::{Deserialize, Serialize};
use stagecast_core::ScriptureStyle;
use std::path::PathBuf;

/// Translation selection and default styling for scripture
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScriptureConfig {
    /// Primary translation id (e.g. "eng_kjv")
    pub translation: String,

    /// Translation shown beside the primary one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compare_translation: Option<String>,

    pub background: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_image: Option<PathBuf>,

    pub font_family: String,

    /// Font size in points (16 - 200)
    pub font_size: u32,

    pub font_color: String,

    /// Base URL of the helloao-compatible API
    pub provider_url: String,
}

impl ScriptureConfig {
    pub fn style(&self) -> ScriptureStyle {
        ScriptureStyle {
            background: self.background.clone(),
            background_image: self.background_image.clone(),
            font_family: self.font_family.clone(),
            font_size: self.font_size,
            font_color: self.font_color.clone(),
        }
    }
}

impl Default for ScriptureConfig {
    fn default() -> Self {
        let style = ScriptureStyle::default();
        Self {
            translation: "eng_kjv".to_string(),
            compare_translation: None,
            background: style.background,
            background_image: style.background_image,
            font_family: style.font_family,
            font_size: style.font_size,
            font_color: style.font_color,
            provider_url: "https://bible.helloao.org/api".to_string(),
        }
    }
}

impl ConfigSection for ScriptureConfig {
    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut results = vec![
            Validator::not_empty(&self.translation, "scripture.translation"),
            Validator::hex_color(&self.background, "scripture.background"),
            Validator::hex_color(&self.font_color, "scripture.font_color"),
            Validator::not_empty(&self.font_family, "scripture.font_family"),
            Validator::in_range(self.font_size, 16, 200, "scripture.font_size"),
            Validator::http_url(&self.provider_url, "scripture.provider_url"),
        ];
        if let Some(compare) = &self.compare_translation {
            results.push(Validator::not_empty(compare, "scripture.compare_translation"));
        }
        Validator::collect_errors(results)
    }

    fn merge(&mut self, other: Self) {
        self.translation = other.translation;
        self.compare_translation = other.compare_translation;
        self.background = other.background;
        self.background_image = other.background_image;
        self.font_family = other.font_family;
        self.font_size = other.font_size;
        self.font_color = other.font_color;
        self.provider_url = other.provider_url;
    }

    fn section_name(&self) -> &'static str {
        "scripture"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(ScriptureConfig::default().validate().is_ok());
    }

    #[test]
    fn test_default_style_matches_core() {
        assert_eq!(ScriptureConfig::default().style(), ScriptureStyle::default());
    }

    #[test]
    fn test_multiple_validation_errors() {
        let config = ScriptureConfig {
            font_size: 8,
            font_color: "white".to_string(),
            provider_url: "bible.helloao.org".to_string(),
            ..Default::default()
        };
        let errors = config.validate().expect_err("invalid");
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_blank_compare_translation() {
        let config = ScriptureConfig {
            compare_translation: Some(" ".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
