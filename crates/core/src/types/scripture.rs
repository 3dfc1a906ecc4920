//! Scripture passages as displayable content

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Rendering parameters a scripture is published with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptureStyle {
    pub background: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image: Option<PathBuf>,
    pub font_family: String,
    pub font_size: u32,
    pub font_color: String,
}

impl Default for ScriptureStyle {
    fn default() -> Self {
        Self {
            background: "#000000".to_string(),
            background_image: None,
            font_family: "Georgia".to_string(),
            font_size: 48,
            font_color: "#FFFFFF".to_string(),
        }
    }
}

/// One verse of scripture, optionally paired with a comparison translation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScripturePassage {
    /// Human readable reference, e.g. "John 3:16"
    pub reference: String,
    pub text: String,
    /// Display label of the translation, e.g. "KJV"
    pub version: String,
    /// Provider id of the translation
    pub bible_id: String,
    /// USFM book id, e.g. "JHN"
    pub book_id: String,
    pub chapter: u32,
    pub verse: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compare_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compare_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bible_id2: Option<String>,
    #[serde(flatten)]
    pub style: ScriptureStyle,
}

impl ScripturePassage {
    /// Whether this passage shows a second translation alongside the first
    pub fn is_comparison(&self) -> bool {
        self.compare_text.is_some()
    }

    /// Whether publishing `other` would change what the audience sees
    ///
    /// Two passages present identically when reference, translation,
    /// comparison text and every rendering parameter agree.
    pub fn presents_same_as(&self, other: &ScripturePassage) -> bool {
        self.reference == other.reference
            && self.bible_id == other.bible_id
            && self.compare_text == other.compare_text
            && self.style == other.style
    }
}
