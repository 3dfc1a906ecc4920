//! Quick slides: operator-authored text slides (announcements, prayers, countdowns)

use crate::types::Timestamp;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Layout preset of a quick slide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuickSlidePreset {
    /// Title and body
    Announcement,
    /// Title and body, typically a prayer or call to worship
    Prayer,
    /// Body only
    Message,
    /// Freely positioned text elements
    Custom,
    /// Large MM:SS countdown to an end time
    Countdown,
}

impl QuickSlidePreset {
    /// Whether the renderer shows the title for this preset
    pub fn shows_title(&self) -> bool {
        matches!(self, Self::Announcement | Self::Prayer)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlign {
    Top,
    Center,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextWidth {
    Wide,
    Medium,
    Narrow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextElementKind {
    Title,
    Body,
}

/// A positioned text block on a custom quick slide
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextElement {
    #[serde(rename = "type")]
    pub kind: TextElementKind,
    pub text: String,
    pub vertical_align: VerticalAlign,
    pub horizontal_align: HorizontalAlign,
    pub text_width: TextWidth,
    /// Offset from the aligned position, in percent of the output
    #[serde(default)]
    pub offset_x: f32,
    #[serde(default)]
    pub offset_y: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_color: Option<String>,
}

/// Font and color settings shared by quick slides
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Typography {
    pub font_family: String,
    pub title_font_size: u32,
    pub font_size: u32,
    pub font_color: String,
}

impl Default for Typography {
    fn default() -> Self {
        Self {
            font_family: "Georgia".to_string(),
            title_font_size: 60,
            font_size: 48,
            font_color: "#FFFFFF".to_string(),
        }
    }
}

/// A quick slide, publishable on its own or as a slideshow entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickSlide {
    pub id: String,
    pub preset: QuickSlidePreset,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elements: Option<Vec<TextElement>>,
    pub background: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image: Option<PathBuf>,
    /// Darkening applied over a background image, 0-100
    #[serde(default)]
    pub background_dim: u8,
    #[serde(flatten)]
    pub typography: Typography,
    pub vertical_align: VerticalAlign,
    pub horizontal_align: HorizontalAlign,
    pub text_width: TextWidth,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub countdown_label: Option<String>,
}

impl QuickSlide {
    /// Creates a slide with the given preset and default styling
    pub fn new(id: impl Into<String>, preset: QuickSlidePreset) -> Self {
        Self {
            id: id.into(),
            preset,
            title: String::new(),
            body: String::new(),
            elements: None,
            background: "#000000".to_string(),
            background_image: None,
            background_dim: 0,
            typography: Typography::default(),
            vertical_align: VerticalAlign::Center,
            horizontal_align: HorizontalAlign::Center,
            text_width: TextWidth::Wide,
            end_time: None,
            countdown_label: None,
        }
    }

    /// Creates an announcement-style slide with a title and body
    pub fn announcement(id: impl Into<String>, title: &str, body: &str) -> Self {
        let mut slide = Self::new(id, QuickSlidePreset::Announcement);
        slide.title = title.to_string();
        slide.body = body.to_string();
        slide
    }

    /// Creates a countdown slide ending at `end_time`
    pub fn countdown(id: impl Into<String>, end_time: Timestamp, label: Option<String>) -> Self {
        let mut slide = Self::new(id, QuickSlidePreset::Countdown);
        slide.end_time = Some(end_time);
        slide.countdown_label = label;
        slide
    }

    /// Body text split into its rendered structure
    pub fn body_layout(&self) -> BodyLayout {
        BodyLayout::parse(&self.body)
    }

    /// Remaining countdown time in milliseconds at `now`, clamped at zero
    ///
    /// Returns `None` for slides that are not countdowns.
    pub fn countdown_remaining(&self, now: Timestamp) -> Option<u64> {
        if self.preset != QuickSlidePreset::Countdown {
            return None;
        }
        Some(now.millis_until(self.end_time.unwrap_or(now)))
    }

    /// Countdown display text (`MM:SS`) at `now`
    pub fn countdown_text(&self, now: Timestamp) -> Option<String> {
        self.countdown_remaining(now).map(format_countdown)
    }
}

/// Formats milliseconds as zero-padded `MM:SS`
pub fn format_countdown(remaining_ms: u64) -> String {
    let total_secs = remaining_ms / 1000;
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}

/// Rendered structure of quick slide body text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyLayout {
    /// Every non-blank line began with a bullet marker
    Bullets(Vec<String>),
    /// Every non-blank line began with `N.`
    Numbered(Vec<String>),
    /// Anything else, kept line by line
    Text(Vec<String>),
}

impl BodyLayout {
    /// Detects bullet or numbered lists; mixed content stays plain text
    pub fn parse(text: &str) -> Self {
        let lines: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();

        if lines.is_empty() {
            return Self::Text(Vec::new());
        }

        let bullets: Option<Vec<String>> = lines.iter().map(|l| strip_bullet(l)).collect();
        if let Some(items) = bullets {
            return Self::Bullets(items);
        }

        let numbered: Option<Vec<String>> = lines.iter().map(|l| strip_number(l)).collect();
        if let Some(items) = numbered {
            return Self::Numbered(items);
        }

        Self::Text(text.lines().map(str::to_string).collect())
    }
}

fn strip_bullet(line: &str) -> Option<String> {
    let rest = line
        .strip_prefix('\u{2022}')
        .or_else(|| line.strip_prefix('-'))
        .or_else(|| line.strip_prefix('*'))?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    Some(rest.trim().to_string())
}

fn strip_number(line: &str) -> Option<String> {
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }
    let rest = line[digits..].strip_prefix('.')?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    Some(rest.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bullet_list() {
        let layout = BodyLayout::parse("- Coffee\n\n* Tea\n\u{2022} Juice");
        assert_eq!(
            layout,
            BodyLayout::Bullets(vec![
                "Coffee".to_string(),
                "Tea".to_string(),
                "Juice".to_string()
            ])
        );
    }

    #[test]
    fn test_numbered_list() {
        let layout = BodyLayout::parse("1. Welcome\n2. Worship\n10. Benediction");
        assert_eq!(
            layout,
            BodyLayout::Numbered(vec![
                "Welcome".to_string(),
                "Worship".to_string(),
                "Benediction".to_string()
            ])
        );
    }

    #[test]
    fn test_mixed_is_plain_text() {
        let layout = BodyLayout::parse("- one\ntwo");
        assert_eq!(
            layout,
            BodyLayout::Text(vec!["- one".to_string(), "two".to_string()])
        );
    }

    #[test]
    fn test_marker_needs_whitespace() {
        assert!(matches!(BodyLayout::parse("-5 degrees"), BodyLayout::Text(_)));
        assert!(matches!(BodyLayout::parse("3.14 pies"), BodyLayout::Text(_)));
    }

    #[test]
    fn test_countdown_remaining() {
        let slide = QuickSlide::countdown("c1", Timestamp::from_millis(125_000), None);
        let now = Timestamp::from_millis(0);
        assert_eq!(slide.countdown_remaining(now), Some(125_000));
        assert_eq!(slide.countdown_text(now).as_deref(), Some("02:05"));

        let later = Timestamp::from_millis(200_000);
        assert_eq!(slide.countdown_text(later).as_deref(), Some("00:00"));
    }

    #[test]
    fn test_non_countdown_has_no_remaining() {
        let slide = QuickSlide::announcement("a1", "Welcome", "Coffee after service");
        assert_eq!(slide.countdown_remaining(Timestamp::now()), None);
        assert!(slide.preset.shows_title());
    }
}
