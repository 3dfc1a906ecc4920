//! Content model for Stagecast
//!
//! This module contains the displayable content types organized by responsibility:
//! - `content`: the `ContentItem` tagged union and single-media payloads
//! - `slideshow`: queue entries, slideshow settings and pending edits
//! - `scripture`: scripture passages and their rendering style
//! - `quick_slide`: operator-authored text slides
//! - `common`: timestamps, media kinds and small helpers

mod common;
mod content;
mod quick_slide;
mod scripture;
mod slideshow;

pub use common::{display_name_for, MediaKind, Timestamp};
pub use content::{ContentItem, ContentKind, ImageItem, MediaClip};
pub use quick_slide::{
    format_countdown, BodyLayout, HorizontalAlign, QuickSlide, QuickSlidePreset, TextElement,
    TextElementKind, TextWidth, Typography, VerticalAlign,
};
pub use scripture::{ScripturePassage, ScriptureStyle};
pub use slideshow::{
    EntryKey, QueueEntry, Slideshow, SlideshowId, SlideshowSettings, TransitionStyle,
    MAX_INTERVAL_MS, MIN_INTERVAL_MS,
};
