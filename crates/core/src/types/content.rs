//! The displayable unit: one tagged variant per kind of content

use crate::types::{display_name_for, QueueEntry, QuickSlide, ScripturePassage, Slideshow};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// A still image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageItem {
    pub path: PathBuf,
    pub display_name: String,
}

impl ImageItem {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let display_name = display_name_for(&path);
        Self { path, display_name }
    }
}

/// A continuous media file (video or audio) with a playback position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaClip {
    pub path: PathBuf,
    pub display_name: String,
    /// Playback position in seconds
    #[serde(default)]
    pub current_time: f64,
    /// Length in seconds, 0 until known
    #[serde(default)]
    pub duration: f64,
}

impl MediaClip {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let display_name = display_name_for(&path);
        Self {
            path,
            display_name,
            current_time: 0.0,
            duration: 0.0,
        }
    }
}

/// Discriminant of [`ContentItem`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    Standby,
    SingleImage,
    SingleVideo,
    SingleAudio,
    Slideshow,
    Scripture,
    QuickSlide,
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ContentKind::Standby => "standby",
            ContentKind::SingleImage => "single-image",
            ContentKind::SingleVideo => "single-video",
            ContentKind::SingleAudio => "single-audio",
            ContentKind::Slideshow => "slideshow",
            ContentKind::Scripture => "scripture",
            ContentKind::QuickSlide => "quick-slide",
        };
        write!(f, "{}", name)
    }
}

/// Every displayable unit
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ContentItem {
    #[default]
    Standby,
    SingleImage(ImageItem),
    SingleVideo(MediaClip),
    SingleAudio(MediaClip),
    Slideshow(Slideshow),
    Scripture(ScripturePassage),
    QuickSlide(QuickSlide),
}

impl ContentItem {
    pub fn image(path: impl Into<PathBuf>) -> Self {
        Self::SingleImage(ImageItem::new(path))
    }

    pub fn video(path: impl Into<PathBuf>) -> Self {
        Self::SingleVideo(MediaClip::new(path))
    }

    pub fn audio(path: impl Into<PathBuf>) -> Self {
        Self::SingleAudio(MediaClip::new(path))
    }

    pub fn kind(&self) -> ContentKind {
        match self {
            Self::Standby => ContentKind::Standby,
            Self::SingleImage(_) => ContentKind::SingleImage,
            Self::SingleVideo(_) => ContentKind::SingleVideo,
            Self::SingleAudio(_) => ContentKind::SingleAudio,
            Self::Slideshow(_) => ContentKind::Slideshow,
            Self::Scripture(_) => ContentKind::Scripture,
            Self::QuickSlide(_) => ContentKind::QuickSlide,
        }
    }

    pub fn is_standby(&self) -> bool {
        matches!(self, Self::Standby)
    }

    /// Image currently shown by this item: a single image or the current
    /// slideshow entry when that entry is an image
    pub fn image_path(&self) -> Option<&Path> {
        match self {
            Self::SingleImage(img) => Some(&img.path),
            Self::Slideshow(show) => match show.current_entry()? {
                QueueEntry::Image { path, .. } => Some(path),
                _ => None,
            },
            _ => None,
        }
    }

    /// Video currently shown by this item: a single video or the current
    /// slideshow entry when that entry is a video
    pub fn video_path(&self) -> Option<&Path> {
        match self {
            Self::SingleVideo(clip) => Some(&clip.path),
            Self::Slideshow(show) => match show.current_entry()? {
                QueueEntry::Video { path, .. } => Some(path),
                _ => None,
            },
            _ => None,
        }
    }

    /// Audio file played by this item
    pub fn audio_path(&self) -> Option<&Path> {
        match self {
            Self::SingleAudio(clip) => Some(&clip.path),
            _ => None,
        }
    }

    /// Name shown under the preview/live monitors
    pub fn display_name(&self) -> String {
        match self {
            Self::Standby => String::new(),
            Self::SingleImage(img) => img.display_name.clone(),
            Self::SingleVideo(clip) | Self::SingleAudio(clip) => clip.display_name.clone(),
            Self::Slideshow(_) => "Slideshow".to_string(),
            Self::Scripture(p) => format!("{} ({})", p.reference, p.version),
            Self::QuickSlide(slide) => {
                if slide.title.is_empty() {
                    slide.id.clone()
                } else {
                    slide.title.clone()
                }
            }
        }
    }

    pub fn as_slideshow(&self) -> Option<&Slideshow> {
        match self {
            Self::Slideshow(show) => Some(show),
            _ => None,
        }
    }

    pub fn as_slideshow_mut(&mut self) -> Option<&mut Slideshow> {
        match self {
            Self::Slideshow(show) => Some(show),
            _ => None,
        }
    }

    /// The continuous clip (video or audio) this item plays, if any
    pub fn as_clip_mut(&mut self) -> Option<&mut MediaClip> {
        match self {
            Self::SingleVideo(clip) | Self::SingleAudio(clip) => Some(clip),
            _ => None,
        }
    }

    pub fn as_clip(&self) -> Option<&MediaClip> {
        match self {
            Self::SingleVideo(clip) | Self::SingleAudio(clip) => Some(clip),
            _ => None,
        }
    }

    pub fn as_scripture(&self) -> Option<&ScripturePassage> {
        match self {
            Self::Scripture(p) => Some(p),
            _ => None,
        }
    }
}
