//! Common types and utilities shared across content models

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Timestamp in milliseconds since Unix epoch
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Creates a timestamp for the current moment
    ///
    /// If system time is somehow before UNIX_EPOCH, falls back to timestamp 0
    /// instead of panicking.
    pub fn now() -> Self {
        Self(
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_else(|_| std::time::Duration::from_secs(0))
                .as_millis() as i64,
        )
    }

    /// Creates a timestamp from milliseconds since Unix epoch
    pub fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Returns the timestamp as milliseconds since Unix epoch
    pub fn as_millis(&self) -> i64 {
        self.0
    }

    /// Milliseconds from `self` until `later`, zero if `later` is not after `self`
    pub fn millis_until(&self, later: Timestamp) -> u64 {
        (later.0 - self.0).max(0) as u64
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of media a file path refers to, judged by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
    Audio,
}

impl MediaKind {
    const IMAGE_EXTENSIONS: &'static [&'static str] =
        &["jpg", "jpeg", "png", "gif", "webp", "bmp"];
    const VIDEO_EXTENSIONS: &'static [&'static str] = &["mp4", "webm", "mov", "avi", "mkv"];
    const AUDIO_EXTENSIONS: &'static [&'static str] =
        &["mp3", "wav", "ogg", "m4a", "flac", "aac"];

    /// Classifies a path by its extension, case-insensitively
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        if Self::IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            Some(Self::Image)
        } else if Self::VIDEO_EXTENSIONS.contains(&ext.as_str()) {
            Some(Self::Video)
        } else if Self::AUDIO_EXTENSIONS.contains(&ext.as_str()) {
            Some(Self::Audio)
        } else {
            None
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaKind::Image => write!(f, "image"),
            MediaKind::Video => write!(f, "video"),
            MediaKind::Audio => write!(f, "audio"),
        }
    }
}

/// Default display name for a media file: its file name without extension
pub fn display_name_for(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_timestamp_now() {
        let ts = Timestamp::now();
        assert!(ts.as_millis() > 0);
    }

    #[test]
    fn test_millis_until() {
        let a = Timestamp::from_millis(1_000);
        let b = Timestamp::from_millis(4_500);
        assert_eq!(a.millis_until(b), 3_500);
        assert_eq!(b.millis_until(a), 0);
    }

    #[test]
    fn test_media_kind_from_path() {
        assert_eq!(
            MediaKind::from_path(&PathBuf::from("/a/b/photo.JPG")),
            Some(MediaKind::Image)
        );
        assert_eq!(
            MediaKind::from_path(&PathBuf::from("clip.mp4")),
            Some(MediaKind::Video)
        );
        assert_eq!(
            MediaKind::from_path(&PathBuf::from("hymn.mp3")),
            Some(MediaKind::Audio)
        );
        assert_eq!(MediaKind::from_path(&PathBuf::from("notes.txt")), None);
        assert_eq!(MediaKind::from_path(&PathBuf::from("no_extension")), None);
    }

    #[test]
    fn test_display_name_for() {
        assert_eq!(display_name_for(Path::new("/media/Sunrise.jpg")), "Sunrise");
        assert_eq!(display_name_for(Path::new("walkup.final.mp4")), "walkup.final");
    }
}
