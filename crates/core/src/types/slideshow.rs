//! Slideshow domain models: queue entries, settings and pending edits

use crate::types::{display_name_for, QuickSlide};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Identifier of a slideshow (shared with the preset it was loaded from)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlideshowId(String);

impl SlideshowId {
    /// Creates a new random id
    pub fn generate() -> Self {
        Self(format!("show_{}", Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SlideshowId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for SlideshowId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for SlideshowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Visual transition the output surface uses between slides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionStyle {
    #[default]
    Fade,
    Slide,
    None,
}

impl fmt::Display for TransitionStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransitionStyle::Fade => write!(f, "fade"),
            TransitionStyle::Slide => write!(f, "slide"),
            TransitionStyle::None => write!(f, "none"),
        }
    }
}

impl std::str::FromStr for TransitionStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fade" => Ok(Self::Fade),
            "slide" => Ok(Self::Slide),
            "none" => Ok(Self::None),
            other => Err(format!("unknown transition style '{}'", other)),
        }
    }
}

/// Key identifying a queue entry: its path, or the quick slide id
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryKey(String);

impl EntryKey {
    pub fn for_path(path: &Path) -> Self {
        Self(path.to_string_lossy().into_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EntryKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for EntryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One addressable unit inside a slideshow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum QueueEntry {
    Image {
        path: PathBuf,
        #[serde(rename = "displayName")]
        display_name: String,
    },
    Video {
        path: PathBuf,
        #[serde(rename = "displayName")]
        display_name: String,
    },
    QuickSlide(QuickSlide),
}

impl QueueEntry {
    pub fn image(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let display_name = display_name_for(&path);
        Self::Image { path, display_name }
    }

    pub fn video(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let display_name = display_name_for(&path);
        Self::Video { path, display_name }
    }

    /// Key this entry is deduplicated and removed by
    pub fn key(&self) -> EntryKey {
        match self {
            Self::Image { path, .. } | Self::Video { path, .. } => EntryKey::for_path(path),
            Self::QuickSlide(slide) => EntryKey(slide.id.clone()),
        }
    }

    /// File path backing this entry, if it has one
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Image { path, .. } | Self::Video { path, .. } => Some(path),
            Self::QuickSlide(_) => None,
        }
    }

    pub fn is_video(&self) -> bool {
        matches!(self, Self::Video { .. })
    }
}

/// Shortest time a slide may stay up
pub const MIN_INTERVAL_MS: u64 = 1000;
/// Longest time a slide may stay up
pub const MAX_INTERVAL_MS: u64 = 60_000;

/// Playback settings of a slideshow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlideshowSettings {
    pub interval_ms: u64,
    #[serde(rename = "loop")]
    pub looping: bool,
    pub transition: TransitionStyle,
}

impl Default for SlideshowSettings {
    fn default() -> Self {
        Self {
            interval_ms: 7000,
            looping: true,
            transition: TransitionStyle::Fade,
        }
    }
}

impl SlideshowSettings {
    pub fn interval_in_range(&self) -> bool {
        (MIN_INTERVAL_MS..=MAX_INTERVAL_MS).contains(&self.interval_ms)
    }
}

/// A timed queue of entries
///
/// `index` is always a valid position into `queue` (or 0 when empty).
/// `pending_adds` / `pending_removes` collect edits made while this show is
/// live; they are folded into `queue` by [`Slideshow::apply_pending`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slideshow {
    pub id: SlideshowId,
    pub queue: Vec<QueueEntry>,
    pub index: usize,
    pub interval_ms: u64,
    #[serde(rename = "loop")]
    pub looping: bool,
    pub transition: TransitionStyle,
    #[serde(default)]
    pub pending_adds: Vec<QueueEntry>,
    #[serde(default)]
    pub pending_removes: Vec<EntryKey>,
}

impl Slideshow {
    /// Creates a slideshow positioned at the first entry
    pub fn new(id: SlideshowId, queue: Vec<QueueEntry>, settings: SlideshowSettings) -> Self {
        Self {
            id,
            queue,
            index: 0,
            interval_ms: settings.interval_ms,
            looping: settings.looping,
            transition: settings.transition,
            pending_adds: Vec::new(),
            pending_removes: Vec::new(),
        }
    }

    pub fn settings(&self) -> SlideshowSettings {
        SlideshowSettings {
            interval_ms: self.interval_ms,
            looping: self.looping,
            transition: self.transition,
        }
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Entry at the cursor
    pub fn current_entry(&self) -> Option<&QueueEntry> {
        self.queue.get(self.index)
    }

    pub fn contains_key(&self, key: &EntryKey) -> bool {
        self.queue.iter().any(|e| &e.key() == key)
    }

    /// Number of entries once pending edits are applied
    pub fn effective_len(&self) -> usize {
        (self.queue.len() + self.pending_adds.len()).saturating_sub(self.pending_removes.len())
    }

    pub fn has_pending(&self) -> bool {
        !self.pending_adds.is_empty() || !self.pending_removes.is_empty()
    }

    /// Appends an entry unless one with the same key is queued
    pub fn push_entry(&mut self, entry: QueueEntry) -> bool {
        if self.contains_key(&entry.key()) {
            return false;
        }
        self.queue.push(entry);
        true
    }

    /// Defers an addition until the next publish or stop
    pub fn queue_pending_add(&mut self, entry: QueueEntry) -> bool {
        let key = entry.key();
        if self.contains_key(&key) || self.pending_adds.iter().any(|e| e.key() == key) {
            return false;
        }
        self.pending_adds.push(entry);
        true
    }

    /// Drops a deferred addition
    pub fn cancel_pending_add(&mut self, key: &EntryKey) -> bool {
        match self.pending_adds.iter().position(|e| &e.key() == key) {
            Some(idx) => {
                self.pending_adds.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Defers a removal until the next publish or stop
    pub fn queue_pending_remove(&mut self, key: EntryKey) -> bool {
        if !self.contains_key(&key) || self.pending_removes.contains(&key) {
            return false;
        }
        self.pending_removes.push(key);
        true
    }

    /// Removes an entry immediately, clamping the cursor
    pub fn remove_entry(&mut self, key: &EntryKey) -> Option<QueueEntry> {
        let idx = self.queue.iter().position(|e| &e.key() == key)?;
        let removed = self.queue.remove(idx);
        self.clamp_index();
        Some(removed)
    }

    /// Moves the entry at `from` to position `to`
    pub fn move_entry(&mut self, from: usize, to: usize) -> bool {
        if from >= self.queue.len() || to >= self.queue.len() || from == to {
            return false;
        }
        let entry = self.queue.remove(from);
        self.queue.insert(to, entry);
        true
    }

    /// Folds pending additions and removals into the queue, exactly once
    pub fn apply_pending(&mut self) {
        for entry in std::mem::take(&mut self.pending_adds) {
            self.push_entry(entry);
        }
        for key in std::mem::take(&mut self.pending_removes) {
            if let Some(idx) = self.queue.iter().position(|e| e.key() == key) {
                self.queue.remove(idx);
            }
        }
        self.clamp_index();
    }

    /// Points the cursor at `index` if it is in range
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.queue.len() {
            return false;
        }
        self.index = index;
        true
    }

    /// Moves the cursor by one with wraparound in both directions
    pub fn step(&mut self, forward: bool) {
        let len = self.queue.len();
        if len == 0 {
            self.index = 0;
            return;
        }
        self.index = if forward {
            (self.index + 1) % len
        } else {
            (self.index + len - 1) % len
        };
    }

    /// Deep copy suitable for the live register: pending edits are dropped
    pub fn live_snapshot(&self) -> Slideshow {
        Slideshow {
            pending_adds: Vec::new(),
            pending_removes: Vec::new(),
            ..self.clone()
        }
    }

    fn clamp_index(&mut self) {
        if self.index >= self.queue.len() {
            self.index = self.queue.len().saturating_sub(1);
        }
    }
}
