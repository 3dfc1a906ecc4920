//! Stagecast core: content model and the staged/live register

pub mod error;
pub mod register;
pub mod types;

// Re-export commonly used types
pub use error::{AppError, ErrorCategory, ErrorSeverity, RecoveryAction, Result};
pub use register::{Register, SyncEvent};
pub use types::{
    display_name_for, ContentItem, ContentKind, EntryKey, ImageItem, MediaClip, MediaKind,
    QueueEntry, QuickSlide, QuickSlidePreset, ScripturePassage, ScriptureStyle, Slideshow,
    SlideshowId, SlideshowSettings, Timestamp, TransitionStyle, MAX_INTERVAL_MS, MIN_INTERVAL_MS,
};
