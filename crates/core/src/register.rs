//! The staged/live register
//!
//! Holds exactly one staged slot (possibly empty), one live slot (never
//! empty, [`ContentItem::Standby`] when idle) and the sync flag. Every change
//! to the sync flag goes through [`Register::record`], so the rules for when
//! staged and live stop being "the same thing" live in one place.

use crate::types::ContentItem;

/// Something that happened to the register that may affect sync
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncEvent {
    /// Operator replaced or edited the staged item
    StagedEdited,
    /// Staged slot was emptied
    StagedCleared,
    /// Operator drove the preview transport directly (play/pause/seek)
    PreviewTransport,
    /// Staged content was promoted to live
    Published {
        /// Continuous content (media, slideshows, text) stays synced;
        /// plain images do not need ongoing sync
        continuous: bool,
    },
    /// An operator action on the live side was mirrored into the preview
    LiveMirrored,
    /// Live content returned to standby
    LiveEnded,
    /// Live and staged drifted apart through natural progression
    Diverged,
}

/// Register of staged and live content
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Register {
    staged: Option<ContentItem>,
    live: ContentItem,
    is_synced: bool,
}

impl Register {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn staged(&self) -> Option<&ContentItem> {
        self.staged.as_ref()
    }

    /// Mutable access to the staged item
    ///
    /// Does not touch the sync flag. Operator edits must follow up with
    /// [`SyncEvent::StagedEdited`]; mirroring live progress does not.
    pub fn staged_mut(&mut self) -> Option<&mut ContentItem> {
        self.staged.as_mut()
    }

    pub fn live(&self) -> &ContentItem {
        &self.live
    }

    /// Mutable access to the live item, for position updates and slideshow
    /// cursor moves that keep the same logical content live
    pub fn live_mut(&mut self) -> &mut ContentItem {
        &mut self.live
    }

    pub fn is_synced(&self) -> bool {
        self.is_synced
    }

    /// Applies a sync-affecting event; the single place `is_synced` changes
    pub fn record(&mut self, event: SyncEvent) {
        self.is_synced = match event {
            SyncEvent::StagedEdited
            | SyncEvent::StagedCleared
            | SyncEvent::PreviewTransport
            | SyncEvent::LiveEnded
            | SyncEvent::Diverged => false,
            SyncEvent::Published { continuous } => continuous,
            SyncEvent::LiveMirrored => self.is_synced,
        };
    }

    /// Replaces the staged item unconditionally
    pub fn stage(&mut self, item: ContentItem) {
        self.staged = Some(item);
        self.record(SyncEvent::StagedEdited);
    }

    /// Edits the staged item in place, breaking sync
    ///
    /// Returns `None` without recording anything when nothing is staged.
    pub fn edit_staged<R>(&mut self, edit: impl FnOnce(&mut ContentItem) -> R) -> Option<R> {
        let result = edit(self.staged.as_mut()?);
        self.record(SyncEvent::StagedEdited);
        Some(result)
    }

    /// Empties the staged slot
    pub fn clear_staged(&mut self) -> Option<ContentItem> {
        let previous = self.staged.take();
        self.record(SyncEvent::StagedCleared);
        previous
    }

    /// Makes `item` the live content
    pub fn publish(&mut self, item: ContentItem, continuous: bool) {
        self.live = item;
        self.record(SyncEvent::Published { continuous });
    }

    /// Returns live to standby
    ///
    /// When `clear_synced_staged` is set and the register was synced, the
    /// staged item is cleared too, leaving the operator a neutral staging
    /// area after a show ends.
    pub fn end_live(&mut self, clear_synced_staged: bool) {
        if clear_synced_staged && self.is_synced {
            self.staged = None;
        }
        self.live = ContentItem::Standby;
        self.record(SyncEvent::LiveEnded);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_register_is_idle() {
        let reg = Register::new();
        assert!(reg.staged().is_none());
        assert!(reg.live().is_standby());
        assert!(!reg.is_synced());
    }

    #[test]
    fn test_publish_continuous_syncs() {
        let mut reg = Register::new();
        reg.stage(ContentItem::video("/m/b.mp4"));
        reg.publish(ContentItem::video("/m/b.mp4"), true);
        assert!(reg.is_synced());

        reg.record(SyncEvent::LiveMirrored);
        assert!(reg.is_synced());

        reg.record(SyncEvent::PreviewTransport);
        assert!(!reg.is_synced());
    }

    #[test]
    fn test_publish_image_does_not_sync() {
        let mut reg = Register::new();
        reg.publish(ContentItem::image("/m/a.jpg"), false);
        assert!(!reg.is_synced());
    }

    #[test]
    fn test_stage_breaks_sync() {
        let mut reg = Register::new();
        reg.publish(ContentItem::video("/m/b.mp4"), true);
        reg.stage(ContentItem::image("/m/a.jpg"));
        assert!(!reg.is_synced());
    }

    #[test]
    fn test_edit_staged_requires_staged_item() {
        let mut reg = Register::new();
        reg.publish(ContentItem::video("/m/b.mp4"), true);
        assert!(reg.edit_staged(|_| ()).is_none());
        assert!(reg.is_synced());
    }

    #[test]
    fn test_end_live_clears_synced_staged() {
        let mut reg = Register::new();
        reg.stage(ContentItem::video("/m/b.mp4"));
        reg.publish(ContentItem::video("/m/b.mp4"), true);
        reg.end_live(true);
        assert!(reg.staged().is_none());
        assert!(reg.live().is_standby());
        assert!(!reg.is_synced());
    }

    #[test]
    fn test_end_live_keeps_unsynced_staged() {
        let mut reg = Register::new();
        reg.publish(ContentItem::video("/m/b.mp4"), true);
        reg.stage(ContentItem::image("/m/a.jpg"));
        reg.end_live(true);
        assert!(reg.staged().is_some());
    }
}
