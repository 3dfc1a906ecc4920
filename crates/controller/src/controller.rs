//! The controller: owns the staged/live register and routes every operator
//! action, timer tick and output-surface notification through it.
//!
//! Operations return the effects to perform. An operation that returns an
//! error has left the register exactly as it was.

use crate::assets::BrokenAssets;
use crate::effects::{Effect, ScripturePayload, TimerToken, TransportCommand};
use crate::error::{ControlError, ControlResult};
use crate::golive::{can_go_live, is_continuous};
use crate::slideshow::{PlayerEvent, PlayerState, SlideshowPlayer};
use crate::transport::{MediaChannel, PlaybackCondition, SyncBridge, TransportReport};
use stagecast_core::{
    ContentItem, ContentKind, EntryKey, QueueEntry, Register, ScripturePassage, ScriptureStyle,
    Slideshow, SlideshowId, SlideshowSettings, SyncEvent, TransitionStyle, MAX_INTERVAL_MS,
    MIN_INTERVAL_MS,
};
use stagecast_scripture::{Direction, NavOutcome, Reference, ScriptureNavigator, ScriptureProvider};
use std::path::{Path, PathBuf};

/// Operator defaults the controller works with
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerSettings {
    /// Image shown on standby; `None` shows a black screen
    pub standby_image: Option<PathBuf>,
    /// Settings for newly created slideshows
    pub slideshow: SlideshowSettings,
    pub translation: String,
    pub compare_translation: Option<String>,
    pub scripture_style: ScriptureStyle,
    /// Drift between preview and live tolerated before the preview is snapped
    pub snap_tolerance_secs: f64,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            standby_image: None,
            slideshow: SlideshowSettings::default(),
            translation: "eng_kjv".to_string(),
            compare_translation: None,
            scripture_style: ScriptureStyle::default(),
            snap_tolerance_secs: 0.5,
        }
    }
}

/// Result of a scripture navigation step
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptureStep {
    Moved(Vec<Effect>),
    /// Nothing before Genesis 1:1
    Beginning,
    /// Nothing after the last verse of Revelation
    End,
}

/// Presentation controller
pub struct Controller<P: ScriptureProvider> {
    register: Register,
    player: SlideshowPlayer,
    bridge: SyncBridge,
    broken: BrokenAssets,
    navigator: ScriptureNavigator<P>,
    settings: ControllerSettings,
}

impl<P: ScriptureProvider> Controller<P> {
    pub fn new(provider: P, settings: ControllerSettings) -> Self {
        Self {
            register: Register::new(),
            player: SlideshowPlayer::new(),
            bridge: SyncBridge::new(settings.snap_tolerance_secs),
            broken: BrokenAssets::new(),
            navigator: ScriptureNavigator::new(provider),
            settings,
        }
    }

    // ===== Accessors =====

    pub fn register(&self) -> &Register {
        &self.register
    }

    pub fn staged(&self) -> Option<&ContentItem> {
        self.register.staged()
    }

    pub fn live(&self) -> &ContentItem {
        self.register.live()
    }

    pub fn is_synced(&self) -> bool {
        self.register.is_synced()
    }

    pub fn player_state(&self) -> PlayerState {
        self.player.state()
    }

    pub fn bridge(&self) -> &SyncBridge {
        &self.bridge
    }

    pub fn settings(&self) -> &ControllerSettings {
        &self.settings
    }

    pub fn navigator(&self) -> &ScriptureNavigator<P> {
        &self.navigator
    }

    pub fn is_broken(&self, path: &Path) -> bool {
        self.broken.is_broken(path)
    }

    pub fn broken_assets(&self) -> &BrokenAssets {
        &self.broken
    }

    /// Whether the go-live action is currently enabled
    pub fn can_go_live(&self) -> bool {
        can_go_live(self.register.staged(), self.register.live(), self.register.is_synced())
    }

    // ===== Register =====

    /// Replaces the staged item
    ///
    /// A single image, video or audio file already known to be missing is
    /// refused.
    pub fn stage(&mut self, mut item: ContentItem) -> ControlResult<Vec<Effect>> {
        if let Some(path) = single_media_path(&item) {
            if self.broken.is_broken(path) {
                return Err(ControlError::MissingAsset(path.to_path_buf()));
            }
        }

        if let ContentItem::Slideshow(show) = &item {
            check_interval("stage", &show.settings())?;
        }

        let live_show = self.live_is_slideshow();
        let mut effects = Vec::new();
        if let ContentItem::Slideshow(show) = &mut item {
            if !live_show {
                // Pending edits only exist opposite a live slideshow
                show.apply_pending();
                effects.push(Effect::SetTransitionStyle {
                    style: show.transition,
                });
            }
        }

        match item.as_clip() {
            Some(clip) => self.bridge.reset_preview(clip.current_time, clip.duration),
            None => self.bridge.reset_preview(0.0, 0.0),
        }
        log::debug!("Staged {} '{}'", item.kind(), item.display_name());
        self.register.stage(item);
        Ok(effects)
    }

    pub fn clear_staged(&mut self) -> ControlResult<Vec<Effect>> {
        self.register.clear_staged();
        self.bridge.reset_preview(0.0, 0.0);
        Ok(Vec::new())
    }

    /// Publishes the staged item, or returns to standby when nothing is staged
    pub fn go_live(&mut self) -> ControlResult<Vec<Effect>> {
        if !self.can_go_live() {
            return Err(ControlError::rejected("go live", "staged content is already live"));
        }

        let staged = match self.register.staged() {
            None | Some(ContentItem::Standby) => return self.standby(),
            Some(item) => item.clone(),
        };
        if let Some(path) = single_media_path(&staged) {
            if self.broken.is_broken(path) {
                return Err(ControlError::MissingAsset(path.to_path_buf()));
            }
        }
        if let ContentItem::Slideshow(show) = &staged {
            if show.effective_len() == 0 {
                return Err(ControlError::rejected("go live", "slideshow is empty"));
            }
            check_interval("go live", &show.settings())?;
        }

        let republish_paused = self.live_is_slideshow() && self.player.state().is_paused();
        let mut effects = self.stop_live_playback();
        let continuous = is_continuous(&staged);

        let publish = match &staged {
            ContentItem::Standby => self.standby_effect(),
            ContentItem::SingleImage(image) => Effect::PublishImage {
                path: image.path.clone(),
            },
            ContentItem::SingleVideo(clip) => Effect::PublishVideo {
                path: clip.path.clone(),
                start_time: clip.current_time,
                autoplay: true,
            },
            ContentItem::SingleAudio(clip) => Effect::PublishAudio {
                path: clip.path.clone(),
                start_time: clip.current_time,
            },
            ContentItem::Scripture(passage) => Effect::PublishScripture(ScripturePayload {
                passage: passage.clone(),
                direction: 0,
            }),
            ContentItem::QuickSlide(slide) => Effect::PublishQuickSlide(slide.clone()),
            ContentItem::Slideshow(_) => {
                effects.extend(self.publish_slideshow(republish_paused));
                return Ok(self.announce_live(effects));
            }
        };
        effects.push(publish);
        self.register.publish(staged, continuous);
        Ok(self.announce_live(effects))
    }

    fn announce_live(&self, effects: Vec<Effect>) -> Vec<Effect> {
        log::info!(
            "Live: {} '{}' (synced: {})",
            self.register.live().kind(),
            self.register.live().display_name(),
            self.register.is_synced()
        );
        effects
    }

    /// Stops whatever is playing and publishes standby
    pub fn standby(&mut self) -> ControlResult<Vec<Effect>> {
        let mut effects = self.stop_live_playback();
        effects.push(self.standby_effect());
        self.register.end_live(false);
        self.settle_pending_edits();
        log::info!("Live: standby");
        Ok(effects)
    }

    // ===== Live slideshow =====

    pub fn timer_tick(&mut self, token: TimerToken) -> ControlResult<Vec<Effect>> {
        if !self.live_is_slideshow() {
            log::debug!("Ignoring tick {} with no live slideshow", token);
            return Ok(Vec::new());
        }
        Ok(self.drive_player(PlayerEvent::Tick(token)))
    }

    pub fn slideshow_next(&mut self) -> ControlResult<Vec<Effect>> {
        self.require_live_slideshow()?;
        Ok(self.drive_player(PlayerEvent::Next))
    }

    pub fn slideshow_prev(&mut self) -> ControlResult<Vec<Effect>> {
        self.require_live_slideshow()?;
        Ok(self.drive_player(PlayerEvent::Prev))
    }

    pub fn pause_slideshow(&mut self) -> ControlResult<Vec<Effect>> {
        self.require_live_slideshow()?;
        Ok(self.drive_player(PlayerEvent::Pause))
    }

    pub fn resume_slideshow(&mut self) -> ControlResult<Vec<Effect>> {
        self.require_live_slideshow()?;
        Ok(self.drive_player(PlayerEvent::Resume))
    }

    /// Stops the live slideshow; a synced staged copy is cleared with it
    pub fn stop_slideshow(&mut self) -> ControlResult<Vec<Effect>> {
        self.require_live_slideshow()?;
        let mut effects = self.stop_live_playback();
        effects.push(self.standby_effect());
        self.register.end_live(true);
        self.settle_pending_edits();
        log::info!("Slideshow stopped");
        Ok(effects)
    }

    // ===== Staged slideshow editing =====

    /// Adds entries to the staged slideshow, creating one if needed
    ///
    /// While a slideshow is live the entries are held as pending additions.
    pub fn add_to_slideshow(&mut self, entries: Vec<QueueEntry>) -> ControlResult<Vec<Effect>> {
        if entries.is_empty() {
            return Err(ControlError::rejected("add to slideshow", "no entries given"));
        }
        let live_show = self.live_is_slideshow();

        match self.register.staged_mut() {
            Some(ContentItem::Slideshow(show)) => {
                let mut changed = false;
                for entry in entries {
                    changed |= if live_show {
                        show.queue_pending_add(entry)
                    } else {
                        show.push_entry(entry)
                    };
                }
                if changed {
                    self.register.record(SyncEvent::StagedEdited);
                }
                Ok(Vec::new())
            }
            _ => {
                let mut show = Slideshow::new(SlideshowId::generate(), Vec::new(), self.settings.slideshow);
                for entry in entries {
                    show.push_entry(entry);
                }
                self.stage(ContentItem::Slideshow(show))
            }
        }
    }

    /// Removes an entry from the staged slideshow
    ///
    /// Cancels a pending addition first; while a slideshow is live the
    /// removal is deferred; otherwise it happens now, and a slideshow left
    /// empty is un-staged.
    pub fn remove_from_slideshow(&mut self, key: &EntryKey) -> ControlResult<Vec<Effect>> {
        let live_show = self.live_is_slideshow();
        let Some(ContentItem::Slideshow(show)) = self.register.staged_mut() else {
            return Err(ControlError::rejected("remove from slideshow", "no slideshow is staged"));
        };

        if show.cancel_pending_add(key) {
            // nothing else to do
        } else if live_show {
            if !show.queue_pending_remove(key.clone()) {
                return Err(ControlError::rejected(
                    "remove from slideshow",
                    format!("'{}' is not queued or already pending removal", key),
                ));
            }
        } else {
            if show.remove_entry(key).is_none() {
                return Err(ControlError::rejected(
                    "remove from slideshow",
                    format!("'{}' is not queued", key),
                ));
            }
            if show.is_empty() {
                self.register.clear_staged();
                return Ok(Vec::new());
            }
        }

        self.register.record(SyncEvent::StagedEdited);
        Ok(Vec::new())
    }

    /// Reorders the staged queue; refused while a slideshow is live
    pub fn move_entry(&mut self, from: usize, to: usize) -> ControlResult<Vec<Effect>> {
        if self.live_is_slideshow() {
            return Err(ControlError::rejected(
                "move entry",
                "queue order is locked while a slideshow is live",
            ));
        }
        let show = self.staged_slideshow_mut("move entry")?;
        if !show.move_entry(from, to) {
            return Err(ControlError::rejected(
                "move entry",
                format!("cannot move {} to {}", from, to),
            ));
        }
        self.register.record(SyncEvent::StagedEdited);
        Ok(Vec::new())
    }

    pub fn select_entry(&mut self, index: usize) -> ControlResult<Vec<Effect>> {
        let show = self.staged_slideshow_mut("select entry")?;
        if !show.select(index) {
            return Err(ControlError::rejected(
                "select entry",
                format!("index {} is out of range", index),
            ));
        }
        self.register.record(SyncEvent::StagedEdited);
        Ok(Vec::new())
    }

    pub fn staged_next(&mut self) -> ControlResult<Vec<Effect>> {
        self.staged_slideshow_mut("next")?.step(true);
        self.register.record(SyncEvent::StagedEdited);
        Ok(Vec::new())
    }

    pub fn staged_prev(&mut self) -> ControlResult<Vec<Effect>> {
        self.staged_slideshow_mut("previous")?.step(false);
        self.register.record(SyncEvent::StagedEdited);
        Ok(Vec::new())
    }

    /// Re-stages the slideshow with pending edits folded in, new settings,
    /// and the cursor back at the first entry
    pub fn queue_slideshow(&mut self, settings: SlideshowSettings) -> ControlResult<Vec<Effect>> {
        check_interval("queue slideshow", &settings)?;
        let live_show = self.live_is_slideshow();
        let show = self.staged_slideshow_mut("queue slideshow")?;
        show.apply_pending();
        show.interval_ms = settings.interval_ms;
        show.looping = settings.looping;
        show.transition = settings.transition;
        show.index = 0;
        self.register.record(SyncEvent::StagedEdited);

        if live_show {
            Ok(Vec::new())
        } else {
            Ok(vec![Effect::SetTransitionStyle {
                style: settings.transition,
            }])
        }
    }

    /// Whether queueing with `settings` would change the staged slideshow
    pub fn has_queued_changes(&self, settings: &SlideshowSettings) -> bool {
        match self.register.staged() {
            Some(ContentItem::Slideshow(show)) => show.has_pending() || show.settings() != *settings,
            _ => false,
        }
    }

    /// Operator picked a transition style; applied at once unless a
    /// slideshow is live with its own
    pub fn select_transition(&mut self, style: TransitionStyle) -> ControlResult<Vec<Effect>> {
        if self.live_is_slideshow() {
            return Ok(Vec::new());
        }
        Ok(vec![Effect::SetTransitionStyle { style }])
    }

    // ===== Continuous media transport =====

    /// Handles a state report from the live output surface
    ///
    /// A `stopped` report ends live output but keeps the staged item, since
    /// the surface stopped on its own; an operator `Stop` through
    /// [`Controller::live_transport`] also clears a synced staged item.
    pub fn report_transport(&mut self, report: &TransportReport) -> ControlResult<Vec<Effect>> {
        let synced = self.register.is_synced();

        match self.register.live().kind() {
            ContentKind::SingleVideo | ContentKind::SingleAudio => {
                if !self.report_matches_live(report) {
                    log::debug!("Ignoring stale transport report for {}", report.path.display());
                    return Ok(Vec::new());
                }
                if report.condition == PlaybackCondition::Stopped {
                    log::info!("Live media stopped by output surface");
                    self.register.end_live(false);
                    self.bridge.reset_live();
                    return Ok(Vec::new());
                }

                if let Some(clip) = self.register.live_mut().as_clip_mut() {
                    clip.current_time = report.current_time;
                    clip.duration = report.duration;
                }
                let effects = self.bridge.mirror_report(report, synced);
                if synced {
                    let preview = *self.bridge.preview();
                    if let Some(clip) = self.register.staged_mut().and_then(ContentItem::as_clip_mut) {
                        clip.current_time = preview.current_time;
                        clip.duration = preview.duration;
                    }
                }
                Ok(effects)
            }
            ContentKind::Slideshow => {
                let waiting = matches!(self.player.state(), PlayerState::WaitingForEmbeddedVideo { .. });
                if !waiting || !self.report_matches_live(report) {
                    log::debug!("Ignoring stale transport report for {}", report.path.display());
                    return Ok(Vec::new());
                }
                match report.condition {
                    PlaybackCondition::Ended => Ok(self.drive_player(PlayerEvent::EmbeddedVideoEnded)),
                    PlaybackCondition::Stopped => Ok(Vec::new()),
                    _ => Ok(self.bridge.mirror_report(report, synced)),
                }
            }
            _ => {
                log::debug!("Ignoring transport report with no live media");
                Ok(Vec::new())
            }
        }
    }

    /// Operator acted on the preview transport: applied locally, breaks sync
    pub fn preview_transport(&mut self, command: TransportCommand) -> ControlResult<Vec<Effect>> {
        let Some(clip) = self.register.staged_mut().and_then(ContentItem::as_clip_mut) else {
            return Err(ControlError::rejected("preview transport", "no video or audio is staged"));
        };
        match command {
            TransportCommand::Seek(t) => clip.current_time = t,
            TransportCommand::Restart | TransportCommand::Stop => clip.current_time = 0.0,
            TransportCommand::Play | TransportCommand::Pause => {}
        }

        let effects = self.bridge.preview_action(command);
        self.register.record(SyncEvent::PreviewTransport);
        log::debug!("Preview {:?}; sync broken", command);
        Ok(effects)
    }

    /// Position update from the local preview element
    pub fn preview_progress(&mut self, current_time: f64, duration: f64) -> ControlResult<Vec<Effect>> {
        self.bridge.preview_progress(current_time, duration);
        if let Some(clip) = self.register.staged_mut().and_then(ContentItem::as_clip_mut) {
            clip.current_time = current_time;
            clip.duration = duration;
        }
        Ok(Vec::new())
    }

    /// Operator acted on the live transport of a single video or audio item
    ///
    /// While synced the action is mirrored into the preview. Stop returns the
    /// output to standby and clears a synced staged copy.
    pub fn live_transport(&mut self, command: TransportCommand) -> ControlResult<Vec<Effect>> {
        let channel = match self.register.live().kind() {
            ContentKind::SingleVideo => MediaChannel::Video,
            ContentKind::SingleAudio => MediaChannel::Audio,
            _ => return Err(ControlError::NotLive("video or audio")),
        };
        let control = |cmd| match channel {
            MediaChannel::Video => Effect::ControlVideo(cmd),
            MediaChannel::Audio => Effect::ControlAudio(cmd),
        };

        if command == TransportCommand::Stop {
            let effects = vec![control(TransportCommand::Stop), self.standby_effect()];
            self.register.end_live(true);
            self.bridge.reset_live();
            log::info!("Live media stopped");
            return Ok(effects);
        }

        let new_position = match command {
            TransportCommand::Seek(t) => Some(t),
            TransportCommand::Restart => Some(0.0),
            _ => None,
        };
        if let (Some(t), Some(clip)) = (new_position, self.register.live_mut().as_clip_mut()) {
            clip.current_time = t;
        }

        let synced = self.register.is_synced();
        let mut effects = vec![control(command)];
        effects.extend(self.bridge.live_action(command, synced));
        if synced {
            if let (Some(t), Some(clip)) = (
                new_position,
                self.register.staged_mut().and_then(ContentItem::as_clip_mut),
            ) {
                clip.current_time = t;
            }
            self.register.record(SyncEvent::LiveMirrored);
        }
        Ok(effects)
    }

    // ===== Assets =====

    /// Checks paths on disk and records the missing ones as broken
    pub fn validate_assets<A: AsRef<Path>>(&mut self, paths: &[A]) -> Vec<PathBuf> {
        let missing = self.broken.revalidate(paths);
        for path in &missing {
            log::warn!("Missing asset: {}", path.display());
        }
        missing
    }

    /// The output surface failed to load `path`
    ///
    /// A live slideshow showing that entry moves past it at once.
    pub fn asset_load_error(&mut self, path: &Path) -> ControlResult<Vec<Effect>> {
        log::warn!("Output surface could not load {}", path.display());
        self.broken.mark(path);

        let showing = self
            .register
            .live()
            .as_slideshow()
            .and_then(Slideshow::current_entry)
            .and_then(QueueEntry::path)
            .is_some_and(|p| p == path);
        if showing && self.player.state().is_active() {
            return Ok(self.drive_player(PlayerEvent::CurrentEntryBroken));
        }
        Ok(Vec::new())
    }

    // ===== Scripture =====

    /// Looks up `input` (e.g. "John 3:16") and stages it
    pub fn stage_scripture(&mut self, input: &str) -> ControlResult<Vec<Effect>> {
        let reference = Reference::parse(input)?;
        let passage = self.navigator.lookup(
            &reference,
            &self.settings.translation,
            self.settings.compare_translation.as_deref(),
            &self.settings.scripture_style,
        )?;
        self.stage(ContentItem::Scripture(passage))
    }

    /// Steps the staged scripture one verse
    ///
    /// When staged and live are synced the live output follows directly.
    pub fn navigate_scripture(&mut self, direction: Direction) -> ControlResult<ScriptureStep> {
        let Some(ContentItem::Scripture(current)) = self.register.staged() else {
            return Err(ControlError::rejected("navigate scripture", "no scripture is staged"));
        };
        let current = current.clone();

        let passage = match self.navigator.navigate(&current, direction)? {
            NavOutcome::Moved(passage) => passage,
            NavOutcome::Beginning => return Ok(ScriptureStep::Beginning),
            NavOutcome::End => return Ok(ScriptureStep::End),
        };

        let live_follows =
            self.register.is_synced() && matches!(self.register.live(), ContentItem::Scripture(_));
        if !live_follows {
            self.register.stage(ContentItem::Scripture(passage));
            return Ok(ScriptureStep::Moved(Vec::new()));
        }

        if let Some(staged) = self.register.staged_mut() {
            *staged = ContentItem::Scripture(passage.clone());
        }
        self.register.publish(ContentItem::Scripture(passage.clone()), true);
        log::info!("Live: scripture '{}'", passage.reference);
        Ok(ScriptureStep::Moved(vec![Effect::PublishScripture(ScripturePayload {
            passage,
            direction: direction.offset(),
        })]))
    }

    /// Switches the primary translation, re-resolving any staged scripture
    pub fn set_translation(&mut self, translation: &str) -> ControlResult<Vec<Effect>> {
        let compare = self.settings.compare_translation.clone();
        let restaged = self.resolve_staged_scripture(translation, compare.as_deref())?;
        self.settings.translation = translation.to_string();
        if let Some(passage) = restaged {
            self.register.stage(ContentItem::Scripture(passage));
        }
        Ok(Vec::new())
    }

    /// Selects (or clears) the comparison translation
    pub fn set_compare_translation(&mut self, compare: Option<&str>) -> ControlResult<Vec<Effect>> {
        let translation = self.settings.translation.clone();
        let restaged = self.resolve_staged_scripture(&translation, compare)?;
        self.settings.compare_translation = compare.map(str::to_string);
        if let Some(passage) = restaged {
            self.register.stage(ContentItem::Scripture(passage));
        }
        Ok(Vec::new())
    }

    /// Changes how scripture is rendered; a staged passage picks it up
    pub fn set_scripture_style(&mut self, style: ScriptureStyle) -> ControlResult<Vec<Effect>> {
        self.settings.scripture_style = style.clone();
        if matches!(self.register.staged(), Some(ContentItem::Scripture(_))) {
            self.register.edit_staged(|item| {
                if let ContentItem::Scripture(passage) = item {
                    passage.style = style;
                }
            });
        }
        Ok(Vec::new())
    }

    // ===== Internals =====

    fn live_is_slideshow(&self) -> bool {
        matches!(self.register.live(), ContentItem::Slideshow(_))
    }

    fn require_live_slideshow(&self) -> ControlResult<()> {
        if self.live_is_slideshow() {
            Ok(())
        } else {
            Err(ControlError::NotLive("slideshow"))
        }
    }

    fn staged_slideshow_mut(&mut self, operation: &'static str) -> ControlResult<&mut Slideshow> {
        self.register
            .staged_mut()
            .and_then(ContentItem::as_slideshow_mut)
            .ok_or_else(|| ControlError::rejected(operation, "no slideshow is staged"))
    }

    fn report_matches_live(&self, report: &TransportReport) -> bool {
        let live = self.register.live();
        let path = match report.channel {
            MediaChannel::Video => live.video_path(),
            MediaChannel::Audio => live.audio_path(),
        };
        path == Some(report.path.as_path())
    }

    fn standby_effect(&self) -> Effect {
        Effect::PublishStandby {
            image: self.settings.standby_image.clone(),
        }
    }

    /// Tears down the timer or media element of whatever is live
    fn stop_live_playback(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        match self.register.live().kind() {
            ContentKind::Slideshow => {
                if let Some(show) = self.register.live_mut().as_slideshow_mut() {
                    effects.extend(self.player.handle(show, &self.broken, PlayerEvent::Stop).effects);
                }
            }
            ContentKind::SingleVideo => effects.push(Effect::ControlVideo(TransportCommand::Stop)),
            ContentKind::SingleAudio => effects.push(Effect::ControlAudio(TransportCommand::Stop)),
            _ => {}
        }
        self.bridge.reset_live();
        effects
    }

    /// Publishes the staged slideshow, folding its pending edits in first
    fn publish_slideshow(&mut self, paused: bool) -> Vec<Effect> {
        let snapshot = match self.register.staged_mut() {
            Some(ContentItem::Slideshow(show)) => {
                show.apply_pending();
                show.live_snapshot()
            }
            _ => return Vec::new(),
        };

        let mut effects = vec![Effect::SetTransitionStyle {
            style: snapshot.transition,
        }];
        self.register.publish(ContentItem::Slideshow(snapshot), true);
        effects.extend(self.drive_player(PlayerEvent::Start { paused }));
        effects
    }

    /// Runs the live slideshow reducer and applies its outcome to the register
    fn drive_player(&mut self, event: PlayerEvent) -> Vec<Effect> {
        let Some(show) = self.register.live_mut().as_slideshow_mut() else {
            return Vec::new();
        };
        let step = self.player.handle(show, &self.broken, event);
        let index = show.index;

        let mut effects = step.effects;
        if step.finished {
            effects.push(self.standby_effect());
            self.register.end_live(true);
            self.settle_pending_edits();
            log::info!("Slideshow reached its end");
            return effects;
        }

        if effects.iter().any(|e| matches!(e, Effect::PublishVideo { .. })) {
            self.bridge.reset_live();
        }
        if self.register.is_synced() {
            if let Some(staged) = self.register.staged_mut().and_then(ContentItem::as_slideshow_mut) {
                if index < staged.len() {
                    staged.index = index;
                }
            }
            self.register.record(SyncEvent::LiveMirrored);
        }
        effects
    }

    /// Folds pending edits into a staged slideshow once no slideshow is live
    fn settle_pending_edits(&mut self) {
        if self.live_is_slideshow() {
            return;
        }
        if let Some(show) = self.register.staged_mut().and_then(ContentItem::as_slideshow_mut) {
            if show.has_pending() {
                show.apply_pending();
            }
        }
    }

    /// Re-looks up the staged scripture in other translations
    fn resolve_staged_scripture(
        &mut self,
        translation: &str,
        compare: Option<&str>,
    ) -> ControlResult<Option<ScripturePassage>> {
        let Some(ContentItem::Scripture(current)) = self.register.staged() else {
            return Ok(None);
        };
        let reference = Reference::from_ids(&current.book_id, current.chapter, current.verse)?;
        let style = current.style.clone();
        let passage = self.navigator.lookup(&reference, translation, compare, &style)?;
        Ok(Some(passage))
    }
}

/// Path of a single image, video or audio item
fn single_media_path(item: &ContentItem) -> Option<&Path> {
    match item {
        ContentItem::SingleImage(_) => item.image_path(),
        ContentItem::SingleVideo(_) => item.video_path(),
        ContentItem::SingleAudio(_) => item.audio_path(),
        _ => None,
    }
}

/// Refuses slide intervals outside the supported range
fn check_interval(operation: &'static str, settings: &SlideshowSettings) -> ControlResult<()> {
    if settings.interval_in_range() {
        return Ok(());
    }
    Err(ControlError::rejected(
        operation,
        format!(
            "interval {}ms is outside {}..={}ms",
            settings.interval_ms, MIN_INTERVAL_MS, MAX_INTERVAL_MS
        ),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use stagecast_scripture::MemoryProvider;

    fn controller() -> Controller<MemoryProvider> {
        let provider = MemoryProvider::new().with_chapter(
            "eng_kjv",
            "JHN",
            3,
            &[(15, "That whosoever believeth"), (16, "For God so loved"), (17, "For God sent not")],
        );
        Controller::new(provider, ControllerSettings::default())
    }

    #[test]
    fn test_stage_breaks_sync() {
        let mut c = controller();
        c.stage(ContentItem::video("/m/b.mp4")).expect("staged");
        c.go_live().expect("published");
        assert!(c.is_synced());

        c.stage(ContentItem::image("/m/a.jpg")).expect("staged");
        assert!(!c.is_synced());
    }

    #[test]
    fn test_standby_stops_media() {
        let mut c = controller();
        c.stage(ContentItem::audio("/m/c.mp3")).expect("staged");
        c.go_live().expect("published");

        let effects = c.standby().expect("standby");
        assert_eq!(
            effects,
            vec![
                Effect::ControlAudio(TransportCommand::Stop),
                Effect::PublishStandby { image: None }
            ]
        );
        assert!(c.live().is_standby());
        assert!(!c.is_synced());
        assert!(c.staged().is_some());
    }

    #[test]
    fn test_nothing_staged_go_live_returns_to_standby() {
        let mut c = controller();
        assert!(c.go_live().is_err());

        c.stage(ContentItem::image("/m/a.jpg")).expect("staged");
        c.go_live().expect("published");
        c.clear_staged().expect("cleared");
        assert!(c.can_go_live());

        let effects = c.go_live().expect("standby");
        assert_eq!(effects, vec![Effect::PublishStandby { image: None }]);
        assert!(c.live().is_standby());
    }

    #[test]
    fn test_video_publishes_from_rehearsal_position() {
        let mut c = controller();
        c.stage(ContentItem::video("/m/b.mp4")).expect("staged");
        c.preview_progress(12.0, 60.0).expect("progress");

        let effects = c.go_live().expect("published");
        assert_eq!(
            effects,
            vec![Effect::PublishVideo {
                path: PathBuf::from("/m/b.mp4"),
                start_time: 12.0,
                autoplay: true
            }]
        );
    }

    #[test]
    fn test_broken_single_item_is_refused() {
        let mut c = controller();
        c.asset_load_error(Path::new("/m/gone.jpg")).expect("recorded");
        let err = c.stage(ContentItem::image("/m/gone.jpg")).expect_err("broken");
        assert_eq!(err, ControlError::MissingAsset(PathBuf::from("/m/gone.jpg")));
        assert!(c.staged().is_none());
    }

    #[test]
    fn test_stage_scripture_and_navigate_synced() {
        let mut c = controller();
        c.stage_scripture("John 3:16").expect("staged");
        c.go_live().expect("published");
        assert!(c.is_synced());

        let step = c.navigate_scripture(Direction::Forward).expect("navigated");
        let ScriptureStep::Moved(effects) = step else {
            panic!("expected a move");
        };
        assert!(matches!(
            &effects[..],
            [Effect::PublishScripture(ScripturePayload { direction: 1, .. })]
        ));
        assert!(c.is_synced());
        assert_eq!(c.live().as_scripture().map(|p| p.verse), Some(17));
        assert!(!c.can_go_live());
    }

    #[test]
    fn test_bad_reference_leaves_staged_untouched() {
        let mut c = controller();
        c.stage(ContentItem::image("/m/a.jpg")).expect("staged");
        let err = c.stage_scripture("Hezekiah 1:1").expect_err("unknown book");
        assert!(matches!(err, ControlError::Lookup(_)));
        assert_eq!(c.staged().map(ContentItem::kind), Some(ContentKind::SingleImage));
    }

    #[test]
    fn test_scripture_style_edit_reenables_go_live() {
        let mut c = controller();
        c.stage_scripture("John 3:16").expect("staged");
        c.go_live().expect("published");
        assert!(!c.can_go_live());

        let style = ScriptureStyle {
            font_size: 64,
            ..ScriptureStyle::default()
        };
        c.set_scripture_style(style).expect("restyled");
        assert!(!c.is_synced());
        assert!(c.can_go_live());
    }
}
