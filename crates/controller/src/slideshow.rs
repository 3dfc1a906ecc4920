//! Live slideshow playback
//!
//! [`SlideshowPlayer`] is a reducer over the live [`Slideshow`]: every input
//! (timer tick, operator transport action, embedded video completion) goes
//! through [`SlideshowPlayer::handle`], which moves the cursor and returns the
//! effects to perform. The player owns the interval timer and hands out a
//! fresh [`TimerToken`] whenever it starts one.

use crate::assets::BrokenAssets;
use crate::effects::{Effect, TimerToken, TransportCommand};
use stagecast_core::{QueueEntry, Slideshow};

/// Playback state of the live slideshow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayerState {
    /// No slideshow is live
    #[default]
    Idle,
    /// Showing an image or quick slide with the timer running
    Playing,
    /// Showing an image or quick slide with the timer stopped
    Paused,
    /// Showing a video entry; advance waits for it to end
    WaitingForEmbeddedVideo { paused: bool },
}

impl PlayerState {
    pub fn is_paused(&self) -> bool {
        matches!(self, Self::Paused | Self::WaitingForEmbeddedVideo { paused: true })
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Idle)
    }
}

/// Inputs of the slideshow state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerEvent {
    /// The slideshow was just published
    Start { paused: bool },
    /// The interval timer fired
    Tick(TimerToken),
    Next,
    Prev,
    Pause,
    Resume,
    /// The video shown by the current entry played to its end
    EmbeddedVideoEnded,
    /// The current entry failed to load
    CurrentEntryBroken,
    Stop,
}

/// Outcome of one event
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Step {
    pub effects: Vec<Effect>,
    /// The show ran out (non-looping end or nothing playable left); the
    /// caller returns the output to standby
    pub finished: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Movement {
    /// Timer-driven: stops at the end of a non-looping queue
    Advance,
    /// Operator-driven: always wraps
    Manual { forward: bool },
}

/// Reducer for the live slideshow
#[derive(Debug, Default)]
pub struct SlideshowPlayer {
    state: PlayerState,
    timer: Option<TimerToken>,
    next_token: u64,
}

impl SlideshowPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    /// Token of the running timer, if any
    pub fn timer(&self) -> Option<TimerToken> {
        self.timer
    }

    /// Feeds one event through the state machine
    pub fn handle(&mut self, show: &mut Slideshow, broken: &BrokenAssets, event: PlayerEvent) -> Step {
        let mut step = Step::default();
        log::debug!("Slideshow {} in {:?} <- {:?}", show.id, self.state, event);

        match (self.state, event) {
            (_, PlayerEvent::Start { paused }) => {
                self.clear_timer(&mut step);
                self.state = if paused { PlayerState::Paused } else { PlayerState::Playing };
                self.enter(show, broken, Movement::Advance, false, &mut step);
            }

            (PlayerState::Idle, _) => {}

            (_, PlayerEvent::Stop) => {
                self.clear_timer(&mut step);
                if matches!(self.state, PlayerState::WaitingForEmbeddedVideo { .. }) {
                    step.effects.push(Effect::ControlVideo(TransportCommand::Stop));
                }
                self.state = PlayerState::Idle;
            }

            (PlayerState::Playing, PlayerEvent::Tick(token)) if self.timer == Some(token) => {
                self.advance(show, broken, &mut step);
            }
            (_, PlayerEvent::Tick(token)) => {
                log::debug!("Ignoring stale slideshow tick {}", token);
            }

            (_, PlayerEvent::Next) => {
                show.step(true);
                self.enter(show, broken, Movement::Manual { forward: true }, true, &mut step);
            }
            (_, PlayerEvent::Prev) => {
                show.step(false);
                self.enter(show, broken, Movement::Manual { forward: false }, true, &mut step);
            }

            (PlayerState::Playing, PlayerEvent::Pause) => {
                self.clear_timer(&mut step);
                self.state = PlayerState::Paused;
            }
            (PlayerState::WaitingForEmbeddedVideo { paused: false }, PlayerEvent::Pause) => {
                step.effects.push(Effect::ControlVideo(TransportCommand::Pause));
                self.state = PlayerState::WaitingForEmbeddedVideo { paused: true };
            }
            (PlayerState::Paused, PlayerEvent::Resume) => {
                self.state = PlayerState::Playing;
                self.start_timer(show, &mut step);
            }
            (PlayerState::WaitingForEmbeddedVideo { paused: true }, PlayerEvent::Resume) => {
                step.effects.push(Effect::ControlVideo(TransportCommand::Play));
                self.state = PlayerState::WaitingForEmbeddedVideo { paused: false };
            }
            (_, PlayerEvent::Pause) | (_, PlayerEvent::Resume) => {}

            (PlayerState::WaitingForEmbeddedVideo { paused }, PlayerEvent::EmbeddedVideoEnded) => {
                self.state = if paused { PlayerState::Paused } else { PlayerState::Playing };
                self.advance(show, broken, &mut step);
            }
            (_, PlayerEvent::EmbeddedVideoEnded) => {}

            (_, PlayerEvent::CurrentEntryBroken) => {
                if let PlayerState::WaitingForEmbeddedVideo { paused } = self.state {
                    self.state = if paused { PlayerState::Paused } else { PlayerState::Playing };
                }
                self.advance(show, broken, &mut step);
            }
        }

        step
    }

    /// Timer-driven move to the next entry
    fn advance(&mut self, show: &mut Slideshow, broken: &BrokenAssets, step: &mut Step) {
        if !advance_index(show) {
            self.finish(step);
            return;
        }
        self.enter(show, broken, Movement::Advance, false, step);
    }

    /// Presents the entry at the cursor, passing over broken entries
    ///
    /// At most `queue.len()` entries are skipped before the show is treated
    /// as finished.
    fn enter(
        &mut self,
        show: &mut Slideshow,
        broken: &BrokenAssets,
        movement: Movement,
        restart_timer: bool,
        step: &mut Step,
    ) {
        let mut skips = 0;
        loop {
            let Some(entry) = show.current_entry() else {
                self.finish(step);
                return;
            };
            if !broken.is_entry_broken(entry) {
                break;
            }

            skips += 1;
            log::warn!("Skipping broken slideshow entry {} ({}/{})", entry.key(), skips, show.len());
            if skips >= show.len() {
                self.finish(step);
                return;
            }
            match movement {
                Movement::Advance => {
                    if !advance_index(show) {
                        self.finish(step);
                        return;
                    }
                }
                Movement::Manual { forward } => show.step(forward),
            }
        }

        let paused = self.state.is_paused();
        let Some(entry) = show.current_entry().cloned() else {
            self.finish(step);
            return;
        };

        match entry {
            QueueEntry::Video { path, .. } => {
                self.clear_timer(step);
                step.effects.push(Effect::PublishVideo {
                    path,
                    start_time: 0.0,
                    autoplay: !paused,
                });
                self.state = PlayerState::WaitingForEmbeddedVideo { paused };
            }
            QueueEntry::Image { path, .. } => {
                step.effects.push(Effect::PublishImage { path });
                self.settle(show, paused, restart_timer, step);
            }
            QueueEntry::QuickSlide(slide) => {
                step.effects.push(Effect::PublishQuickSlide(slide));
                self.settle(show, paused, restart_timer, step);
            }
        }
    }

    /// Timed entry shown: run the timer unless paused
    fn settle(&mut self, show: &Slideshow, paused: bool, restart_timer: bool, step: &mut Step) {
        if paused {
            self.clear_timer(step);
            self.state = PlayerState::Paused;
            return;
        }
        self.state = PlayerState::Playing;
        if restart_timer || self.timer.is_none() {
            self.start_timer(show, step);
        }
    }

    fn start_timer(&mut self, show: &Slideshow, step: &mut Step) {
        self.clear_timer(step);
        self.next_token += 1;
        let token = TimerToken::new(self.next_token);
        self.timer = Some(token);
        step.effects.push(Effect::StartTimer {
            token,
            interval_ms: show.interval_ms,
        });
    }

    fn clear_timer(&mut self, step: &mut Step) {
        if let Some(token) = self.timer.take() {
            step.effects.push(Effect::ClearTimer { token });
        }
    }

    /// Natural end: timer cleared, player idle
    fn finish(&mut self, step: &mut Step) {
        self.clear_timer(step);
        self.state = PlayerState::Idle;
        step.finished = true;
    }
}

/// Moves the cursor forward; past the end wraps when looping, otherwise
/// stays on the last entry and returns false
fn advance_index(show: &mut Slideshow) -> bool {
    let next = show.index + 1;
    if next < show.len() {
        show.index = next;
        true
    } else if show.looping && !show.is_empty() {
        show.index = 0;
        true
    } else {
        show.index = show.len().saturating_sub(1);
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stagecast_core::{QuickSlide, SlideshowId, SlideshowSettings};
    use std::path::PathBuf;

    fn show(entries: Vec<QueueEntry>, looping: bool) -> Slideshow {
        Slideshow::new(
            SlideshowId::from("s"),
            entries,
            SlideshowSettings {
                looping,
                ..SlideshowSettings::default()
            },
        )
    }

    fn images(n: usize) -> Vec<QueueEntry> {
        (0..n).map(|i| QueueEntry::image(format!("/m/{}.jpg", i))).collect()
    }

    fn started(show: &mut Slideshow) -> (SlideshowPlayer, Step) {
        let mut player = SlideshowPlayer::new();
        let step = player.handle(show, &BrokenAssets::new(), PlayerEvent::Start { paused: false });
        (player, step)
    }

    fn tick(player: &mut SlideshowPlayer, show: &mut Slideshow) -> Step {
        let token = player.timer().expect("timer running");
        player.handle(show, &BrokenAssets::new(), PlayerEvent::Tick(token))
    }

    #[test]
    fn test_start_publishes_and_arms_timer() {
        let mut s = show(images(2), true);
        let (player, step) = started(&mut s);

        assert_eq!(player.state(), PlayerState::Playing);
        assert_eq!(
            step.effects,
            vec![
                Effect::PublishImage {
                    path: PathBuf::from("/m/0.jpg")
                },
                Effect::StartTimer {
                    token: TimerToken::new(1),
                    interval_ms: 7000
                },
            ]
        );
    }

    #[test]
    fn test_tick_keeps_interval_running() {
        let mut s = show(images(3), true);
        let (mut player, _) = started(&mut s);
        let token = player.timer();

        let step = tick(&mut player, &mut s);
        assert_eq!(s.index, 1);
        assert_eq!(player.timer(), token);
        assert_eq!(
            step.effects,
            vec![Effect::PublishImage {
                path: PathBuf::from("/m/1.jpg")
            }]
        );
    }

    #[test]
    fn test_stale_tick_is_ignored() {
        let mut s = show(images(3), true);
        let (mut player, _) = started(&mut s);
        let old = player.timer().expect("timer running");
        player.handle(&mut s, &BrokenAssets::new(), PlayerEvent::Next);

        let step = player.handle(&mut s, &BrokenAssets::new(), PlayerEvent::Tick(old));
        assert!(step.effects.is_empty());
        assert_eq!(s.index, 1);
    }

    #[test]
    fn test_non_looping_end_finishes() {
        let mut s = show(images(2), false);
        let (mut player, _) = started(&mut s);
        let token = player.timer().expect("timer running");

        tick(&mut player, &mut s);
        let step = tick(&mut player, &mut s);

        assert!(step.finished);
        assert_eq!(step.effects, vec![Effect::ClearTimer { token }]);
        assert_eq!(player.state(), PlayerState::Idle);
        assert_eq!(s.index, 1);
    }

    #[test]
    fn test_video_entry_waits_for_end() {
        let mut s = show(vec![QueueEntry::image("/m/a.jpg"), QueueEntry::video("/m/b.mp4")], true);
        let (mut player, _) = started(&mut s);
        let token = player.timer().expect("timer running");

        let step = tick(&mut player, &mut s);
        assert_eq!(player.state(), PlayerState::WaitingForEmbeddedVideo { paused: false });
        assert_eq!(player.timer(), None);
        assert!(step.effects.contains(&Effect::ClearTimer { token }));
        assert!(step.effects.contains(&Effect::PublishVideo {
            path: PathBuf::from("/m/b.mp4"),
            start_time: 0.0,
            autoplay: true
        }));

        let step = player.handle(&mut s, &BrokenAssets::new(), PlayerEvent::Tick(token));
        assert!(step.effects.is_empty());

        player.handle(&mut s, &BrokenAssets::new(), PlayerEvent::EmbeddedVideoEnded);
        assert_eq!(s.index, 0);
        assert_eq!(player.state(), PlayerState::Playing);
        assert!(player.timer().is_some());
    }

    #[test]
    fn test_pause_and_resume_timer() {
        let mut s = show(images(2), true);
        let (mut player, _) = started(&mut s);

        let step = player.handle(&mut s, &BrokenAssets::new(), PlayerEvent::Pause);
        assert_eq!(player.state(), PlayerState::Paused);
        assert!(matches!(step.effects[..], [Effect::ClearTimer { .. }]));

        let step = player.handle(&mut s, &BrokenAssets::new(), PlayerEvent::Resume);
        assert_eq!(player.state(), PlayerState::Playing);
        assert!(matches!(step.effects[..], [Effect::StartTimer { .. }]));
    }

    #[test]
    fn test_pause_while_waiting_pauses_video() {
        let mut s = show(vec![QueueEntry::video("/m/b.mp4")], true);
        let (mut player, _) = started(&mut s);

        let step = player.handle(&mut s, &BrokenAssets::new(), PlayerEvent::Pause);
        assert_eq!(step.effects, vec![Effect::ControlVideo(TransportCommand::Pause)]);
        assert!(player.state().is_paused());

        let step = player.handle(&mut s, &BrokenAssets::new(), PlayerEvent::Resume);
        assert_eq!(step.effects, vec![Effect::ControlVideo(TransportCommand::Play)]);
    }

    #[test]
    fn test_manual_navigation_wraps_and_resets_timer() {
        let mut s = show(images(3), false);
        let (mut player, _) = started(&mut s);
        let first = player.timer().expect("timer running");

        let step = player.handle(&mut s, &BrokenAssets::new(), PlayerEvent::Prev);
        assert_eq!(s.index, 2);
        assert!(step.effects.contains(&Effect::ClearTimer { token: first }));
        assert_ne!(player.timer(), Some(first));

        player.handle(&mut s, &BrokenAssets::new(), PlayerEvent::Next);
        assert_eq!(s.index, 0);
    }

    #[test]
    fn test_manual_navigation_while_paused_keeps_timer_off() {
        let mut s = show(images(3), true);
        let (mut player, _) = started(&mut s);
        player.handle(&mut s, &BrokenAssets::new(), PlayerEvent::Pause);

        let step = player.handle(&mut s, &BrokenAssets::new(), PlayerEvent::Next);
        assert_eq!(player.timer(), None);
        assert_eq!(player.state(), PlayerState::Paused);
        assert_eq!(
            step.effects,
            vec![Effect::PublishImage {
                path: PathBuf::from("/m/1.jpg")
            }]
        );
    }

    #[test]
    fn test_broken_entries_are_skipped() {
        let mut s = show(images(3), true);
        let mut broken = BrokenAssets::new();
        broken.mark("/m/1.jpg");
        let (mut player, _) = started(&mut s);

        let token = player.timer().expect("timer running");
        player.handle(&mut s, &broken, PlayerEvent::Tick(token));
        assert_eq!(s.index, 2);
    }

    #[test]
    fn test_quick_slide_entry_is_timed() {
        let slide = QuickSlide::announcement("qs-1", "Welcome", "");
        let mut s = show(vec![QueueEntry::QuickSlide(slide.clone())], true);
        let (player, step) = started(&mut s);
        assert_eq!(step.effects[0], Effect::PublishQuickSlide(slide));
        assert!(player.timer().is_some());
    }

    #[test]
    fn test_stop_tears_down_video() {
        let mut s = show(vec![QueueEntry::video("/m/b.mp4")], true);
        let (mut player, _) = started(&mut s);
        let step = player.handle(&mut s, &BrokenAssets::new(), PlayerEvent::Stop);
        assert_eq!(step.effects, vec![Effect::ControlVideo(TransportCommand::Stop)]);
        assert_eq!(player.state(), PlayerState::Idle);

        let step = player.handle(&mut s, &BrokenAssets::new(), PlayerEvent::Next);
        assert!(step.effects.is_empty());
    }
}
