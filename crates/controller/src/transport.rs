//! Preview/live transport synchronization
//!
//! While the register is synced, the preview transport follows the live one:
//! state reports from the output surface start, pause and re-position the
//! preview, and operator actions on the live transport are mirrored into it.
//! Operator actions on the preview are applied locally only; the caller
//! records them as a sync break.

use crate::effects::{Effect, TransportCommand};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Which media element a report or command concerns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaChannel {
    Video,
    Audio,
}

/// Playback condition reported by a transport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackCondition {
    Playing,
    Paused,
    Ended,
    /// The output surface tore the element down
    Stopped,
}

/// State notification from the live output surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportReport {
    pub channel: MediaChannel,
    /// Media the report is about; reports for anything else are stale
    pub path: PathBuf,
    pub condition: PlaybackCondition,
    pub current_time: f64,
    pub duration: f64,
}

impl TransportReport {
    pub fn new(channel: MediaChannel, path: impl Into<PathBuf>, condition: PlaybackCondition) -> Self {
        Self {
            channel,
            path: path.into(),
            condition,
            current_time: 0.0,
            duration: 0.0,
        }
    }

    pub fn at(mut self, current_time: f64, duration: f64) -> Self {
        self.current_time = current_time;
        self.duration = duration;
        self
    }
}

/// Last known state of one transport
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TransportState {
    pub playing: bool,
    pub current_time: f64,
    pub duration: f64,
}

impl TransportState {
    fn apply(&mut self, command: TransportCommand) {
        match command {
            TransportCommand::Play => self.playing = true,
            TransportCommand::Pause => self.playing = false,
            TransportCommand::Seek(t) => self.current_time = t,
            TransportCommand::Restart => {
                self.current_time = 0.0;
                self.playing = true;
            }
            TransportCommand::Stop => {
                self.playing = false;
                self.current_time = 0.0;
            }
        }
    }
}

/// Keeps the preview transport consistent with the live transport
#[derive(Debug, Clone)]
pub struct SyncBridge {
    preview: TransportState,
    live: Option<TransportState>,
    snap_tolerance_secs: f64,
}

impl SyncBridge {
    pub fn new(snap_tolerance_secs: f64) -> Self {
        Self {
            preview: TransportState::default(),
            live: None,
            snap_tolerance_secs: snap_tolerance_secs.max(0.0),
        }
    }

    pub fn preview(&self) -> &TransportState {
        &self.preview
    }

    /// Last reported live state, `None` until the first report
    pub fn live(&self) -> Option<&TransportState> {
        self.live.as_ref()
    }

    /// A new item was staged: the preview starts paused at `start_time`
    pub fn reset_preview(&mut self, start_time: f64, duration: f64) {
        self.preview = TransportState {
            playing: false,
            current_time: start_time,
            duration,
        };
    }

    /// Media was published live; no report has arrived for it yet
    pub fn reset_live(&mut self) {
        self.live = None;
    }

    /// Local progress of the preview element
    pub fn preview_progress(&mut self, current_time: f64, duration: f64) {
        self.preview.current_time = current_time;
        self.preview.duration = duration;
    }

    /// Operator acted on the preview transport
    pub fn preview_action(&mut self, command: TransportCommand) -> Vec<Effect> {
        self.preview.apply(command);
        vec![Effect::Preview(command)]
    }

    /// Operator acted on the live transport; when synced the same action is
    /// mirrored into the preview
    ///
    /// A live seek snaps the preview to exactly the same position.
    pub fn live_action(&mut self, command: TransportCommand, synced: bool) -> Vec<Effect> {
        if let Some(live) = self.live.as_mut() {
            live.apply(command);
        }
        if !synced {
            return Vec::new();
        }
        self.preview.apply(command);
        match command {
            TransportCommand::Restart => vec![
                Effect::Preview(TransportCommand::Seek(0.0)),
                Effect::Preview(TransportCommand::Play),
            ],
            other => vec![Effect::Preview(other)],
        }
    }

    /// Records a live state report; when synced, returns the preview
    /// commands that bring the preview in line with it
    pub fn mirror_report(&mut self, report: &TransportReport, synced: bool) -> Vec<Effect> {
        let playing = report.condition == PlaybackCondition::Playing;
        self.live = Some(TransportState {
            playing,
            current_time: report.current_time,
            duration: report.duration,
        });

        if !synced {
            return Vec::new();
        }

        let mut effects = Vec::new();
        match report.condition {
            PlaybackCondition::Playing if !self.preview.playing => {
                effects.push(Effect::Preview(TransportCommand::Play));
                self.preview.playing = true;
            }
            PlaybackCondition::Paused | PlaybackCondition::Ended if self.preview.playing => {
                effects.push(Effect::Preview(TransportCommand::Pause));
                self.preview.playing = false;
            }
            _ => {}
        }

        if playing && (self.preview.current_time - report.current_time).abs() > self.snap_tolerance_secs {
            effects.push(Effect::Preview(TransportCommand::Seek(report.current_time)));
            self.preview.current_time = report.current_time;
        }
        self.preview.duration = report.duration;

        effects
    }
}

impl Default for SyncBridge {
    fn default() -> Self {
        Self::new(0.5)
    }
}
