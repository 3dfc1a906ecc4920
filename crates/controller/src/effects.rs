//! Effects: what the controller asks its collaborators to do
//!
//! Every operation returns a list of effects instead of performing I/O, so the
//! state machines can be tested without an output surface or a clock.

use serde::Serialize;
use stagecast_core::{QuickSlide, ScripturePassage, TransitionStyle};
use std::fmt;
use std::path::PathBuf;

/// Handle of a running slideshow interval timer
///
/// Ticks carry the token they were started with; a tick whose token is no
/// longer current belongs to a torn-down timer and is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TimerToken(u64);

impl TimerToken {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TimerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Transport command for a video or audio element
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "cmd", content = "value", rename_all = "lowercase")]
pub enum TransportCommand {
    Play,
    Pause,
    /// Seek to a position in seconds
    Seek(f64),
    /// Seek to 0 and play
    Restart,
    Stop,
}

/// Scripture as published: the passage plus the direction it was reached from
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScripturePayload {
    #[serde(flatten)]
    pub passage: ScripturePassage,
    /// -1 when navigated backward, +1 forward, 0 for a fresh lookup
    pub direction: i8,
}

/// A side effect requested by the controller
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "effect", rename_all = "kebab-case")]
pub enum Effect {
    // ===== Output surface =====
    PublishStandby {
        image: Option<PathBuf>,
    },
    PublishImage {
        path: PathBuf,
    },
    PublishVideo {
        path: PathBuf,
        start_time: f64,
        autoplay: bool,
    },
    PublishAudio {
        path: PathBuf,
        start_time: f64,
    },
    PublishScripture(ScripturePayload),
    PublishQuickSlide(QuickSlide),
    ControlVideo(TransportCommand),
    ControlAudio(TransportCommand),
    SetTransitionStyle {
        style: TransitionStyle,
    },

    // ===== Slideshow timer =====
    StartTimer {
        token: TimerToken,
        interval_ms: u64,
    },
    ClearTimer {
        token: TimerToken,
    },

    // ===== Local preview transport =====
    Preview(TransportCommand),
}

impl Effect {
    /// Whether this effect changes what the audience sees
    pub fn is_publish(&self) -> bool {
        matches!(
            self,
            Effect::PublishStandby { .. }
                | Effect::PublishImage { .. }
                | Effect::PublishVideo { .. }
                | Effect::PublishAudio { .. }
                | Effect::PublishScripture(_)
                | Effect::PublishQuickSlide(_)
        )
    }
}

/// Receiver of effects, implemented by whatever drives the real outputs
pub trait OutputSurface {
    fn apply(&mut self, effect: &Effect);
}

impl OutputSurface for Vec<Effect> {
    fn apply(&mut self, effect: &Effect) {
        self.push(effect.clone());
    }
}

/// Applies effects to a surface in order
pub fn dispatch<S: OutputSurface + ?Sized>(surface: &mut S, effects: &[Effect]) {
    for effect in effects {
        surface.apply(effect);
    }
}
