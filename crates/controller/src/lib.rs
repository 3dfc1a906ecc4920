//! Stagecast presentation controller
//!
//! Holds the staged/live register, runs live slideshows, keeps the preview
//! transport in step with live media and publishes scripture. Every
//! operation returns the [`Effect`]s an output surface must perform.

mod assets;
mod controller;
mod effects;
mod error;
mod golive;
mod slideshow;
mod transport;

pub use assets::{validate_paths, BrokenAssets};
pub use controller::{Controller, ControllerSettings, ScriptureStep};
pub use effects::{dispatch, Effect, OutputSurface, ScripturePayload, TimerToken, TransportCommand};
pub use error::{ControlError, ControlResult};
pub use golive::{can_go_live, is_continuous};
pub use slideshow::{PlayerEvent, PlayerState, SlideshowPlayer, Step};
pub use transport::{MediaChannel, PlaybackCondition, SyncBridge, TransportReport, TransportState};
