// FILE: crates/cli/src/session.rs

//! Interactive operator console
//!
//! Reads one command per line from stdin and routes it into the
//! [`Controller`]. Effects are printed as JSON lines; `StartTimer` and
//! `ClearTimer` arm and disarm a real interval whose ticks come back in as
//! `timer_tick`. Output-surface notifications (transport reports, load
//! errors) are typed in by hand.

use anyhow::{anyhow, bail, Context, Result};
use console::style;
use stagecast_config::{Config, ConfigManager, PresetStore, SlideshowPreset};
use stagecast_controller::{
    dispatch, Controller, ControllerSettings, Effect, MediaChannel, OutputSurface,
    PlaybackCondition, ScriptureStep, TimerToken, TransportCommand, TransportReport,
};
use stagecast_core::{
    ContentItem, EntryKey, MediaKind, QueueEntry, QuickSlide, Slideshow, SlideshowId,
    Timestamp, TransitionStyle,
};
use stagecast_scripture::{Direction, HelloAoProvider, ScriptureProvider};
use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;

const HELP: &str = "\
Staging
  stage <file>                    image, video or audio by extension
  stage show <file>...            slideshow of images and videos
  stage verse <reference>         scripture, e.g. stage verse John 3:16
  stage announce <title> [| body] announcement slide
  stage countdown <minutes> [label]
  stage preset <id|name>          saved slideshow
  clear                           clear the preview
  go                              put the preview live
  standby                         return live to standby

Live slideshow
  next | prev | pause | resume | stop

Queue editing
  add <file>...   remove <file>   move <from> <to>   select <n>
  snext | sprev                   step the staged cursor
  queue [seconds] [loop|once]     re-stage with new settings
  transition fade|slide|none
  save [name]                     save the staged slideshow as a preset

Scripture
  verse next|prev   translation <id>   compare <id>|off

Transport
  preview play|pause|restart|stop|seek <secs>|at <secs> <duration>
  live play|pause|restart|stop|seek <secs>

Output surface notifications
  report video|audio playing|paused|ended|stopped [secs] [duration]
  error <file>                    media failed to load
  check <file>...                 mark missing files broken

  status | help | quit";

/// A parsed operator command
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleCommand {
    Stage(StageTarget),
    Clear,
    GoLive,
    Standby,
    Next,
    Prev,
    Pause,
    Resume,
    Stop,
    Add(Vec<PathBuf>),
    Remove(PathBuf),
    Move { from: usize, to: usize },
    Select(usize),
    StagedNext,
    StagedPrev,
    Queue {
        interval_secs: Option<u64>,
        looping: Option<bool>,
    },
    Transition(TransitionStyle),
    Save(Option<String>),
    Verse(Direction),
    Translation(String),
    Compare(Option<String>),
    Preview(TransportCommand),
    PreviewAt { current_time: f64, duration: f64 },
    Live(TransportCommand),
    Report {
        channel: MediaChannel,
        condition: PlaybackCondition,
        current_time: f64,
        duration: f64,
    },
    LoadError(PathBuf),
    Check(Vec<PathBuf>),
    Status,
    Help,
    Quit,
}

/// What `stage` puts in the preview
#[derive(Debug, Clone, PartialEq)]
pub enum StageTarget {
    Media(PathBuf),
    Show(Vec<PathBuf>),
    Verse(String),
    Announcement { title: String, body: String },
    Countdown { minutes: u64, label: Option<String> },
    Preset(String),
}

/// Parses one console line
pub fn parse_command(line: &str) -> Result<ConsoleCommand> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let Some((&head, args)) = words.split_first() else {
        bail!("Empty command");
    };

    let command = match (head.to_ascii_lowercase().as_str(), args) {
        ("stage", [kind, rest @ ..]) => ConsoleCommand::Stage(parse_stage(kind, rest)?),
        ("stage", []) => bail!("stage needs something to stage"),
        ("clear", []) => ConsoleCommand::Clear,
        ("go", []) => ConsoleCommand::GoLive,
        ("standby", []) => ConsoleCommand::Standby,
        ("next", []) => ConsoleCommand::Next,
        ("prev", []) => ConsoleCommand::Prev,
        ("pause", []) => ConsoleCommand::Pause,
        ("resume", []) => ConsoleCommand::Resume,
        ("stop", []) => ConsoleCommand::Stop,
        ("add", files) if !files.is_empty() => ConsoleCommand::Add(paths(files)),
        ("remove", [file]) => ConsoleCommand::Remove(PathBuf::from(file)),
        ("move", [from, to]) => ConsoleCommand::Move {
            from: parse_position(from)?,
            to: parse_position(to)?,
        },
        ("select", [n]) => ConsoleCommand::Select(parse_position(n)?),
        ("snext", []) => ConsoleCommand::StagedNext,
        ("sprev", []) => ConsoleCommand::StagedPrev,
        ("queue", rest) => parse_queue(rest)?,
        ("transition", [name]) => ConsoleCommand::Transition(name.parse().map_err(|e: String| anyhow!(e))?),
        ("save", []) => ConsoleCommand::Save(None),
        ("save", name) => ConsoleCommand::Save(Some(name.join(" "))),
        ("verse", ["next"]) => ConsoleCommand::Verse(Direction::Forward),
        ("verse", ["prev"]) => ConsoleCommand::Verse(Direction::Backward),
        ("translation", [id]) => ConsoleCommand::Translation(id.to_string()),
        ("compare", ["off"]) => ConsoleCommand::Compare(None),
        ("compare", [id]) => ConsoleCommand::Compare(Some(id.to_string())),
        ("preview", ["at", t, d]) => ConsoleCommand::PreviewAt {
            current_time: parse_seconds(t)?,
            duration: parse_seconds(d)?,
        },
        ("preview", rest) => ConsoleCommand::Preview(parse_transport(rest)?),
        ("live", rest) => ConsoleCommand::Live(parse_transport(rest)?),
        ("report", [channel, condition, times @ ..]) if times.len() <= 2 => ConsoleCommand::Report {
            channel: parse_channel(channel)?,
            condition: parse_condition(condition)?,
            current_time: times.first().map(|t| parse_seconds(t)).transpose()?.unwrap_or(0.0),
            duration: times.get(1).map(|d| parse_seconds(d)).transpose()?.unwrap_or(0.0),
        },
        ("error", [file]) => ConsoleCommand::LoadError(PathBuf::from(file)),
        ("check", files) if !files.is_empty() => ConsoleCommand::Check(paths(files)),
        ("status", []) => ConsoleCommand::Status,
        ("help" | "?", []) => ConsoleCommand::Help,
        ("quit" | "exit", []) => ConsoleCommand::Quit,
        (other, _) => bail!("Unknown or malformed command '{}' (try 'help')", other),
    };
    Ok(command)
}

fn parse_stage(kind: &str, rest: &[&str]) -> Result<StageTarget> {
    let target = match (kind.to_ascii_lowercase().as_str(), rest) {
        ("show", files) if !files.is_empty() => StageTarget::Show(paths(files)),
        ("verse", words) if !words.is_empty() => StageTarget::Verse(words.join(" ")),
        ("announce", words) if !words.is_empty() => {
            let text = words.join(" ");
            let (title, body) = text.split_once('|').unwrap_or((text.as_str(), ""));
            StageTarget::Announcement {
                title: title.trim().to_string(),
                body: body.trim().to_string(),
            }
        }
        ("countdown", [minutes, label @ ..]) => StageTarget::Countdown {
            minutes: minutes
                .parse()
                .with_context(|| format!("'{}' is not a number of minutes", minutes))?,
            label: (!label.is_empty()).then(|| label.join(" ")),
        },
        ("preset", words) if !words.is_empty() => StageTarget::Preset(words.join(" ")),
        (_, []) => StageTarget::Media(PathBuf::from(kind)),
        (other, _) => bail!("Cannot stage '{}'", other),
    };
    Ok(target)
}

fn parse_queue(rest: &[&str]) -> Result<ConsoleCommand> {
    let mut interval_secs = None;
    let mut looping = None;
    for word in rest {
        match *word {
            "loop" => looping = Some(true),
            "once" => looping = Some(false),
            n => {
                interval_secs = Some(
                    n.parse()
                        .with_context(|| format!("'{}' is not a number of seconds", n))?,
                )
            }
        }
    }
    Ok(ConsoleCommand::Queue { interval_secs, looping })
}

fn parse_transport(args: &[&str]) -> Result<TransportCommand> {
    match args {
        ["play"] => Ok(TransportCommand::Play),
        ["pause"] => Ok(TransportCommand::Pause),
        ["restart"] => Ok(TransportCommand::Restart),
        ["stop"] => Ok(TransportCommand::Stop),
        ["seek", t] => Ok(TransportCommand::Seek(parse_seconds(t)?)),
        _ => bail!("Expected play, pause, restart, stop or seek <secs>"),
    }
}

fn parse_channel(word: &str) -> Result<MediaChannel> {
    match word {
        "video" => Ok(MediaChannel::Video),
        "audio" => Ok(MediaChannel::Audio),
        other => bail!("Unknown media channel '{}'", other),
    }
}

fn parse_condition(word: &str) -> Result<PlaybackCondition> {
    match word {
        "playing" => Ok(PlaybackCondition::Playing),
        "paused" => Ok(PlaybackCondition::Paused),
        "ended" => Ok(PlaybackCondition::Ended),
        "stopped" => Ok(PlaybackCondition::Stopped),
        other => bail!("Unknown playback condition '{}'", other),
    }
}

fn parse_seconds(word: &str) -> Result<f64> {
    let secs: f64 = word
        .parse()
        .with_context(|| format!("'{}' is not a time in seconds", word))?;
    if !secs.is_finite() || secs < 0.0 {
        bail!("Time must be a non-negative number of seconds");
    }
    Ok(secs)
}

/// Positions are typed 1-based
fn parse_position(word: &str) -> Result<usize> {
    match word.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => bail!("'{}' is not a queue position (1, 2, ...)", word),
    }
}

fn paths(words: &[&str]) -> Vec<PathBuf> {
    words.iter().map(PathBuf::from).collect()
}

fn queue_entry(path: &Path) -> Result<QueueEntry> {
    match MediaKind::from_path(path) {
        Some(MediaKind::Image) => Ok(QueueEntry::image(path)),
        Some(MediaKind::Video) => Ok(QueueEntry::video(path)),
        Some(MediaKind::Audio) => bail!("Audio cannot go in a slideshow: {}", path.display()),
        None => bail!("Unrecognised media type: {}", path.display()),
    }
}

/// Controller defaults drawn from the settings file
pub fn controller_settings(config: &Config) -> ControllerSettings {
    ControllerSettings {
        standby_image: config.display.standby_image.clone(),
        slideshow: config.slideshow.settings(),
        translation: config.scripture.translation.clone(),
        compare_translation: config.scripture.compare_translation.clone(),
        scripture_style: config.scripture.style(),
        snap_tolerance_secs: config.sync.snap_tolerance_secs,
    }
}

/// The one running slideshow interval
#[derive(Debug, Clone, Copy, PartialEq)]
struct SlideTimer {
    token: TimerToken,
    period: Duration,
    next: Instant,
}

/// Prints effects and owns the slideshow timer they arm
#[derive(Debug, Default)]
struct ConsoleSurface {
    timer: Option<SlideTimer>,
    json_only: bool,
    output: Vec<String>,
}

impl ConsoleSurface {
    fn say(&mut self, message: impl Into<String>) {
        if !self.json_only {
            self.output.push(message.into());
        }
    }
}

impl OutputSurface for ConsoleSurface {
    fn apply(&mut self, effect: &Effect) {
        match effect {
            Effect::StartTimer { token, interval_ms } => {
                let period = Duration::from_millis(*interval_ms);
                self.timer = Some(SlideTimer {
                    token: *token,
                    period,
                    next: Instant::now() + period,
                });
                log::debug!("Timer {} armed every {}ms", token, interval_ms);
            }
            Effect::ClearTimer { token } => {
                if self.timer.is_some_and(|t| t.token == *token) {
                    self.timer = None;
                    log::debug!("Timer {} cleared", token);
                }
            }
            _ => {}
        }

        match serde_json::to_string(effect) {
            Ok(json) if self.json_only => self.output.push(json),
            Ok(json) if effect.is_publish() => {
                self.output.push(format!("{} {}", style("LIVE").red().bold(), json))
            }
            Ok(json) => self.output.push(format!("{} {}", style("  ->").dim(), json)),
            Err(e) => log::warn!("Cannot print effect {:?}: {}", effect, e),
        }
    }
}

/// Console state: the controller, its output surface and the preset store
pub struct Console<P: ScriptureProvider> {
    controller: Controller<P>,
    surface: ConsoleSurface,
    presets: PresetStore,
}

impl<P: ScriptureProvider> Console<P> {
    pub fn new(controller: Controller<P>, presets: PresetStore, json_only: bool) -> Self {
        Self {
            controller,
            surface: ConsoleSurface {
                json_only,
                ..ConsoleSurface::default()
            },
            presets,
        }
    }

    /// Handles one input line; returns false when the operator quits
    pub fn handle_line(&mut self, line: &str) -> bool {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return true;
        }

        match parse_command(line).and_then(|command| self.execute(command)) {
            Ok(keep_running) => keep_running,
            Err(e) => {
                self.surface.output.push(format!("{} {:#}", style("✗").red().bold(), e));
                true
            }
        }
    }

    /// Delivers a timer tick, keeping the interval running
    pub fn tick(&mut self, token: TimerToken) {
        if let Some(timer) = self.surface.timer.as_mut() {
            if timer.token == token {
                timer.next += timer.period;
            }
        }
        match self.controller.timer_tick(token) {
            Ok(effects) => dispatch(&mut self.surface, &effects),
            Err(e) => log::warn!("Timer tick {} refused: {}", token, e),
        }
    }

    /// Takes the lines printed since the last call
    pub fn take_output(&mut self) -> Vec<String> {
        std::mem::take(&mut self.surface.output)
    }

    fn armed_timer(&self) -> Option<SlideTimer> {
        self.surface.timer
    }

    pub fn controller(&self) -> &Controller<P> {
        &self.controller
    }

    fn execute(&mut self, command: ConsoleCommand) -> Result<bool> {
        let effects = match command {
            ConsoleCommand::Stage(target) => self.stage(target)?,
            ConsoleCommand::Clear => self.controller.clear_staged()?,
            ConsoleCommand::GoLive => self.controller.go_live()?,
            ConsoleCommand::Standby => self.controller.standby()?,
            ConsoleCommand::Next => self.controller.slideshow_next()?,
            ConsoleCommand::Prev => self.controller.slideshow_prev()?,
            ConsoleCommand::Pause => self.controller.pause_slideshow()?,
            ConsoleCommand::Resume => self.controller.resume_slideshow()?,
            ConsoleCommand::Stop => self.controller.stop_slideshow()?,
            ConsoleCommand::Add(files) => {
                let entries = files.iter().map(|p| queue_entry(p)).collect::<Result<Vec<_>>>()?;
                self.controller.add_to_slideshow(entries)?
            }
            ConsoleCommand::Remove(file) => self.controller.remove_from_slideshow(&EntryKey::for_path(&file))?,
            ConsoleCommand::Move { from, to } => self.controller.move_entry(from, to)?,
            ConsoleCommand::Select(index) => self.controller.select_entry(index)?,
            ConsoleCommand::StagedNext => self.controller.staged_next()?,
            ConsoleCommand::StagedPrev => self.controller.staged_prev()?,
            ConsoleCommand::Queue { interval_secs, looping } => {
                let mut settings = self
                    .staged_show()
                    .map(Slideshow::settings)
                    .unwrap_or(self.controller.settings().slideshow);
                if let Some(secs) = interval_secs {
                    settings.interval_ms = secs
                        .checked_mul(1000)
                        .ok_or_else(|| anyhow!("{} seconds is too long a slide interval", secs))?;
                }
                if let Some(looping) = looping {
                    settings.looping = looping;
                }
                if !self.controller.has_queued_changes(&settings) {
                    self.surface.say("Nothing to queue");
                    return Ok(true);
                }
                self.controller.queue_slideshow(settings)?
            }
            ConsoleCommand::Transition(style) => self.controller.select_transition(style)?,
            ConsoleCommand::Save(name) => {
                self.save_preset(name)?;
                Vec::new()
            }
            ConsoleCommand::Verse(direction) => match self.controller.navigate_scripture(direction)? {
                ScriptureStep::Moved(effects) => effects,
                ScriptureStep::Beginning => {
                    self.surface.say("Already at the beginning of the Bible");
                    Vec::new()
                }
                ScriptureStep::End => {
                    self.surface.say("Already at the end of the Bible");
                    Vec::new()
                }
            },
            ConsoleCommand::Translation(id) => self.controller.set_translation(&id)?,
            ConsoleCommand::Compare(id) => self.controller.set_compare_translation(id.as_deref())?,
            ConsoleCommand::Preview(command) => self.controller.preview_transport(command)?,
            ConsoleCommand::PreviewAt { current_time, duration } => {
                self.controller.preview_progress(current_time, duration)?
            }
            ConsoleCommand::Live(command) => self.controller.live_transport(command)?,
            ConsoleCommand::Report {
                channel,
                condition,
                current_time,
                duration,
            } => {
                let live = self.controller.live();
                let path = match channel {
                    MediaChannel::Video => live.video_path(),
                    MediaChannel::Audio => live.audio_path(),
                }
                .map(Path::to_path_buf)
                .ok_or_else(|| anyhow!("Nothing live plays {:?}", channel))?;
                let report = TransportReport::new(channel, path, condition).at(current_time, duration);
                self.controller.report_transport(&report)?
            }
            ConsoleCommand::LoadError(file) => self.controller.asset_load_error(&file)?,
            ConsoleCommand::Check(files) => {
                let missing = self.controller.validate_assets(&files);
                if missing.is_empty() {
                    self.surface.say(format!("{} All {} file(s) found", style("✓").green().bold(), files.len()));
                }
                for path in missing {
                    self.surface.say(format!("{} Missing {}", style("✗").red().bold(), path.display()));
                }
                Vec::new()
            }
            ConsoleCommand::Status => {
                let status = self.status();
                self.surface.say(status);
                Vec::new()
            }
            ConsoleCommand::Help => {
                self.surface.say(HELP);
                Vec::new()
            }
            ConsoleCommand::Quit => return Ok(false),
        };

        dispatch(&mut self.surface, &effects);
        Ok(true)
    }

    fn stage(&mut self, target: StageTarget) -> Result<Vec<Effect>> {
        let item = match target {
            StageTarget::Verse(reference) => return Ok(self.controller.stage_scripture(&reference)?),
            StageTarget::Media(path) => match MediaKind::from_path(&path) {
                Some(MediaKind::Image) => ContentItem::image(path),
                Some(MediaKind::Video) => ContentItem::video(path),
                Some(MediaKind::Audio) => ContentItem::audio(path),
                None => bail!("Unrecognised media type: {}", path.display()),
            },
            StageTarget::Show(files) => {
                let entries = files.iter().map(|p| queue_entry(p)).collect::<Result<Vec<_>>>()?;
                ContentItem::Slideshow(Slideshow::new(
                    SlideshowId::generate(),
                    entries,
                    self.controller.settings().slideshow,
                ))
            }
            StageTarget::Announcement { title, body } => {
                ContentItem::QuickSlide(QuickSlide::announcement(quick_slide_id(), &title, &body))
            }
            StageTarget::Countdown { minutes, label } => {
                let now = Timestamp::now().as_millis();
                let minutes = i64::try_from(minutes).unwrap_or(i64::MAX / 60_000);
                let end = Timestamp::from_millis(now.saturating_add(minutes.saturating_mul(60_000)));
                ContentItem::QuickSlide(QuickSlide::countdown(quick_slide_id(), end, label))
            }
            StageTarget::Preset(key) => {
                let preset = self
                    .presets
                    .list()
                    .iter()
                    .find(|p| p.id == key || p.name.eq_ignore_ascii_case(&key))
                    .cloned()
                    .ok_or_else(|| anyhow!("No preset named '{}'", key))?;
                let effects = self.controller.stage(ContentItem::Slideshow(preset.to_slideshow()))?;
                self.presets.set_active(Some(&preset.id))?;
                return Ok(effects);
            }
        };
        Ok(self.controller.stage(item)?)
    }

    fn staged_show(&self) -> Option<&Slideshow> {
        self.controller.staged().and_then(ContentItem::as_slideshow)
    }

    fn save_preset(&mut self, name: Option<String>) -> Result<()> {
        let show = self
            .staged_show()
            .ok_or_else(|| anyhow!("Stage a slideshow before saving it"))?;
        let name = name
            .or_else(|| self.presets.get(show.id.as_str()).map(|p| p.name.clone()))
            .unwrap_or_else(|| self.presets.default_name());
        let preset = SlideshowPreset::from_slideshow(name, show);
        let id = preset.id.clone();
        let name = preset.name.clone();

        self.presets.save(preset)?;
        self.presets.set_active(Some(&id))?;
        self.surface.say(format!("{} Saved preset '{}'", style("✓").green().bold(), name));
        Ok(())
    }

    fn status(&self) -> String {
        let describe = |item: &ContentItem| match item.as_slideshow() {
            Some(show) => format!(
                "slideshow {}/{} ({} after pending edits)",
                show.index + 1,
                show.len(),
                show.effective_len()
            ),
            None => format!("{} {}", item.kind(), item.display_name()),
        };
        let staged = self
            .controller
            .staged()
            .map(describe)
            .unwrap_or_else(|| "(empty)".to_string());

        let broken = self.controller.broken_assets();
        let broken = if broken.is_empty() {
            String::new()
        } else {
            format!("\nBroken:  {} file(s)", broken.len())
        };

        format!(
            "Preview: {}\nLive:    {}\nSynced:  {}  Player: {:?}  Timer: {}{}",
            staged,
            describe(self.controller.live()),
            self.controller.is_synced(),
            self.controller.player_state(),
            self.surface
                .timer
                .map(|t| t.token.to_string())
                .unwrap_or_else(|| "off".to_string()),
            broken,
        )
    }
}

fn quick_slide_id() -> String {
    format!("quick_{}", Timestamp::now().as_millis())
}

enum ConsoleEvent {
    Line(String),
    Tick(TimerToken),
    Closed,
}

async fn next_event(lines: &mut mpsc::UnboundedReceiver<String>, timer: Option<SlideTimer>) -> ConsoleEvent {
    match timer {
        Some(timer) => tokio::select! {
            line = lines.recv() => line.map_or(ConsoleEvent::Closed, ConsoleEvent::Line),
            _ = tokio::time::sleep_until(timer.next) => ConsoleEvent::Tick(timer.token),
        },
        None => lines.recv().await.map_or(ConsoleEvent::Closed, ConsoleEvent::Line),
    }
}

/// Runs the console until stdin closes or the operator quits
///
/// Controller calls happen between `block_on` calls, outside the runtime,
/// because scripture lookups use a blocking HTTP client.
pub fn run(config: &Config, manager: &ConfigManager, json_only: bool) -> Result<()> {
    let provider = HelloAoProvider::with_base_url(config.scripture.provider_url.as_str());
    let presets = manager.presets().context("Failed to open preset store")?;
    let controller = Controller::new(provider, controller_settings(config));
    let mut console = Console::new(controller, presets, json_only);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("Failed to start runtime")?;

    let (tx, mut rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        }
    });

    if !json_only {
        println!("{}", style("Stagecast console").bold().cyan());
        println!("{}", "=".repeat(80));
        println!("Type 'help' for commands, 'quit' to exit.\n");
    }

    loop {
        let event = runtime.block_on(next_event(&mut rx, console.armed_timer()));
        let keep_running = match event {
            ConsoleEvent::Line(line) => console.handle_line(&line),
            ConsoleEvent::Tick(token) => {
                console.tick(token);
                true
            }
            ConsoleEvent::Closed => false,
        };

        for line in console.take_output() {
            println!("{}", line);
        }
        if !keep_running {
            break;
        }
    }

    log::info!("Console closed, live: {}", console.controller().live().kind());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use stagecast_controller::PlayerState;
    use stagecast_core::SlideshowSettings;
    use stagecast_scripture::MemoryProvider;
    use tempfile::TempDir;

    fn console() -> (TempDir, Console<MemoryProvider>) {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let presets = PresetStore::open(dir.path().join("presets.json")).expect("Failed to open presets");
        let provider = MemoryProvider::new().with_chapter(
            "eng_kjv",
            "GEN",
            1,
            &[(1, "In the beginning God created the heaven and the earth."), (2, "And the earth was without form")],
        );
        let controller = Controller::new(provider, ControllerSettings::default());
        (dir, Console::new(controller, presets, true))
    }

    fn effects_printed(console: &mut Console<MemoryProvider>) -> Vec<serde_json::Value> {
        console
            .take_output()
            .iter()
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect()
    }

    #[test]
    fn test_parse_stage_targets() {
        assert_eq!(
            parse_command("stage /m/a.jpg").expect("valid"),
            ConsoleCommand::Stage(StageTarget::Media(PathBuf::from("/m/a.jpg")))
        );
        assert_eq!(
            parse_command("stage verse 1 Cor 13:4").expect("valid"),
            ConsoleCommand::Stage(StageTarget::Verse("1 Cor 13:4".to_string()))
        );
        assert_eq!(
            parse_command("stage announce Potluck | Sunday after service").expect("valid"),
            ConsoleCommand::Stage(StageTarget::Announcement {
                title: "Potluck".to_string(),
                body: "Sunday after service".to_string(),
            })
        );
        assert_eq!(
            parse_command("stage countdown 5 Service starts").expect("valid"),
            ConsoleCommand::Stage(StageTarget::Countdown {
                minutes: 5,
                label: Some("Service starts".to_string()),
            })
        );
    }

    #[test]
    fn test_parse_report_and_transport() {
        assert_eq!(
            parse_command("report video playing 12.5 60").expect("valid"),
            ConsoleCommand::Report {
                channel: MediaChannel::Video,
                condition: PlaybackCondition::Playing,
                current_time: 12.5,
                duration: 60.0,
            }
        );
        assert_eq!(
            parse_command("report audio ended").expect("valid"),
            ConsoleCommand::Report {
                channel: MediaChannel::Audio,
                condition: PlaybackCondition::Ended,
                current_time: 0.0,
                duration: 0.0,
            }
        );
        assert_eq!(
            parse_command("preview seek 30").expect("valid"),
            ConsoleCommand::Preview(TransportCommand::Seek(30.0))
        );
        assert_eq!(
            parse_command("move 3 1").expect("valid"),
            ConsoleCommand::Move { from: 2, to: 0 }
        );
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for line in ["", "stage", "move 0 1", "preview seek -3", "report video dancing", "transition wipe", "frobnicate"] {
            assert!(parse_command(line).is_err(), "{} should be rejected", line);
        }
    }

    #[test]
    fn test_go_live_prints_publish() {
        let (_dir, mut console) = console();
        assert!(console.handle_line("stage /m/welcome.png"));
        assert!(console.handle_line("go"));

        let effects = effects_printed(&mut console);
        assert_eq!(effects.len(), 1);
        assert_eq!(effects[0]["effect"], "publish-image");
        assert!(console.controller().is_synced());
    }

    #[test]
    fn test_slideshow_arms_and_clears_timer() {
        let (_dir, mut console) = console();
        console.handle_line("stage show /m/1.jpg /m/2.jpg");
        console.handle_line("go");

        let timer = console.armed_timer().expect("timer armed");
        assert_eq!(console.controller().player_state(), PlayerState::Playing);

        console.tick(timer.token);
        let advanced = console.armed_timer().expect("still armed");
        assert_eq!(advanced.token, timer.token);
        assert_eq!(advanced.next, timer.next + timer.period);
        assert_eq!(console.controller().live().image_path(), Some(Path::new("/m/2.jpg")));

        console.handle_line("stop");
        assert!(console.armed_timer().is_none());
    }

    #[test]
    fn test_errors_do_not_end_the_session() {
        let (_dir, mut console) = console();
        assert!(console.handle_line("next"));
        assert!(console.handle_line("nonsense"));
        assert!(!console.handle_line("quit"));
    }

    #[test]
    fn test_report_uses_live_media_path() {
        let (_dir, mut console) = console();
        console.handle_line("stage /m/clip.mp4");
        console.handle_line("go");
        console.take_output();

        console.handle_line("report video stopped");
        assert!(console.controller().live().is_standby());
    }

    #[test]
    fn test_scripture_navigation_messages() {
        let (_dir, mut console) = {
            let dir = TempDir::new().expect("Failed to create temp dir");
            let presets = PresetStore::open(dir.path().join("presets.json")).expect("Failed to open presets");
            let provider = MemoryProvider::new().with_chapter("eng_kjv", "GEN", 1, &[(1, "In the beginning")]);
            let controller = Controller::new(provider, ControllerSettings::default());
            (dir, Console::new(controller, presets, false))
        };
        console.handle_line("stage verse Genesis 1:1");
        console.take_output();

        console.handle_line("verse prev");
        let output = console.take_output();
        assert!(output.iter().any(|line| line.contains("beginning of the Bible")));
    }

    #[test]
    fn test_save_and_stage_preset() {
        let (_dir, mut console) = console();
        console.handle_line("stage show /m/1.jpg /m/2.mp4");
        console.handle_line("save Sunday");
        assert_eq!(console.presets.len(), 1);
        assert_eq!(console.presets.active().map(|p| p.name.as_str()), Some("Sunday"));

        console.handle_line("clear");
        assert!(console.controller().staged().is_none());

        console.handle_line("stage preset sunday");
        let show = console.staged_show().expect("preset staged");
        assert_eq!(show.len(), 2);
        assert_eq!(show.index, 0);
    }

    #[test]
    fn test_queue_without_changes_is_a_no_op() {
        let (_dir, mut console) = console();
        console.handle_line("stage show /m/1.jpg /m/2.jpg");
        console.take_output();

        console.handle_line("queue");
        assert!(effects_printed(&mut console).is_empty());

        console.handle_line("queue 3 once");
        let show = console.staged_show().expect("still staged");
        assert_eq!(show.interval_ms, 3000);
        assert!(!show.looping);
    }

    #[test]
    fn test_status_counts_broken_files() {
        let (dir, mut console) = console();
        assert!(!console.status().contains("Broken"));

        let missing = dir.path().join("missing.jpg");
        console.handle_line(&format!("check {}", missing.display()));
        assert!(console.controller().is_broken(&missing));
        assert!(console.status().contains("Broken:  1 file(s)"));
    }

    #[test]
    fn test_queue_refuses_out_of_range_interval() {
        let (_dir, mut console) = console();
        console.handle_line("stage show /m/1.jpg /m/2.jpg");
        console.take_output();

        assert!(console.handle_line("queue 0"));
        assert!(console.handle_line(&format!("queue {}", u64::MAX)));
        let output = console.take_output();
        assert_eq!(output.len(), 2);
        assert!(output.iter().all(|line| line.contains('✗')));

        let show = console.staged_show().expect("still staged");
        assert_eq!(show.interval_ms, SlideshowSettings::default().interval_ms);
        assert!(console.armed_timer().is_none());
    }
}
