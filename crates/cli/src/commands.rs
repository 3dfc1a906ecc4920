// FILE: crates/cli/src/commands.rs

use anyhow::{bail, Context, Result};
use clap::ArgMatches;
use console::style;
use stagecast_config::{Config, ConfigManager, SlideshowPreset};
use stagecast_controller::validate_paths;
use stagecast_core::ScripturePassage;
use stagecast_scripture::{HelloAoProvider, Reference, ScriptureNavigator, ScriptureProvider};
use std::path::PathBuf;

/// Write a default config file
pub fn config_init(manager: &ConfigManager) -> Result<()> {
    let created = manager.initialize().context("Failed to write config file")?;
    if created {
        println!(
            "{} Created {}",
            style("✓").green().bold(),
            manager.config_path().display()
        );
    } else {
        println!("Config already exists at {}", manager.config_path().display());
    }
    Ok(())
}

/// Print the effective settings, environment overrides included
pub fn config_show(config: &Config) -> Result<()> {
    let rendered = toml::to_string_pretty(config).context("Failed to render config")?;
    println!("{}", rendered);
    Ok(())
}

pub fn config_validate(manager: &ConfigManager) -> Result<()> {
    let problems = manager.validate().context("Failed to read config file")?;
    if problems.is_empty() {
        println!("{} Config is valid", style("✓").green().bold());
        return Ok(());
    }

    println!("\n{} Problems in {}", style(problems.len()).bold().red(), manager.config_path().display());
    println!("{}", "=".repeat(80));
    for problem in &problems {
        println!("  {}", problem);
    }
    bail!("Config has {} invalid value(s)", problems.len())
}

pub fn config_path(manager: &ConfigManager) -> Result<()> {
    println!("{}", manager.config_path().display());
    Ok(())
}

/// List saved slideshow presets
pub fn list_presets(manager: &ConfigManager) -> Result<()> {
    let store = manager.presets().context("Failed to open preset store")?;

    if store.is_empty() {
        println!("No saved presets. Save a slideshow from the console with 'save'.");
        return Ok(());
    }

    let active_id = store.active().map(|p| p.id.clone());
    println!("\n{} Slideshow Presets", style(store.len()).bold().cyan());
    println!("{}", "=".repeat(80));
    for preset in store.list() {
        let active = active_id.as_deref() == Some(preset.id.as_str());
        println!("{}", preset_summary(preset, active));
    }

    Ok(())
}

pub fn delete_preset(manager: &ConfigManager, matches: &ArgMatches) -> Result<()> {
    let id = matches
        .get_one::<String>("id")
        .ok_or_else(|| anyhow::anyhow!("Preset ID is required"))?;

    let mut store = manager.presets().context("Failed to open preset store")?;
    let removed = store.delete(id).context("Failed to delete preset")?;

    println!("{} Deleted '{}'", style("✓").green().bold(), removed.name);
    Ok(())
}

pub fn rename_preset(manager: &ConfigManager, matches: &ArgMatches) -> Result<()> {
    let id = matches
        .get_one::<String>("id")
        .ok_or_else(|| anyhow::anyhow!("Preset ID is required"))?;
    let name = matches
        .get_one::<String>("name")
        .ok_or_else(|| anyhow::anyhow!("Name is required"))?;

    if name.trim().is_empty() {
        bail!("Preset name cannot be empty");
    }

    let mut store = manager.presets().context("Failed to open preset store")?;
    store.rename(id, name).context("Failed to rename preset")?;

    println!("{} Renamed to '{}'", style("✓").green().bold(), name.trim());
    Ok(())
}

/// Look up one verse against the configured provider
pub fn show_verse(config: &Config, matches: &ArgMatches) -> Result<()> {
    let input = matches
        .get_many::<String>("reference")
        .map(|words| words.map(String::as_str).collect::<Vec<_>>().join(" "))
        .ok_or_else(|| anyhow::anyhow!("Reference is required"))?;
    let translation = matches
        .get_one::<String>("translation")
        .map(String::as_str)
        .unwrap_or(&config.scripture.translation);
    let compare = matches
        .get_one::<String>("compare")
        .map(String::as_str)
        .or(config.scripture.compare_translation.as_deref());

    let provider = HelloAoProvider::with_base_url(config.scripture.provider_url.as_str());
    let passage = lookup_verse(provider, &input, translation, compare, config)?;

    println!("{}", format_passage(&passage));
    Ok(())
}

fn lookup_verse<P: ScriptureProvider>(
    provider: P,
    input: &str,
    translation: &str,
    compare: Option<&str>,
    config: &Config,
) -> Result<ScripturePassage> {
    let reference = Reference::parse(input)?;
    let mut navigator = ScriptureNavigator::new(provider);
    let passage = navigator
        .lookup(&reference, translation, compare, &config.scripture.style())
        .with_context(|| format!("Failed to look up {}", reference))?;
    Ok(passage)
}

/// Check that media files exist
pub fn check_paths(matches: &ArgMatches) -> Result<()> {
    let paths: Vec<PathBuf> = matches
        .get_many::<String>("paths")
        .map(|values| values.map(PathBuf::from).collect())
        .unwrap_or_default();

    let missing = validate_paths(&paths);
    for path in &paths {
        if missing.contains(path) {
            println!("{} {}", style("✗").red().bold(), path.display());
        } else {
            println!("{} {}", style("✓").green().bold(), path.display());
        }
    }

    if !missing.is_empty() {
        bail!("{} of {} file(s) not found", missing.len(), paths.len());
    }
    Ok(())
}

fn preset_summary(preset: &SlideshowPreset, active: bool) -> String {
    let marker = if active { "*" } else { " " };
    format!(
        "{} {}  {}\n    {} entries, {}s per slide, {}, {} transition, updated {}",
        marker,
        preset.id,
        preset.name,
        preset.entries.len(),
        preset.settings.interval_ms as f64 / 1000.0,
        if preset.settings.looping { "looping" } else { "once" },
        preset.settings.transition,
        preset.updated_at.format("%Y-%m-%d %H:%M"),
    )
}

pub(crate) fn format_passage(passage: &ScripturePassage) -> String {
    let mut out = format!("{} ({})\n  {}", passage.reference, passage.version, passage.text);
    if let (Some(text), Some(version)) = (&passage.compare_text, &passage.compare_version) {
        out.push_str(&format!("\n{} ({})\n  {}", passage.reference, version, text));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use stagecast_core::{QueueEntry, SlideshowSettings};
    use stagecast_scripture::MemoryProvider;

    fn provider() -> MemoryProvider {
        MemoryProvider::new()
            .with_chapter("eng_kjv", "JHN", 3, &[(16, "For God so loved the world"), (17, "For God sent not")])
            .with_chapter("eng_bsb", "JHN", 3, &[(16, "For God so loved the world that He gave")])
    }

    #[test]
    fn test_lookup_verse_with_compare() {
        let config = Config::default();
        let passage = lookup_verse(provider(), "jn 3:16", "eng_kjv", Some("eng_bsb"), &config)
            .expect("verse exists");

        let text = format_passage(&passage);
        assert!(text.starts_with("John 3:16"));
        assert!(text.contains("For God so loved the world"));
        assert!(text.contains("that He gave"));
    }

    #[test]
    fn test_lookup_verse_rejects_bad_reference() {
        let config = Config::default();
        assert!(lookup_verse(provider(), "Hezekiah 1:1", "eng_kjv", None, &config).is_err());
    }

    #[test]
    fn test_lookup_verse_missing_compare_is_single() {
        let config = Config::default();
        let passage = lookup_verse(provider(), "John 3:17", "eng_kjv", Some("eng_bsb"), &config)
            .expect("primary verse exists");
        assert!(passage.compare_text.is_none());
    }

    #[test]
    fn test_preset_summary_marks_active() {
        let preset = SlideshowPreset::new(
            "Welcome",
            vec![QueueEntry::image("/m/1.jpg"), QueueEntry::video("/m/2.mp4")],
            SlideshowSettings::default(),
        );
        let line = preset_summary(&preset, true);
        assert!(line.starts_with('*'));
        assert!(line.contains("Welcome"));
        assert!(line.contains("2 entries"));
        assert!(line.contains("7s per slide"));
        assert!(!preset_summary(&preset, false).starts_with('*'));
    }
}
