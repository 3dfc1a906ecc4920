//! Configuration manager - main API for config operations

use crate::persistence::SettingsFile;
use crate::presets::PresetStore;
use crate::{Config, ConfigError, ConfigResult, LogLevel};
use directories::ProjectDirs;
use stagecast_core::TransitionStyle;
use std::path::PathBuf;

const CONFIG_FILE: &str = "config.toml";
const PRESETS_FILE: &str = "presets.json";

/// Main configuration manager
///
/// Handles file paths, defaults, validation and environment overrides.
pub struct ConfigManager {
    settings: SettingsFile,
    config_dir: PathBuf,
}

impl ConfigManager {
    /// Creates a new config manager using the default config directory
    ///
    /// - Linux: `~/.config/stagecast/`
    /// - macOS: `~/Library/Application Support/stagecast/`
    /// - Windows: `%APPDATA%\stagecast\`
    pub fn new() -> ConfigResult<Self> {
        let config_dir = Self::default_config_dir()?;
        Self::with_directory(config_dir)
    }

    /// Creates a config manager with a custom config directory
    pub fn with_directory(config_dir: PathBuf) -> ConfigResult<Self> {
        let settings = SettingsFile::new(config_dir.join(CONFIG_FILE));
        Ok(Self {
            settings,
            config_dir,
        })
    }

    fn default_config_dir() -> ConfigResult<PathBuf> {
        ProjectDirs::from("", "", "stagecast")
            .map(|proj_dirs| proj_dirs.config_dir().to_path_buf())
            .ok_or_else(|| ConfigError::PathResolutionError {
                reason: "Could not determine user config directory".to_string(),
            })
    }

    pub fn config_dir(&self) -> &PathBuf {
        &self.config_dir
    }

    pub fn config_path(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE)
    }

    pub fn presets_path(&self) -> PathBuf {
        self.config_dir.join(PRESETS_FILE)
    }

    /// Opens the slideshow preset store kept beside the config file
    pub fn presets(&self) -> ConfigResult<PresetStore> {
        PresetStore::open(self.presets_path())
    }

    /// Loads the configuration from file
    ///
    /// A missing file yields defaults; an empty or unparsable one is an error.
    pub fn load(&self) -> ConfigResult<Config> {
        self.settings.load()
    }

    /// Loads the configuration, falling back to defaults on any error
    pub fn load_or_default(&self) -> Config {
        match self.load() {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Failed to load config: {}, using defaults", e);
                Config::default()
            }
        }
    }

    /// Validates and saves the configuration atomically
    pub fn save(&self, config: &Config) -> ConfigResult<()> {
        self.settings.save(config)
    }

    /// Loads, applies `update_fn` and saves
    ///
    /// ```rust,no_run
    /// # use stagecast_config::ConfigManager;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let manager = ConfigManager::new()?;
    /// manager.update(|config| {
    ///     config.slideshow.default_interval_ms = 5000;
    /// })?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn update<F>(&self, update_fn: F) -> ConfigResult<()>
    where
        F: FnOnce(&mut Config),
    {
        let mut config = self.load()?;
        update_fn(&mut config);
        self.save(&config)
    }

    /// Writes a default config file if none exists
    ///
    /// Returns Ok(true) if a new file was created.
    pub fn initialize(&self) -> ConfigResult<bool> {
        if self.config_path().exists() {
            log::info!(
                "Config file already exists at {}",
                self.config_path().display()
            );
            return Ok(false);
        }

        self.save(&Config::default())?;
        log::info!("Generated default config at {}", self.config_path().display());
        Ok(true)
    }

    /// Overwrites the config file with defaults
    pub fn reset(&self) -> ConfigResult<()> {
        self.save(&Config::default())
    }

    /// Validates the current configuration file, returning every problem found
    pub fn validate(&self) -> ConfigResult<Vec<String>> {
        let config = self.load()?;

        match config.validate() {
            Ok(()) => Ok(Vec::new()),
            Err(errors) => Ok(errors.iter().map(|e| e.to_string()).collect()),
        }
    }

    /// Loads the config and applies `STAGECAST_SECTION_FIELD` environment
    /// overrides on top
    ///
    /// Unparsable values are logged and ignored.
    pub fn load_with_env_overrides(&self) -> ConfigResult<Config> {
        let mut config = self.load()?;
        apply_env_overrides(&mut config, |key| std::env::var(key).ok());

        if let Err(errors) = config.validate() {
            log::warn!(
                "Config validation warnings after env overrides: {:?}",
                errors
            );
        }
        Ok(config)
    }
}

fn parse_override<T: std::str::FromStr>(key: &str, raw: &str) -> Option<T> {
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            log::warn!("Ignoring {}: cannot parse '{}'", key, raw);
            None
        }
    }
}

fn apply_env_overrides(config: &mut Config, var: impl Fn(&str) -> Option<String>) {
    if let Some(level) = var("STAGECAST_APP_LOG_LEVEL")
        .and_then(|raw| parse_override::<LogLevel>("STAGECAST_APP_LOG_LEVEL", &raw))
    {
        config.app.log_level = level;
    }

    if let Some(path) = var("STAGECAST_DISPLAY_STANDBY_IMAGE") {
        config.display.standby_image = Some(PathBuf::from(path));
    }

    if let Some(interval) = var("STAGECAST_SLIDESHOW_DEFAULT_INTERVAL_MS")
        .and_then(|raw| parse_override::<u64>("STAGECAST_SLIDESHOW_DEFAULT_INTERVAL_MS", &raw))
    {
        config.slideshow.default_interval_ms = interval;
    }

    if let Some(transition) = var("STAGECAST_SLIDESHOW_DEFAULT_TRANSITION")
        .and_then(|raw| parse_override::<TransitionStyle>("STAGECAST_SLIDESHOW_DEFAULT_TRANSITION", &raw))
    {
        config.slideshow.default_transition = transition;
    }

    if let Some(translation) = var("STAGECAST_SCRIPTURE_TRANSLATION") {
        config.scripture.translation = translation;
    }

    if let Some(url) = var("STAGECAST_SCRIPTURE_PROVIDER_URL") {
        config.scripture.provider_url = url;
    }

    if let Some(tolerance) = var("STAGECAST_SYNC_SNAP_TOLERANCE_SECS")
        .and_then(|raw| parse_override::<f64>("STAGECAST_SYNC_SNAP_TOLERANCE_SECS", &raw))
    {
        config.sync.snap_tolerance_secs = tolerance;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn setup_test_manager() -> (TempDir, ConfigManager) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let manager = ConfigManager::with_directory(temp_dir.path().to_path_buf())
            .expect("Failed to create manager");
        (temp_dir, manager)
    }

    #[test]
    fn test_load_or_default_with_missing_file() {
        let (_temp_dir, manager) = setup_test_manager();
        assert_eq!(manager.load_or_default(), Config::default());
    }

    #[test]
    fn test_update() {
        let (_temp_dir, manager) = setup_test_manager();
        manager.save(&Config::default()).expect("Should save");

        manager
            .update(|config| config.slideshow.default_loop = false)
            .expect("Should update");

        let loaded = manager.load().expect("Should load");
        assert!(!loaded.slideshow.default_loop);
    }

    #[test]
    fn test_initialize_once() {
        let (_temp_dir, manager) = setup_test_manager();
        assert!(manager.initialize().expect("Should initialize"));
        assert!(manager.config_path().exists());
        assert!(!manager.initialize().expect("Should initialize"));
    }

    #[test]
    fn test_reset() {
        let (_temp_dir, manager) = setup_test_manager();
        let mut config = Config::default();
        config.scripture.font_size = 72;
        manager.save(&config).expect("Should save");

        manager.reset().expect("Should reset");
        assert_eq!(manager.load().expect("Should load"), Config::default());
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("STAGECAST_APP_LOG_LEVEL", "debug"),
            ("STAGECAST_SLIDESHOW_DEFAULT_INTERVAL_MS", "3000"),
            ("STAGECAST_SLIDESHOW_DEFAULT_TRANSITION", "slide"),
            ("STAGECAST_SYNC_SNAP_TOLERANCE_SECS", "not-a-number"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        apply_env_overrides(&mut config, |key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.app.log_level, LogLevel::Debug);
        assert_eq!(config.slideshow.default_interval_ms, 3000);
        assert_eq!(config.slideshow.default_transition, TransitionStyle::Slide);
        assert_eq!(config.sync.snap_tolerance_secs, 0.5);
    }

    #[test]
    fn test_paths() {
        let (_temp_dir, manager) = setup_test_manager();
        assert!(manager.config_path().ends_with("config.toml"));
        assert!(manager.presets_path().ends_with("presets.json"));
        assert!(manager.presets().expect("Should open").is_empty());
    }
}
