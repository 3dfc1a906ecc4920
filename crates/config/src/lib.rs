//! Stagecast configuration
//!
//! Settings live in `config.toml` under the platform config directory, one
//! section per concern. Each section implements `ConfigSection`, so it
//! validates and merges itself. Slideshow presets live beside it in
//! `presets.json`.
//!
//! - **Graceful degradation**: invalid values on load only warn
//! - **Atomic writes**: files are never left half-written
//!
//! ```rust,no_run
//! use stagecast_config::{Config, ConfigManager};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = ConfigManager::new()?;
//! let config = manager.load().unwrap_or_else(|e| {
//!     eprintln!("Config error: {}, using defaults", e);
//!     Config::default()
//! });
//! println!("Translation: {}", config.scripture.translation);
//! # Ok(())
//! # }
//! ```

mod error;
mod manager;
mod persistence;
mod validation;

pub mod presets;

// Config sections
mod app_config;
mod display_config;
mod scripture_config;
mod slideshow_config;
mod sync_config;

pub use error::{ConfigError, ConfigResult, ValidationError};
pub use manager::ConfigManager;
pub use presets::{PresetStore, SlideshowPreset, MAX_PRESETS};
pub use validation::{ConfigSection, Validator};

pub use app_config::{AppConfig, LogLevel};
pub use display_config::{DisplayConfig, ScalingMode};
pub use scripture_config::ScriptureConfig;
pub use slideshow_config::SlideshowConfig;
pub use sync_config::SyncConfig;

use serde::{Deserialize, Serialize};

/// Current config file format version
pub const CONFIG_VERSION: u32 = 1;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Config file format version
    pub version: u32,

    pub app: AppConfig,

    /// Output display settings
    pub display: DisplayConfig,

    /// Defaults for new slideshows
    pub slideshow: SlideshowConfig,

    /// Translations and scripture styling
    pub scripture: ScriptureConfig,

    /// Preview/live transport sync
    pub sync: SyncConfig,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates the entire configuration
    ///
    /// Returns all validation errors found across all sections.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        collect(&self.app, &mut errors);
        collect(&self.display, &mut errors);
        collect(&self.slideshow, &mut errors);
        collect(&self.scripture, &mut errors);
        collect(&self.sync, &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Merges this config with another, preferring values from `other`
    pub fn merge(&mut self, other: Config) {
        self.app.merge(other.app);
        self.display.merge(other.display);
        self.slideshow.merge(other.slideshow);
        self.scripture.merge(other.scripture);
        self.sync.merge(other.sync);
    }
}

fn collect<S: ConfigSection>(section: &S, errors: &mut Vec<ValidationError>) {
    if let Err(mut found) = section.validate() {
        log::debug!("[{}] has {} invalid value(s)", section.section_name(), found.len());
        errors.append(&mut found);
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            app: AppConfig::default(),
            display: DisplayConfig::default(),
            slideshow: SlideshowConfig::default(),
            scripture: ScriptureConfig::default(),
            sync: SyncConfig::default(),
        }
    }
}
