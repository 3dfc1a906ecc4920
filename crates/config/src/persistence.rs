//! Settings file on disk
//!
//! Writes go to a temporary file beside the target and are renamed into
//! place, so readers see either the old file or the new one.

use crate::{Config, ConfigError, ConfigResult, ValidationError, CONFIG_VERSION};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// The `config.toml` a [`crate::ConfigManager`] reads and writes
pub(crate) struct SettingsFile {
    path: PathBuf,
}

impl SettingsFile {
    pub(crate) fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Reads the settings; a missing file means defaults
    ///
    /// Blank and unparsable files are errors. Out-of-range values are only
    /// logged so they can still be corrected by hand.
    pub(crate) fn load(&self) -> ConfigResult<Config> {
        let Some(text) = self.read()? else {
            log::info!("No settings at {}, using defaults", self.path.display());
            return Ok(Config::default());
        };

        let config: Config = toml::from_str(&text).map_err(|source| ConfigError::ParseError {
            path: self.path.clone(),
            source,
        })?;

        if config.version > CONFIG_VERSION {
            log::warn!(
                "{} was written by a newer version (format {} > {})",
                self.path.display(),
                config.version,
                CONFIG_VERSION
            );
        }
        if let Err(errors) = config.validate() {
            log::warn!("Invalid settings in {}: {}", self.path.display(), summarize(&errors));
        }
        Ok(config)
    }

    /// Validates, keeps a `.toml.backup` of the previous file, and writes
    pub(crate) fn save(&self, config: &Config) -> ConfigResult<()> {
        config
            .validate()
            .map_err(|errors| ConfigError::ValidationError(summarize(&errors)))?;

        let text = toml::to_string_pretty(config)?;
        if self.path.exists() {
            let backup = self.path.with_extension("toml.backup");
            fs::copy(&self.path, &backup).map_err(|source| ConfigError::BackupError { source })?;
            log::debug!("Previous settings kept at {}", backup.display());
        }
        write_atomic(&self.path, &text)?;

        log::info!("Settings saved to {}", self.path.display());
        Ok(())
    }

    fn read(&self) -> ConfigResult<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let text = fs::read_to_string(&self.path).map_err(|source| ConfigError::ReadError {
            path: self.path.clone(),
            source,
        })?;
        if text.trim().is_empty() {
            return Err(ConfigError::EmptyFile(self.path.clone()));
        }
        Ok(Some(text))
    }
}

fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Replaces `path` with `content` via a synced temporary file in the same
/// directory, creating that directory first if needed
pub(crate) fn write_atomic(path: &Path, content: &str) -> ConfigResult<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => {
            return Err(ConfigError::PathResolutionError {
                reason: format!("{} has no parent directory", path.display()),
            })
        }
    };
    if !dir.is_dir() {
        fs::create_dir_all(dir).map_err(|source| ConfigError::DirectoryCreationError {
            path: dir.to_path_buf(),
            source,
        })?;
        log::info!("Created {}", dir.display());
    }

    let mut staging = tempfile::Builder::new()
        .prefix(".stagecast-")
        .suffix(".tmp")
        .tempfile_in(dir)?;
    staging.write_all(content.as_bytes())?;
    staging.as_file().sync_all()?;

    staging.persist(path).map_err(|e| ConfigError::WriteError {
        path: path.to_path_buf(),
        source: e.error,
    })?;
    Ok(())
}
