//! Configuration and preset store errors

use stagecast_core::AppError;
use std::path::PathBuf;
use thiserror::Error;

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Cannot write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A blank settings file is treated as damaged rather than as defaults
    #[error("{} is empty", .0.display())]
    EmptyFile(PathBuf),

    #[error("{path} is not valid TOML: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Cannot render settings as TOML: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("{path} is not a valid preset file: {source}")]
    PresetFormat {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// One or more settings are out of range; nothing was written
    #[error("Invalid settings: {0}")]
    ValidationError(String),

    #[error("At most {limit} slideshow presets can be saved")]
    CapacityExceeded { limit: usize },

    #[error("No preset with id {0}")]
    PresetNotFound(String),

    #[error("Cannot create {path}: {source}")]
    DirectoryCreationError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("No config directory: {reason}")]
    PathResolutionError { reason: String },

    #[error("Cannot back up previous settings: {source}")]
    BackupError { source: std::io::Error },

    #[error(transparent)]
    IoError(#[from] std::io::Error),
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        let message = err.to_string();
        match err {
            ConfigError::CapacityExceeded { limit } => AppError::CapacityExceeded {
                what: "slideshow presets".to_string(),
                limit,
            },
            ConfigError::EmptyFile(path)
            | ConfigError::ParseError { path, .. }
            | ConfigError::PresetFormat { path, .. } => AppError::ConfigurationCorrupted { path },
            ConfigError::ValidationError(reason) => AppError::InvalidConfiguration {
                setting: "settings".to_string(),
                value: String::new(),
                reason,
            },
            ConfigError::ReadError { source, .. }
            | ConfigError::WriteError { source, .. }
            | ConfigError::DirectoryCreationError { source, .. }
            | ConfigError::BackupError { source }
            | ConfigError::IoError(source) => AppError::IoError { message, source },
            ConfigError::SerializeError(_)
            | ConfigError::PresetNotFound(_)
            | ConfigError::PathResolutionError { .. } => AppError::InternalError { message },
        }
    }
}

/// Validation error for a specific config field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Path to the field (e.g., "slideshow.default_interval_ms")
    pub field: String,

    /// Human-readable error message
    pub message: String,

    /// The invalid value, if available
    pub value: Option<String>,
}

impl ValidationError {
    /// Creates a new validation error
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            value: None,
        }
    }

    /// Creates a validation error with the invalid value
    pub fn with_value(
        field: impl Into<String>,
        message: impl Into<String>,
        value: impl ToString,
    ) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            value: Some(value.to_string()),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Field '{}': {}", self.field, self.message)?;
        if let Some(ref value) = self.value {
            write!(f, " (got: {})", value)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}
