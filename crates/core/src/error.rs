//! Error taxonomy and recovery strategies for Stagecast
//!
//! Every failure the control surface can report falls into one of a few
//! categories:
//! - **MissingAsset**: a staged or queued file does not resolve on disk
//! - **LookupFailure**: a scripture reference could not be parsed or fetched
//! - **CapacityExceeded**: a fixed limit (saved slideshow presets) was hit
//! - **Configuration** / **Io** / **Internal**: ambient failures of the host
//!
//! Sync divergence is deliberately absent: it is tracked state, not an error.
//! Each error carries a recovery action so the control surface knows whether
//! to skip, keep what is live, or ask the operator.

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Recovery actions that can be taken when an error occurs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryAction {
    /// Retry with exponential backoff (e.g., scripture provider unreachable)
    RetryWithBackoff,
    /// Skip the affected item and carry on (e.g., broken slideshow entry)
    SkipItem,
    /// Leave whatever is live untouched and show a status message
    KeepCurrent,
    /// Reset the affected settings to defaults
    ResetToDefaults,
    /// No automatic recovery - operator intervention required
    UserIntervention,
}

impl fmt::Display for RecoveryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RetryWithBackoff => write!(f, "Retrying with backoff"),
            Self::SkipItem => write!(f, "Skipping item"),
            Self::KeepCurrent => write!(f, "Keeping current output"),
            Self::ResetToDefaults => write!(f, "Resetting to defaults"),
            Self::UserIntervention => write!(f, "User intervention required"),
        }
    }
}

/// Error severity classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Transient; the operation may succeed if repeated
    Recoverable,
    /// Feature degraded but the show goes on
    Degraded,
    /// Requires operator action before continuing
    Fatal,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Recoverable => write!(f, "Recoverable"),
            Self::Degraded => write!(f, "Degraded"),
            Self::Fatal => write!(f, "Fatal"),
        }
    }
}

/// Coarse error category, used to decide how a failure is surfaced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    MissingAsset,
    LookupFailure,
    CapacityExceeded,
    Configuration,
    Io,
    Internal,
}

/// Main error type for Stagecast
#[derive(Error, Debug)]
pub enum AppError {
    // ===== Asset Errors =====
    /// A staged or queued media path does not resolve
    #[error("Missing asset: {path}")]
    MissingAsset { path: PathBuf },

    // ===== Lookup Errors =====
    /// Scripture reference text could not be parsed
    #[error("Invalid reference '{input}': {reason}")]
    InvalidReference { input: String, reason: String },

    /// Provider has no such passage in the requested translation
    #[error("Not found: {reference} ({translation})")]
    PassageNotFound {
        reference: String,
        translation: String,
    },

    /// Provider rejected our credentials
    #[error("Provider '{provider}' rejected the request as unauthorized")]
    ProviderUnauthorized { provider: String },

    /// Network request to a provider failed
    #[error("Network error: {message}")]
    NetworkError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Provider answered with something we could not understand
    #[error("Invalid response from {provider}: {details}")]
    InvalidProviderResponse { provider: String, details: String },

    // ===== Capacity Errors =====
    /// A fixed-size collection is full
    #[error("Capacity exceeded: at most {limit} {what} allowed")]
    CapacityExceeded { what: String, limit: usize },

    // ===== Configuration Errors =====
    /// Invalid configuration value
    #[error("Invalid configuration: {setting} = '{value}' ({reason})")]
    InvalidConfiguration {
        setting: String,
        value: String,
        reason: String,
    },

    /// Settings file could not be parsed
    #[error("Configuration corrupted: {path}")]
    ConfigurationCorrupted { path: PathBuf },

    // ===== I/O Errors =====
    /// General I/O error
    #[error("I/O error: {message}")]
    IoError {
        message: String,
        #[source]
        source: io::Error,
    },

    // ===== Generic Errors =====
    /// A controller operation was rejected; state is unchanged
    #[error("Rejected {operation}: {reason}")]
    Rejected { operation: String, reason: String },

    /// Generic internal error
    #[error("Internal error: {message}")]
    InternalError { message: String },
}

impl AppError {
    /// Returns the category of this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingAsset { .. } => ErrorCategory::MissingAsset,
            Self::InvalidReference { .. }
            | Self::PassageNotFound { .. }
            | Self::ProviderUnauthorized { .. }
            | Self::NetworkError { .. }
            | Self::InvalidProviderResponse { .. } => ErrorCategory::LookupFailure,
            Self::CapacityExceeded { .. } => ErrorCategory::CapacityExceeded,
            Self::InvalidConfiguration { .. } | Self::ConfigurationCorrupted { .. } => {
                ErrorCategory::Configuration
            }
            Self::IoError { .. } => ErrorCategory::Io,
            Self::Rejected { .. } | Self::InternalError { .. } => ErrorCategory::Internal,
        }
    }

    /// Returns the severity level of this error
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NetworkError { .. } => ErrorSeverity::Recoverable,

            Self::MissingAsset { .. }
            | Self::InvalidReference { .. }
            | Self::PassageNotFound { .. }
            | Self::InvalidProviderResponse { .. }
            | Self::CapacityExceeded { .. }
            | Self::Rejected { .. } => ErrorSeverity::Degraded,

            Self::ProviderUnauthorized { .. } | Self::ConfigurationCorrupted { .. } => {
                ErrorSeverity::Fatal
            }

            _ => ErrorSeverity::Degraded,
        }
    }

    /// Returns the recommended recovery action for this error
    pub fn recovery_action(&self) -> RecoveryAction {
        match self {
            Self::NetworkError { .. } => RecoveryAction::RetryWithBackoff,
            Self::MissingAsset { .. } => RecoveryAction::SkipItem,
            Self::InvalidReference { .. }
            | Self::PassageNotFound { .. }
            | Self::InvalidProviderResponse { .. }
            | Self::Rejected { .. } => RecoveryAction::KeepCurrent,
            Self::ConfigurationCorrupted { .. } => RecoveryAction::ResetToDefaults,
            _ => RecoveryAction::UserIntervention,
        }
    }

    /// Returns a short status line suitable for the operator view
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingAsset { path } => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                format!("File not found: {}", name)
            }
            Self::InvalidReference { input, .. } => {
                format!("Could not understand reference \"{}\"", input)
            }
            Self::PassageNotFound {
                reference,
                translation,
            } => format!("{} not found in {}", reference, translation),
            Self::ProviderUnauthorized { .. } => {
                "Scripture service rejected the request. Check your API key.".to_string()
            }
            Self::NetworkError { .. } => {
                "Cannot reach the scripture service. Check your connection.".to_string()
            }
            Self::InvalidProviderResponse { .. } => {
                "Scripture service returned unexpected data.".to_string()
            }
            Self::CapacityExceeded { what, limit } => {
                format!("Maximum of {} {} allowed. Delete one first.", limit, what)
            }
            Self::InvalidConfiguration { setting, .. } => {
                format!("Invalid setting: {}", setting)
            }
            Self::ConfigurationCorrupted { .. } => {
                "Settings are corrupted. Resetting to defaults...".to_string()
            }
            Self::IoError { .. } => "A file operation failed. Please try again.".to_string(),
            Self::Rejected { reason, .. } => reason.clone(),
            Self::InternalError { .. } => "Something went wrong.".to_string(),
        }
    }

    /// Returns true if this error should be surfaced as a lookup status message
    pub fn is_lookup_failure(&self) -> bool {
        self.category() == ErrorCategory::LookupFailure
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        Self::IoError {
            message: err.to_string(),
            source: err,
        }
    }
}

/// Convenience result alias
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        let err = AppError::MissingAsset {
            path: PathBuf::from("/media/a.jpg"),
        };
        assert_eq!(err.category(), ErrorCategory::MissingAsset);

        let err = AppError::PassageNotFound {
            reference: "John 3:99".to_string(),
            translation: "KJV".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::LookupFailure);
        assert!(err.is_lookup_failure());

        let err = AppError::CapacityExceeded {
            what: "presets".to_string(),
            limit: 3,
        };
        assert_eq!(err.category(), ErrorCategory::CapacityExceeded);
        assert!(!err.is_lookup_failure());
    }

    #[test]
    fn test_network_error_is_recoverable() {
        let err = AppError::NetworkError {
            message: "timeout".to_string(),
            source: None,
        };
        assert_eq!(err.severity(), ErrorSeverity::Recoverable);
        assert_eq!(err.recovery_action(), RecoveryAction::RetryWithBackoff);
    }

    #[test]
    fn test_missing_asset_is_skipped() {
        let err = AppError::MissingAsset {
            path: PathBuf::from("/media/gone.mp4"),
        };
        assert_eq!(err.recovery_action(), RecoveryAction::SkipItem);
        assert_eq!(err.user_message(), "File not found: gone.mp4");
    }

    #[test]
    fn test_capacity_message() {
        let err = AppError::CapacityExceeded {
            what: "presets".to_string(),
            limit: 3,
        };
        assert_eq!(
            err.user_message(),
            "Maximum of 3 presets allowed. Delete one first."
        );
    }

    #[test]
    fn test_io_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "nope");
        let err: AppError = io_err.into();
        assert_eq!(err.category(), ErrorCategory::Io);
    }

    #[test]
    fn test_severity_ordering() {
        assert!(ErrorSeverity::Recoverable < ErrorSeverity::Degraded);
        assert!(ErrorSeverity::Degraded < ErrorSeverity::Fatal);
    }
}
