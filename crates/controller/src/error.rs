// FILE: crates/controller/src/error.rs

use stagecast_core::AppError;
use stagecast_scripture::ScriptureError;
use std::path::PathBuf;
use thiserror::Error;

/// Why a controller operation was refused
///
/// Every operation that returns one of these left the register untouched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ControlError {
    #[error("File not found: {}", .0.display())]
    MissingAsset(PathBuf),

    #[error("Scripture lookup failed: {0}")]
    Lookup(#[from] ScriptureError),

    #[error("Nothing staged")]
    NothingStaged,

    #[error("No {0} is live")]
    NotLive(&'static str),

    #[error("{operation} rejected: {reason}")]
    Rejected {
        operation: &'static str,
        reason: String,
    },
}

impl ControlError {
    pub(crate) fn rejected(operation: &'static str, reason: impl Into<String>) -> Self {
        Self::Rejected {
            operation,
            reason: reason.into(),
        }
    }
}

impl From<ControlError> for AppError {
    fn from(err: ControlError) -> Self {
        match err {
            ControlError::MissingAsset(path) => AppError::MissingAsset { path },
            ControlError::Lookup(e) => e.into(),
            other @ (ControlError::NothingStaged | ControlError::NotLive(_)) => AppError::Rejected {
                operation: "control".to_string(),
                reason: other.to_string(),
            },
            ControlError::Rejected { operation, reason } => AppError::Rejected {
                operation: operation.to_string(),
                reason,
            },
        }
    }
}

pub type ControlResult<T> = Result<T, ControlError>;

#[cfg(test)]
mod tests {
    use super::*;
    use stagecast_core::ErrorCategory;

    #[test]
    fn test_error_display() {
        let err = ControlError::MissingAsset(PathBuf::from("/m/gone.mp4"));
        assert_eq!(err.to_string(), "File not found: /m/gone.mp4");
        assert_eq!(ControlError::NotLive("slideshow").to_string(), "No slideshow is live");
    }

    #[test]
    fn test_categories() {
        let app: AppError = ControlError::MissingAsset(PathBuf::from("/m/a.jpg")).into();
        assert_eq!(app.category(), ErrorCategory::MissingAsset);

        let app: AppError = ControlError::Lookup(ScriptureError::Network("down".into())).into();
        assert_eq!(app.category(), ErrorCategory::LookupFailure);
    }
}
