// FILE: crates/scripture/src/error.rs

use stagecast_core::AppError;
use thiserror::Error;

/// Errors from reference parsing, providers and navigation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScriptureError {
    #[error("Invalid reference '{input}': {reason}")]
    InvalidReference { input: String, reason: String },

    #[error("Not found: {reference} ({translation})")]
    NotFound {
        reference: String,
        translation: String,
    },

    #[error("Unauthorized by {0}")]
    Unauthorized(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response from {provider}: {details}")]
    InvalidResponse { provider: String, details: String },
}

impl ScriptureError {
    pub(crate) fn invalid_reference(input: &str, reason: impl Into<String>) -> Self {
        Self::InvalidReference {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    /// Whether repeating the request could succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<ScriptureError> for AppError {
    fn from(err: ScriptureError) -> Self {
        match err {
            ScriptureError::InvalidReference { input, reason } => {
                AppError::InvalidReference { input, reason }
            }
            ScriptureError::NotFound {
                reference,
                translation,
            } => AppError::PassageNotFound {
                reference,
                translation,
            },
            ScriptureError::Unauthorized(provider) => AppError::ProviderUnauthorized { provider },
            ScriptureError::Network(message) => AppError::NetworkError {
                message,
                source: None,
            },
            ScriptureError::InvalidResponse { provider, details } => {
                AppError::InvalidProviderResponse { provider, details }
            }
        }
    }
}

pub type ScriptureResult<T> = Result<T, ScriptureError>;

#[cfg(test)]
mod tests {
    use super::*;
    use stagecast_core::ErrorCategory;

    #[test]
    fn test_only_network_errors_retry() {
        assert!(ScriptureError::Network("timed out".into()).is_retryable());
        assert!(!ScriptureError::Unauthorized("helloao".into()).is_retryable());
        assert!(!ScriptureError::NotFound {
            reference: "John 99:1".into(),
            translation: "eng_kjv".into()
        }
        .is_retryable());
    }

    #[test]
    fn test_converts_to_lookup_failure() {
        let errors = [
            ScriptureError::invalid_reference("Hezekiah 1", "unknown book"),
            ScriptureError::Network("refused".into()),
            ScriptureError::Unauthorized("helloao".into()),
        ];
        for err in errors {
            let app: AppError = err.into();
            assert_eq!(app.category(), ErrorCategory::LookupFailure);
        }
    }
}
