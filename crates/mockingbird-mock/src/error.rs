//! Error types for mock generation, resolution and verification.

use std::time::Duration;

use mockingbird_core::ErrorValue;
use thiserror::Error;

use crate::value::ValueKind;

/// Result type alias for mock operations.
pub type Result<T> = std::result::Result<T, MockError>;

/// Errors that can occur while generating or resolving a mock.
#[derive(Debug, Clone, Error)]
pub enum MockError {
    /// No behavior is configured for the method and no default applies.
    #[error("no behavior configured for {capability}.{method}")]
    NotConfigured { capability: String, method: String },

    /// The resolved value does not have the type the caller expects.
    #[error("invalid response type: expected {expected}, got {actual}")]
    InvalidResponseType { expected: String, actual: ValueKind },

    /// A mock for the capability could not be constructed.
    #[error("mock generation failed for {capability}: {reason}")]
    MockGenerationFailed { capability: String, reason: String },

    /// The configured behavior for the method is a failure.
    #[error("{0}")]
    Failure(ErrorValue),

    /// A delayed resolution was cancelled before it completed.
    #[error("resolution of {method} cancelled after {waited:?}")]
    Cancelled { method: String, waited: Duration },
}

impl MockError {
    /// Creates a new generation failure.
    pub fn generation_failed(capability: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MockGenerationFailed {
            capability: capability.into(),
            reason: reason.into(),
        }
    }

    /// The configured error, if this is a [`MockError::Failure`].
    pub fn as_failure(&self) -> Option<&ErrorValue> {
        match self {
            MockError::Failure(err) => Some(err),
            _ => None,
        }
    }

    /// Converts into an [`ErrorValue`] so the failure can be attached to a
    /// test outcome like any other assertion failure.
    pub fn into_error_value(self) -> ErrorValue {
        match self {
            MockError::Failure(err) => err,
            MockError::NotConfigured { .. } => ErrorValue::new("NotConfigured", self.to_string()),
            MockError::InvalidResponseType { .. } => {
                ErrorValue::new("InvalidResponseType", self.to_string())
            }
            MockError::MockGenerationFailed { .. } => {
                ErrorValue::new("MockGenerationFailed", self.to_string())
            }
            MockError::Cancelled { .. } => ErrorValue::new("Cancelled", self.to_string()),
        }
    }
}

/// A failed verification, with a message describing the mismatch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("verification failed for {capability}: {message}")]
pub struct VerificationError {
    /// Capability of the verified mock.
    pub capability: String,
    /// What was expected and what was recorded.
    pub message: String,
}
