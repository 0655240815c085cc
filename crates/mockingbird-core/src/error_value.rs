//! Error values carried by mock failures and failed test outcomes.
//!
//! Errors are tagged with an explicit [`ErrorKind`] instead of relying on the
//! runtime type of the error, so reports can group failures by kind.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Declared kind of an error, e.g. `"TimeoutError"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorKind(String);

impl ErrorKind {
    /// Create an error kind from any string tag.
    pub fn new(kind: impl Into<String>) -> Self {
        Self(kind.into())
    }

    /// A timed out operation.
    pub fn timeout() -> Self {
        Self::new("TimeoutError")
    }

    /// A failed network exchange.
    pub fn network() -> Self {
        Self::new("NetworkError")
    }

    /// A missing resource.
    pub fn not_found() -> Self {
        Self::new("NotFoundError")
    }

    /// Rejected input.
    pub fn invalid_input() -> Self {
        Self::new("InvalidInputError")
    }

    /// Used when a failure carries no error at all.
    pub fn unknown() -> Self {
        Self::new("UnknownError")
    }

    /// The tag as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ErrorKind {
    fn from(kind: &str) -> Self {
        Self::new(kind)
    }
}

impl From<String> for ErrorKind {
    fn from(kind: String) -> Self {
        Self(kind)
    }
}

/// An error with a declared kind and a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorValue {
    /// Kind used for grouping in error analysis.
    pub kind: ErrorKind,
    /// Description of what went wrong.
    pub message: String,
}

impl ErrorValue {
    /// Create a new error value.
    pub fn new(kind: impl Into<ErrorKind>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// Shorthand for a [`ErrorKind::timeout`] error.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::timeout(), message)
    }

    /// Shorthand for a [`ErrorKind::network`] error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::network(), message)
    }

    /// Shorthand for a [`ErrorKind::not_found`] error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::not_found(), message)
    }
}

impl fmt::Display for ErrorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}: {}", self.kind, self.message)
        }
    }
}

impl std::error::Error for ErrorValue {}
