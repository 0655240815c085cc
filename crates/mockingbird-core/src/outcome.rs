//! Outcome records produced by the host test runner.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error_value::ErrorValue;

/// Final status of one executed test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    /// The test ran and passed.
    Passed,
    /// The test ran and failed.
    Failed,
    /// The test was not run.
    Skipped,
}

impl TestStatus {
    /// Lowercase label used by the text and markup renderers.
    pub fn label(&self) -> &'static str {
        match self {
            TestStatus::Passed => "passed",
            TestStatus::Failed => "failed",
            TestStatus::Skipped => "skipped",
        }
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestStatus::Passed => write!(f, "PASSED"),
            TestStatus::Failed => write!(f, "FAILED"),
            TestStatus::Skipped => write!(f, "SKIPPED"),
        }
    }
}

/// The recorded result of one executed test. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestOutcome {
    name: String,
    status: TestStatus,
    #[serde(rename = "duration_seconds", with = "crate::serde_helpers::duration_secs")]
    duration: Duration,
    error: Option<ErrorValue>,
    timestamp: DateTime<Utc>,
}

impl TestOutcome {
    /// Create an outcome stamped with the current time.
    pub fn new(
        name: impl Into<String>,
        status: TestStatus,
        duration: Duration,
        error: Option<ErrorValue>,
    ) -> Self {
        Self::at(name, status, duration, error, Utc::now())
    }

    /// Create an outcome with an explicit timestamp.
    pub fn at(
        name: impl Into<String>,
        status: TestStatus,
        duration: Duration,
        error: Option<ErrorValue>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            name: name.into(),
            status,
            duration,
            error,
            timestamp,
        }
    }

    /// A passing outcome.
    pub fn passed(name: impl Into<String>, duration: Duration) -> Self {
        Self::new(name, TestStatus::Passed, duration, None)
    }

    /// A failing outcome with the error that caused it.
    pub fn failed(name: impl Into<String>, duration: Duration, error: ErrorValue) -> Self {
        Self::new(name, TestStatus::Failed, duration, Some(error))
    }

    /// A skipped outcome.
    pub fn skipped(name: impl Into<String>) -> Self {
        Self::new(name, TestStatus::Skipped, Duration::ZERO, None)
    }

    /// Test name, conventionally `<Category>_<case>`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn status(&self) -> TestStatus {
        self.status
    }

    /// Wall-clock time the test took.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Error attached to a failed outcome.
    pub fn error(&self) -> Option<&ErrorValue> {
        self.error.as_ref()
    }

    /// When the outcome was recorded.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// True for [`TestStatus::Failed`].
    pub fn is_failure(&self) -> bool {
        self.status == TestStatus::Failed
    }
}
