//! Report types produced by the aggregator.
//!
//! Report fields are computed by [`ResultAggregator`](crate::ResultAggregator)
//! and exposed read-only, so derived numbers always match the outcome list.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use mockingbird_core::serde_helpers::duration_secs;
use mockingbird_core::{TestOutcome, TestStatus};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Summary statistics over a set of outcomes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateReport {
    report_id: Uuid,
    total_tests: usize,
    passed_tests: usize,
    failed_tests: usize,
    skipped_tests: usize,
    #[serde(rename = "total_duration_seconds", with = "duration_secs")]
    total_duration: Duration,
    success_rate: f64,
    outcomes: Vec<TestOutcome>,
    generated_at: DateTime<Utc>,
}

impl AggregateReport {
    pub(crate) fn from_outcomes(outcomes: Vec<TestOutcome>, generated_at: DateTime<Utc>) -> Self {
        let count = |status: TestStatus| outcomes.iter().filter(|o| o.status() == status).count();

        let total_tests = outcomes.len();
        let passed_tests = count(TestStatus::Passed);
        let failed_tests = count(TestStatus::Failed);
        let skipped_tests = count(TestStatus::Skipped);
        let total_duration = outcomes
            .iter()
            .map(TestOutcome::duration)
            .fold(Duration::ZERO, Duration::saturating_add);
        let success_rate = if total_tests == 0 {
            0.0
        } else {
            passed_tests as f64 / total_tests as f64
        };

        Self {
            report_id: Uuid::new_v4(),
            total_tests,
            passed_tests,
            failed_tests,
            skipped_tests,
            total_duration,
            success_rate,
            outcomes,
            generated_at,
        }
    }

    /// Unique id of this report, used for export file names.
    pub fn report_id(&self) -> Uuid {
        self.report_id
    }

    /// Number of outcomes in the report.
    pub fn total_tests(&self) -> usize {
        self.total_tests
    }

    /// Number of passed outcomes.
    pub fn passed_tests(&self) -> usize {
        self.passed_tests
    }

    /// Number of failed outcomes.
    pub fn failed_tests(&self) -> usize {
        self.failed_tests
    }

    /// Number of skipped outcomes.
    pub fn skipped_tests(&self) -> usize {
        self.skipped_tests
    }

    /// Sum of all outcome durations, saturating at [`Duration::MAX`].
    pub fn total_duration(&self) -> Duration {
        self.total_duration
    }

    /// Passed tests over total tests, `0.0` for an empty report.
    pub fn success_rate(&self) -> f64 {
        self.success_rate
    }

    /// Outcomes in recorded order.
    pub fn outcomes(&self) -> &[TestOutcome] {
        &self.outcomes
    }

    /// When the report was built.
    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    /// True when nothing failed.
    pub fn passed(&self) -> bool {
        self.failed_tests == 0
    }

    /// Failed outcomes in recorded order.
    pub fn failed_outcomes(&self) -> Vec<&TestOutcome> {
        self.outcomes.iter().filter(|o| o.is_failure()).collect()
    }

    /// The `n` slowest outcomes, slowest first. Ties keep recorded order.
    pub fn slowest(&self, n: usize) -> Vec<&TestOutcome> {
        let mut outcomes: Vec<_> = self.outcomes.iter().collect();
        outcomes.sort_by(|a, b| b.duration().cmp(&a.duration()));
        outcomes.truncate(n);
        outcomes
    }
}

/// Duration statistics over all outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PerformanceSummary {
    /// Mean outcome duration.
    #[serde(rename = "average_seconds", with = "duration_secs")]
    pub average: Duration,
    #[serde(rename = "min_seconds", with = "duration_secs")]
    pub min: Duration,
    #[serde(rename = "max_seconds", with = "duration_secs")]
    pub max: Duration,
    /// Sum of outcome durations, saturating at [`Duration::MAX`].
    #[serde(rename = "total_seconds", with = "duration_secs")]
    pub total: Duration,
}

/// Failures grouped by error kind.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ErrorAnalysis {
    /// Number of failed outcomes.
    pub total_errors: usize,
    /// Failed outcomes per error kind.
    pub error_type_counts: BTreeMap<String, usize>,
    /// Kind with the highest count; the first kind seen wins ties.
    pub most_common_error_type: Option<String>,
}

/// An aggregate report with categories, timing and failure analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailedReport {
    summary: AggregateReport,
    category_counts: BTreeMap<String, usize>,
    performance: PerformanceSummary,
    error_analysis: ErrorAnalysis,
}

impl DetailedReport {
    pub(crate) fn new(
        summary: AggregateReport,
        category_counts: BTreeMap<String, usize>,
        performance: PerformanceSummary,
        error_analysis: ErrorAnalysis,
    ) -> Self {
        Self {
            summary,
            category_counts,
            performance,
            error_analysis,
        }
    }

    /// The summary the detailed sections were computed from.
    pub fn summary(&self) -> &AggregateReport {
        &self.summary
    }

    /// Outcome count per category (test name prefix).
    pub fn category_counts(&self) -> &BTreeMap<String, usize> {
        &self.category_counts
    }

    /// Duration statistics.
    pub fn performance(&self) -> &PerformanceSummary {
        &self.performance
    }

    /// Failure counts by error kind.
    pub fn error_analysis(&self) -> &ErrorAnalysis {
        &self.error_analysis
    }
}

/// Error types for report rendering and export.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// No formatter is registered for the requested format.
    #[error("Unsupported report format: {0}")]
    UnsupportedFormat(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
