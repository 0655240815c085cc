//! Folding test outcomes into reports.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::Utc;
use mockingbird_core::{ErrorKind, ReportingSettings, TestOutcome};
use tracing::{debug, instrument};

use crate::types::{AggregateReport, DetailedReport, ErrorAnalysis, PerformanceSummary};

/// Default delimiter between a test's category and the rest of its name.
pub const DEFAULT_CATEGORY_DELIMITER: &str = "_";

/// Configuration for aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatorConfig {
    /// Delimiter splitting a test name into category and remainder.
    pub category_delimiter: String,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            category_delimiter: DEFAULT_CATEGORY_DELIMITER.to_string(),
        }
    }
}

impl AggregatorConfig {
    /// Aggregator configuration taken from the `[reporting]` settings.
    pub fn from_settings(settings: &ReportingSettings) -> Self {
        Self {
            category_delimiter: settings.category_delimiter.clone(),
        }
    }
}

/// The category of a test name: the text before the first `delimiter`, or
/// the whole name when the delimiter does not occur.
pub fn category_of<'a>(name: &'a str, delimiter: &str) -> &'a str {
    if delimiter.is_empty() {
        return name;
    }
    name.split_once(delimiter).map_or(name, |(head, _)| head)
}

/// Collects outcomes and produces reports over them.
///
/// Outcomes can be added one at a time while tests run ([`record`]) and
/// turned into a report on demand, or handed over in one batch
/// ([`aggregate`]). Apart from the `generated_at` stamp, the same outcomes
/// always give the same report.
///
/// [`record`]: ResultAggregator::record
/// [`aggregate`]: ResultAggregator::aggregate
#[derive(Debug, Clone, Default)]
pub struct ResultAggregator {
    config: AggregatorConfig,
    outcomes: Vec<TestOutcome>,
}

impl ResultAggregator {
    /// An empty aggregator splitting categories on `_`.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty aggregator with the given configuration.
    pub fn with_config(config: AggregatorConfig) -> Self {
        Self {
            config,
            outcomes: Vec::new(),
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    /// Adds one outcome.
    pub fn record(&mut self, outcome: TestOutcome) {
        debug!(name = %outcome.name(), status = %outcome.status(), "Recording outcome");
        self.outcomes.push(outcome);
    }

    /// Adds several outcomes.
    pub fn record_all(&mut self, outcomes: impl IntoIterator<Item = TestOutcome>) {
        self.outcomes.extend(outcomes);
    }

    /// Recorded outcomes in the order they were added.
    pub fn outcomes(&self) -> &[TestOutcome] {
        &self.outcomes
    }

    /// Number of recorded outcomes.
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// True when nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Drops every recorded outcome.
    pub fn clear(&mut self) {
        self.outcomes.clear();
    }

    /// Summary report over the recorded outcomes.
    pub fn report(&self) -> AggregateReport {
        self.aggregate(&self.outcomes)
    }

    /// Detailed report over the recorded outcomes.
    pub fn detailed_report(&self) -> DetailedReport {
        self.aggregate_detailed(&self.outcomes)
    }

    /// Summary report over `outcomes`, ignoring recorded ones.
    #[instrument(skip_all, fields(outcomes = outcomes.len()))]
    pub fn aggregate(&self, outcomes: &[TestOutcome]) -> AggregateReport {
        AggregateReport::from_outcomes(outcomes.to_vec(), Utc::now())
    }

    /// Detailed report over `outcomes`, ignoring recorded ones.
    #[instrument(skip_all, fields(outcomes = outcomes.len()))]
    pub fn aggregate_detailed(&self, outcomes: &[TestOutcome]) -> DetailedReport {
        let summary = AggregateReport::from_outcomes(outcomes.to_vec(), Utc::now());
        let categories = self.category_counts(outcomes);
        let performance = performance_summary(outcomes);
        let errors = error_analysis(outcomes);

        debug!(
            categories = categories.len(),
            error_kinds = errors.error_type_counts.len(),
            "Aggregated detailed report"
        );

        DetailedReport::new(summary, categories, performance, errors)
    }

    fn category_counts(&self, outcomes: &[TestOutcome]) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for outcome in outcomes {
            let category = category_of(outcome.name(), &self.config.category_delimiter);
            *counts.entry(category.to_string()).or_insert(0) += 1;
        }
        counts
    }
}

fn performance_summary(outcomes: &[TestOutcome]) -> PerformanceSummary {
    if outcomes.is_empty() {
        return PerformanceSummary::default();
    }

    let durations = outcomes.iter().map(TestOutcome::duration);
    let total = durations
        .clone()
        .fold(Duration::ZERO, Duration::saturating_add);
    let min = durations.clone().min().unwrap_or_default();
    let max = durations.max().unwrap_or_default();
    let average =
        Duration::try_from_secs_f64(total.as_secs_f64() / outcomes.len() as f64).unwrap_or(max);

    PerformanceSummary {
        average,
        min,
        max,
        total,
    }
}

fn error_analysis(outcomes: &[TestOutcome]) -> ErrorAnalysis {
    // Kinds in first-seen order, for tie breaking.
    let mut first_seen: Vec<(String, usize)> = Vec::new();
    let mut total_errors = 0;

    for outcome in outcomes.iter().filter(|o| o.is_failure()) {
        total_errors += 1;
        let kind = outcome
            .error()
            .map_or_else(ErrorKind::unknown, |e| e.kind.clone());

        match first_seen.iter_mut().find(|(k, _)| k == kind.as_str()) {
            Some((_, count)) => *count += 1,
            None => first_seen.push((kind.as_str().to_string(), 1)),
        }
    }

    let mut most_common: Option<&(String, usize)> = None;
    for entry in &first_seen {
        if most_common.map_or(true, |best| entry.1 > best.1) {
            most_common = Some(entry);
        }
    }
    let most_common_error_type = most_common.map(|(kind, _)| kind.clone());

    ErrorAnalysis {
        total_errors,
        most_common_error_type,
        error_type_counts: first_seen.into_iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockingbird_core::{ErrorValue, TestStatus};

    fn outcome(name: &str, status: TestStatus, millis: u64, error: Option<&str>) -> TestOutcome {
        TestOutcome::new(
            name,
            status,
            Duration::from_millis(millis),
            error.map(|kind| ErrorValue::new(kind, "boom")),
        )
    }

    #[test]
    fn test_aggregate_empty() {
        let report = ResultAggregator::new().aggregate(&[]);

        assert_eq!(report.total_tests(), 0);
        assert_eq!(report.passed_tests(), 0);
        assert_eq!(report.failed_tests(), 0);
        assert_eq!(report.skipped_tests(), 0);
        assert_eq!(report.success_rate(), 0.0);
        assert_eq!(report.total_duration(), Duration::ZERO);
    }

    #[test]
    fn test_success_rate_seven_of_ten() {
        let mut outcomes = Vec::new();
        for i in 0..7 {
            outcomes.push(outcome(&format!("pass_{i}"), TestStatus::Passed, 10, None));
        }
        outcomes.push(outcome("fail_a", TestStatus::Failed, 10, Some("AssertionError")));
        outcomes.push(outcome("fail_b", TestStatus::Failed, 10, Some("TimeoutError")));
        outcomes.push(outcome("skip_a", TestStatus::Skipped, 0, None));

        let report = ResultAggregator::new().aggregate(&outcomes);

        assert_eq!(report.total_tests(), 10);
        assert_eq!(report.passed_tests(), 7);
        assert_eq!(report.failed_tests(), 2);
        assert_eq!(report.skipped_tests(), 1);
        assert!((report.success_rate() - 0.7).abs() < 1e-9);
        assert_eq!(report.total_duration(), Duration::from_millis(90));
    }

    #[test]
    fn test_categories_split_on_first_delimiter() {
        let outcomes = vec![
            outcome("Login_valid_password", TestStatus::Passed, 5, None),
            outcome("Login_bad_password", TestStatus::Passed, 5, None),
            outcome("Cart_add", TestStatus::Passed, 5, None),
            outcome("smoke", TestStatus::Passed, 5, None),
        ];

        let report = ResultAggregator::new().aggregate_detailed(&outcomes);
        let categories = report.category_counts();

        assert_eq!(categories.get("Login"), Some(&2));
        assert_eq!(categories.get("Cart"), Some(&1));
        assert_eq!(categories.get("smoke"), Some(&1));
    }

    #[test]
    fn test_custom_delimiter() {
        let aggregator = ResultAggregator::with_config(AggregatorConfig {
            category_delimiter: "::".to_string(),
        });
        let report =
            aggregator.aggregate_detailed(&[outcome("api::users::list", TestStatus::Passed, 1, None)]);

        assert_eq!(report.category_counts().get("api"), Some(&1));
        assert_eq!(category_of("a_b", ""), "a_b");
    }

    #[test]
    fn test_performance_over_all_outcomes() {
        let outcomes = vec![
            outcome("a", TestStatus::Passed, 100, None),
            outcome("b", TestStatus::Failed, 300, Some("X")),
            outcome("c", TestStatus::Skipped, 200, None),
        ];

        let perf = *ResultAggregator::new().aggregate_detailed(&outcomes).performance();

        assert_eq!(perf.average, Duration::from_millis(200));
        assert_eq!(perf.min, Duration::from_millis(100));
        assert_eq!(perf.max, Duration::from_millis(300));
        assert_eq!(perf.total, Duration::from_millis(600));
    }

    #[test]
    fn test_performance_saturates_on_huge_durations() {
        let outcomes = vec![
            TestOutcome::passed("Sync_full", Duration::MAX),
            TestOutcome::passed("Sync_delta", Duration::from_secs(1)),
        ];

        let report = ResultAggregator::new().aggregate_detailed(&outcomes);
        let perf = *report.performance();

        assert_eq!(report.summary().total_duration(), Duration::MAX);
        assert_eq!(perf.total, Duration::MAX);
        assert_eq!(perf.max, Duration::MAX);
        assert_eq!(perf.min, Duration::from_secs(1));
        assert!(perf.average <= perf.max);

        let single = ResultAggregator::new().aggregate_detailed(&outcomes[..1]);
        assert_eq!(single.performance().average, Duration::MAX);
    }

    #[test]
    fn test_empty_detailed_report_has_zero_performance() {
        let report = ResultAggregator::new().aggregate_detailed(&[]);

        assert_eq!(*report.performance(), PerformanceSummary::default());
        assert_eq!(report.error_analysis().total_errors, 0);
        assert_eq!(report.error_analysis().most_common_error_type, None);
        assert!(report.category_counts().is_empty());
    }

    #[test]
    fn test_error_analysis_ties_go_to_first_seen_kind() {
        let outcomes = vec![
            outcome("a", TestStatus::Failed, 1, Some("NetworkError")),
            outcome("b", TestStatus::Failed, 1, Some("TimeoutError")),
            outcome("c", TestStatus::Passed, 1, None),
            outcome("d", TestStatus::Failed, 1, Some("TimeoutError")),
            outcome("e", TestStatus::Failed, 1, Some("NetworkError")),
        ];

        let analysis = ResultAggregator::new()
            .aggregate_detailed(&outcomes)
            .error_analysis()
            .clone();

        assert_eq!(analysis.total_errors, 4);
        assert_eq!(analysis.error_type_counts.get("NetworkError"), Some(&2));
        assert_eq!(analysis.error_type_counts.get("TimeoutError"), Some(&2));
        assert_eq!(analysis.most_common_error_type.as_deref(), Some("NetworkError"));
    }

    #[test]
    fn test_error_analysis_picks_highest_count() {
        let outcomes = vec![
            outcome("a", TestStatus::Failed, 1, Some("NetworkError")),
            outcome("b", TestStatus::Failed, 1, Some("TimeoutError")),
            outcome("c", TestStatus::Failed, 1, Some("TimeoutError")),
            outcome("d", TestStatus::Failed, 1, None),
        ];

        let analysis = ResultAggregator::new()
            .aggregate_detailed(&outcomes)
            .error_analysis()
            .clone();

        assert_eq!(analysis.most_common_error_type.as_deref(), Some("TimeoutError"));
        assert_eq!(analysis.error_type_counts.get("UnknownError"), Some(&1));
    }

    #[test]
    fn test_incremental_recording_matches_batch() {
        let outcomes = vec![
            outcome("Login_a", TestStatus::Passed, 10, None),
            outcome("Login_b", TestStatus::Failed, 20, Some("AssertionError")),
        ];

        let mut aggregator = ResultAggregator::new();
        aggregator.record(outcomes[0].clone());
        aggregator.record_all(outcomes[1..].to_vec());

        let incremental = aggregator.detailed_report();
        let batch = aggregator.aggregate_detailed(&outcomes);

        assert_eq!(incremental.summary().outcomes(), batch.summary().outcomes());
        assert_eq!(incremental.category_counts(), batch.category_counts());
        assert_eq!(incremental.error_analysis(), batch.error_analysis());

        aggregator.clear();
        assert!(aggregator.is_empty());
        assert_eq!(aggregator.report().total_tests(), 0);
    }
}
