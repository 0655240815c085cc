//! # mockingbird-report
//!
//! Test result aggregation and report rendering.
//!
//! The host test runner hands executed [`TestOutcome`]s to a
//! [`ResultAggregator`], which folds them into an [`AggregateReport`] or a
//! [`DetailedReport`]. A [`FormatterRegistry`] then renders either report as
//! text, JSON, HTML or JUnit-style XML and writes it to a file or a
//! [`ReportSink`].
//!
//! ## Example
//!
//! ```rust,ignore
//! use mockingbird_core::{ErrorValue, TestOutcome};
//! use mockingbird_report::{FormatterRegistry, ResultAggregator};
//! use std::time::Duration;
//!
//! let mut aggregator = ResultAggregator::new();
//! aggregator.record(TestOutcome::passed("Login_ok", Duration::from_millis(12)));
//! aggregator.record(TestOutcome::failed(
//!     "Login_timeout",
//!     Duration::from_secs(5),
//!     ErrorValue::timeout("auth service did not answer"),
//! ));
//!
//! let report = aggregator.detailed_report();
//! let registry = FormatterRegistry::with_defaults();
//! println!("{}", registry.render_detailed("txt", &report)?);
//! registry.export_detailed("html", &report, "report.html")?;
//! ```
//!
//! [`TestOutcome`]: mockingbird_core::TestOutcome

pub mod aggregator;
pub mod formatter;
pub mod html;
pub mod json;
pub mod sink;
pub mod text;
pub mod types;
pub mod xml;

mod util;

pub use aggregator::{category_of, AggregatorConfig, ResultAggregator, DEFAULT_CATEGORY_DELIMITER};
pub use formatter::{FormatterRegistry, ReportFormat, ReportFormatter};
pub use html::{HtmlReportConfig, HtmlReportFormatter};
pub use json::{JsonFormat, JsonReportConfig, JsonReportFormatter, EMPTY_JSON};
pub use sink::{FileSink, MemorySink, ReportSink};
pub use text::{TextReportConfig, TextReportFormatter};
pub use types::{AggregateReport, DetailedReport, ErrorAnalysis, PerformanceSummary, ReportError};
pub use xml::{XmlReportConfig, XmlReportFormatter};

/// Result type for report operations.
pub type Result<T> = std::result::Result<T, ReportError>;

/// Convenience function to render a detailed report in every built-in
/// format, paired with the format it was rendered in.
pub fn generate_all_formats(report: &DetailedReport) -> Vec<(ReportFormat, String)> {
    let registry = FormatterRegistry::with_defaults();
    ReportFormat::ALL
        .iter()
        .filter_map(|format| {
            registry
                .get(format.id())
                .ok()
                .map(|formatter| (*format, formatter.format_detailed(report)))
        })
        .collect()
}

/// Convenience function to write a detailed report to a directory in every
/// built-in format, as `report-<id>.<ext>`.
pub fn write_reports_to_directory(
    report: &DetailedReport,
    dir: impl AsRef<std::path::Path>,
) -> Result<()> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;

    let base_name = format!("report-{}", report.summary().report_id());
    let registry = FormatterRegistry::with_defaults();

    for format in ReportFormat::ALL {
        let path = dir.join(format!("{}.{}", base_name, format.id()));
        registry.export_detailed(format.id(), report, path)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockingbird_core::{ErrorValue, TestOutcome};
    use std::time::Duration;

    fn create_test_report() -> DetailedReport {
        let mut aggregator = ResultAggregator::new();
        aggregator.record_all([
            TestOutcome::passed("Orders_create", Duration::from_millis(30)),
            TestOutcome::passed("Orders_cancel", Duration::from_millis(45)),
            TestOutcome::failed(
                "Payments_refund",
                Duration::from_millis(900),
                ErrorValue::not_found("order 42"),
            ),
        ]);
        aggregator.detailed_report()
    }

    #[test]
    fn test_generate_all_formats() {
        let report = create_test_report();
        let rendered = generate_all_formats(&report);

        let formats: Vec<_> = rendered.iter().map(|(f, _)| *f).collect();
        assert_eq!(formats, ReportFormat::ALL.to_vec());

        let by_format = |format: ReportFormat| {
            rendered
                .iter()
                .find(|(f, _)| *f == format)
                .map(|(_, s)| s.as_str())
                .unwrap()
        };
        assert!(by_format(ReportFormat::Text).contains("Most common:  NotFoundError"));
        assert!(by_format(ReportFormat::Json).contains("\"category_counts\""));
        assert!(by_format(ReportFormat::Html).contains("<!DOCTYPE html>"));
        assert!(by_format(ReportFormat::Xml).contains("<testsuite"));
    }

    #[test]
    fn test_write_reports_to_directory() {
        let dir = tempfile::tempdir().unwrap();
        let report = create_test_report();

        write_reports_to_directory(&report, dir.path()).unwrap();

        let base = format!("report-{}", report.summary().report_id());
        for ext in ["txt", "json", "html", "xml"] {
            let path = dir.path().join(format!("{base}.{ext}"));
            assert!(path.exists(), "missing {}", path.display());
        }
    }

    #[tokio::test]
    async fn test_aggregate_then_publish_to_files() {
        let dir = tempfile::tempdir().unwrap();
        let report = create_test_report();
        let sink = FileSink::new(dir.path(), "nightly");
        let registry = FormatterRegistry::with_defaults();

        registry.publish("xml", report.summary(), &sink).await.unwrap();

        let xml = std::fs::read_to_string(dir.path().join("nightly.xml")).unwrap();
        assert!(xml.contains("failures=\"1\""));
    }
}
