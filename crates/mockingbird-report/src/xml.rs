//! JUnit-style XML report rendering.
//!
//! One `<testsuite>` holds a `<testcase>` per outcome, so CI systems that
//! understand JUnit XML can pick the report up directly. XML has no detailed
//! rendering; [`ReportFormatter::format_detailed`] renders the summary.

use mockingbird_core::{TestOutcome, TestStatus};
use tracing::instrument;

use crate::aggregator::{category_of, DEFAULT_CATEGORY_DELIMITER};
use crate::formatter::ReportFormatter;
use crate::types::AggregateReport;
use crate::util::escape_markup;

/// Configuration for XML report generation.
#[derive(Debug, Clone)]
pub struct XmlReportConfig {
    /// `name` attribute of the `<testsuite>` element.
    pub suite_name: String,
    /// Delimiter used to derive each test case's `classname` from its name.
    pub category_delimiter: String,
}

impl Default for XmlReportConfig {
    fn default() -> Self {
        Self {
            suite_name: "mockingbird".to_string(),
            category_delimiter: DEFAULT_CATEGORY_DELIMITER.to_string(),
        }
    }
}

/// XML report formatter.
#[derive(Debug, Clone, Default)]
pub struct XmlReportFormatter {
    config: XmlReportConfig,
}

impl XmlReportFormatter {
    /// A formatter naming the suite `mockingbird`.
    pub fn new() -> Self {
        Self::default()
    }

    /// A formatter with the given configuration.
    pub fn with_config(config: XmlReportConfig) -> Self {
        Self { config }
    }

    fn write_testcase(&self, xml: &mut String, outcome: &TestOutcome) {
        let name = outcome.name();
        xml.push_str(&format!(
            "  <testcase name=\"{}\" classname=\"{}\" time=\"{:.3}\"",
            escape_markup(name),
            escape_markup(category_of(name, &self.config.category_delimiter)),
            outcome.duration().as_secs_f64()
        ));

        match outcome.status() {
            TestStatus::Passed => xml.push_str("/>\n"),
            TestStatus::Skipped => xml.push_str(">\n    <skipped/>\n  </testcase>\n"),
            TestStatus::Failed => {
                xml.push_str(">\n");
                match outcome.error() {
                    Some(error) => {
                        xml.push_str(&format!(
                            "    <failure type=\"{}\" message=\"{}\">{}</failure>\n",
                            escape_markup(error.kind.as_str()),
                            escape_markup(&error.message),
                            escape_markup(&error.to_string())
                        ));
                    }
                    None => xml.push_str("    <failure/>\n"),
                }
                xml.push_str("  </testcase>\n");
            }
        }
    }
}

impl ReportFormatter for XmlReportFormatter {
    fn format_id(&self) -> &'static str {
        "xml"
    }

    #[instrument(skip_all, fields(report_id = %report.report_id()))]
    fn format(&self, report: &AggregateReport) -> String {
        let mut xml = String::with_capacity(4096);

        xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        xml.push_str(&format!(
            "<testsuite name=\"{}\" id=\"{}\" tests=\"{}\" failures=\"{}\" skipped=\"{}\" time=\"{:.3}\" timestamp=\"{}\"",
            escape_markup(&self.config.suite_name),
            report.report_id(),
            report.total_tests(),
            report.failed_tests(),
            report.skipped_tests(),
            report.total_duration().as_secs_f64(),
            report.generated_at().to_rfc3339()
        ));

        if report.outcomes().is_empty() {
            xml.push_str("/>\n");
            return xml;
        }

        xml.push_str(">\n");
        for outcome in report.outcomes() {
            self.write_testcase(&mut xml, outcome);
        }
        xml.push_str("</testsuite>\n");

        xml
    }
}
