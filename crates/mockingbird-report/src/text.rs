//! Plain text report rendering for terminals and CI logs.

use tracing::instrument;

use crate::formatter::ReportFormatter;
use crate::types::{AggregateReport, DetailedReport};
use crate::util::{format_datetime, format_duration, format_percent};

/// Configuration for text report generation.
#[derive(Debug, Clone)]
pub struct TextReportConfig {
    /// Report title.
    pub title: String,
    /// List every outcome, not only failures.
    pub list_all_outcomes: bool,
    /// Maximum failures to list (0 = unlimited).
    pub max_failures: usize,
}

impl Default for TextReportConfig {
    fn default() -> Self {
        Self {
            title: "Test Report".to_string(),
            list_all_outcomes: false,
            max_failures: 0,
        }
    }
}

/// Text report formatter.
#[derive(Debug, Clone, Default)]
pub struct TextReportFormatter {
    config: TextReportConfig,
}

impl TextReportFormatter {
    /// A formatter listing failures only.
    pub fn new() -> Self {
        Self::default()
    }

    /// A formatter with the given configuration.
    pub fn with_config(config: TextReportConfig) -> Self {
        Self { config }
    }

    fn write_heading(&self, out: &mut String, heading: &str) {
        out.push_str(heading);
        out.push('\n');
        out.push_str(&"-".repeat(heading.chars().count()));
        out.push('\n');
    }

    fn write_summary(&self, out: &mut String, report: &AggregateReport) {
        let title = &self.config.title;
        out.push_str(&format!("{title}\n{}\n\n", "=".repeat(title.chars().count())));
        out.push_str(&format!("Report ID:    {}\n", report.report_id()));
        out.push_str(&format!("Generated:    {}\n", format_datetime(&report.generated_at())));
        out.push_str(&format!(
            "Status:       {}\n",
            if report.passed() { "PASSED" } else { "FAILED" }
        ));
        out.push('\n');
        out.push_str(&format!("Total:        {}\n", report.total_tests()));
        out.push_str(&format!("Passed:       {}\n", report.passed_tests()));
        out.push_str(&format!("Failed:       {}\n", report.failed_tests()));
        out.push_str(&format!("Skipped:      {}\n", report.skipped_tests()));
        out.push_str(&format!("Success rate: {}\n", format_percent(report.success_rate())));
        out.push_str(&format!("Duration:     {}\n", format_duration(&report.total_duration())));
    }

    fn write_failures(&self, out: &mut String, report: &AggregateReport) {
        let failures = report.failed_outcomes();
        if failures.is_empty() {
            return;
        }

        out.push('\n');
        self.write_heading(out, "Failures");

        let limit = match self.config.max_failures {
            0 => failures.len(),
            n => n.min(failures.len()),
        };
        for outcome in &failures[..limit] {
            out.push_str(&format!(
                "- {} ({})",
                outcome.name(),
                format_duration(&outcome.duration())
            ));
            if let Some(error) = outcome.error() {
                out.push_str(&format!(": {error}"));
            }
            out.push('\n');
        }
        if limit < failures.len() {
            out.push_str(&format!("... and {} more\n", failures.len() - limit));
        }
    }

    fn write_outcomes(&self, out: &mut String, report: &AggregateReport) {
        if !self.config.list_all_outcomes || report.outcomes().is_empty() {
            return;
        }

        out.push('\n');
        self.write_heading(out, "Outcomes");
        for outcome in report.outcomes() {
            out.push_str(&format!(
                "[{:<7}] {} ({})\n",
                outcome.status().to_string(),
                outcome.name(),
                format_duration(&outcome.duration())
            ));
        }
    }

    fn write_details(&self, out: &mut String, report: &DetailedReport) {
        if !report.category_counts().is_empty() {
            out.push('\n');
            self.write_heading(out, "Categories");
            for (category, count) in report.category_counts() {
                out.push_str(&format!("{category}: {count}\n"));
            }
        }

        let perf = report.performance();
        out.push('\n');
        self.write_heading(out, "Performance");
        out.push_str(&format!("Average: {}\n", format_duration(&perf.average)));
        out.push_str(&format!("Min:     {}\n", format_duration(&perf.min)));
        out.push_str(&format!("Max:     {}\n", format_duration(&perf.max)));
        out.push_str(&format!("Total:   {}\n", format_duration(&perf.total)));

        let errors = report.error_analysis();
        out.push('\n');
        self.write_heading(out, "Errors");
        out.push_str(&format!("Total errors: {}\n", errors.total_errors));
        if let Some(kind) = &errors.most_common_error_type {
            out.push_str(&format!("Most common:  {kind}\n"));
        }
        for (kind, count) in &errors.error_type_counts {
            out.push_str(&format!("  {kind}: {count}\n"));
        }
    }
}

impl ReportFormatter for TextReportFormatter {
    fn format_id(&self) -> &'static str {
        "txt"
    }

    #[instrument(skip_all, fields(report_id = %report.report_id()))]
    fn format(&self, report: &AggregateReport) -> String {
        let mut out = String::with_capacity(1024);
        self.write_summary(&mut out, report);
        self.write_failures(&mut out, report);
        self.write_outcomes(&mut out, report);
        out
    }

    #[instrument(skip_all, fields(report_id = %report.summary().report_id()))]
    fn format_detailed(&self, report: &DetailedReport) -> String {
        let mut out = self.format(report.summary());
        self.write_details(&mut out, report);
        out
    }
}
