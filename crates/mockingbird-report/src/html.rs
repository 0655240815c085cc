//! HTML report rendering.
//!
//! Produces a single self-contained page with embedded CSS. Every piece of
//! text taken from the report (test names, error messages, categories) is
//! escaped before interpolation.

use mockingbird_core::{TestOutcome, TestStatus};
use tracing::instrument;

use crate::formatter::ReportFormatter;
use crate::types::{AggregateReport, DetailedReport};
use crate::util::{escape_markup, format_datetime, format_duration, format_percent};

/// Configuration for HTML report generation.
#[derive(Debug, Clone)]
pub struct HtmlReportConfig {
    /// Include embedded CSS (default: true).
    pub embed_css: bool,
    /// Page title and main heading.
    pub page_title: String,
    /// Custom CSS to inject after the embedded stylesheet.
    pub custom_css: Option<String>,
}

impl Default for HtmlReportConfig {
    fn default() -> Self {
        Self {
            embed_css: true,
            page_title: "Test Report".to_string(),
            custom_css: None,
        }
    }
}

/// HTML report formatter.
#[derive(Debug, Clone, Default)]
pub struct HtmlReportFormatter {
    config: HtmlReportConfig,
}

impl HtmlReportFormatter {
    /// A formatter with embedded CSS and the default title.
    pub fn new() -> Self {
        Self::default()
    }

    /// A formatter with the given configuration.
    pub fn with_config(config: HtmlReportConfig) -> Self {
        Self { config }
    }

    fn render(&self, report: &AggregateReport, details: Option<&DetailedReport>) -> String {
        let mut html = String::with_capacity(16384);

        html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n");
        self.write_head(&mut html, report);
        html.push_str("<body>\n");
        self.write_header(&mut html, report);
        self.write_summary_section(&mut html, report);
        if let Some(details) = details {
            self.write_categories_section(&mut html, details);
            self.write_performance_section(&mut html, details);
            self.write_errors_section(&mut html, details);
        }
        self.write_outcomes_section(&mut html, report);
        self.write_footer(&mut html, report);
        html.push_str("</body>\n</html>\n");

        html
    }

    fn write_head(&self, html: &mut String, report: &AggregateReport) {
        html.push_str("<head>\n");
        html.push_str("  <meta charset=\"UTF-8\">\n");
        html.push_str(
            "  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
        );
        html.push_str(&format!(
            "  <title>{}</title>\n",
            escape_markup(&self.config.page_title)
        ));
        html.push_str(&format!(
            "  <meta name=\"generator\" content=\"mockingbird-report {}\">\n",
            env!("CARGO_PKG_VERSION")
        ));
        html.push_str(&format!(
            "  <meta name=\"generated-at\" content=\"{}\">\n",
            report.generated_at().to_rfc3339()
        ));

        if self.config.embed_css {
            html.push_str("  <style>\n");
            html.push_str(EMBEDDED_CSS);
            html.push_str("  </style>\n");
        }
        if let Some(custom_css) = &self.config.custom_css {
            html.push_str("  <style>\n");
            html.push_str(custom_css);
            html.push_str("  </style>\n");
        }

        html.push_str("</head>\n");
    }

    fn write_header(&self, html: &mut String, report: &AggregateReport) {
        html.push_str("<header class=\"report-header\">\n");
        html.push_str(&format!("  <h1>{}</h1>\n", escape_markup(&self.config.page_title)));

        let (status_class, status_text) = if report.passed() {
            ("passed", "PASSED")
        } else {
            ("failed", "FAILED")
        };
        html.push_str(&format!(
            "  <div class=\"status-badge {status_class}\">{status_text}</div>\n"
        ));
        html.push_str("</header>\n\n");
    }

    fn write_summary_section(&self, html: &mut String, report: &AggregateReport) {
        html.push_str("<section class=\"summary-section\">\n");
        html.push_str("  <h2>Summary</h2>\n");
        html.push_str("  <div class=\"summary-grid\">\n");

        html.push_str("    <div class=\"summary-card\">\n");
        html.push_str("      <h3>Results</h3>\n");
        html.push_str("      <dl>\n");
        html.push_str(&format!("        <dt>Total</dt><dd>{}</dd>\n", report.total_tests()));
        html.push_str(&format!(
            "        <dt>Passed</dt><dd class=\"passed\">{}</dd>\n",
            report.passed_tests()
        ));
        html.push_str(&format!(
            "        <dt>Failed</dt><dd class=\"{}\">{}</dd>\n",
            if report.failed_tests() > 0 { "failed" } else { "" },
            report.failed_tests()
        ));
        html.push_str(&format!(
            "        <dt>Skipped</dt><dd class=\"skipped\">{}</dd>\n",
            report.skipped_tests()
        ));
        html.push_str(&format!(
            "        <dt>Success Rate</dt><dd>{}</dd>\n",
            format_percent(report.success_rate())
        ));
        html.push_str("      </dl>\n");
        html.push_str("    </div>\n");

        html.push_str("    <div class=\"summary-card\">\n");
        html.push_str("      <h3>Run</h3>\n");
        html.push_str("      <dl>\n");
        html.push_str(&format!(
            "        <dt>Report ID</dt><dd><code>{}</code></dd>\n",
            report.report_id()
        ));
        html.push_str(&format!(
            "        <dt>Generated</dt><dd>{}</dd>\n",
            format_datetime(&report.generated_at())
        ));
        html.push_str(&format!(
            "        <dt>Duration</dt><dd>{}</dd>\n",
            format_duration(&report.total_duration())
        ));
        html.push_str("      </dl>\n");
        html.push_str("    </div>\n");

        html.push_str("  </div>\n");
        html.push_str("</section>\n\n");
    }

    fn write_categories_section(&self, html: &mut String, report: &DetailedReport) {
        if report.category_counts().is_empty() {
            return;
        }

        html.push_str("<section class=\"categories-section\">\n");
        html.push_str("  <h2>Categories</h2>\n");
        html.push_str("  <table>\n");
        html.push_str("    <thead><tr><th>Category</th><th>Tests</th></tr></thead>\n");
        html.push_str("    <tbody>\n");
        for (category, count) in report.category_counts() {
            html.push_str(&format!(
                "      <tr><td>{}</td><td>{}</td></tr>\n",
                escape_markup(category),
                count
            ));
        }
        html.push_str("    </tbody>\n");
        html.push_str("  </table>\n");
        html.push_str("</section>\n\n");
    }

    fn write_performance_section(&self, html: &mut String, report: &DetailedReport) {
        let perf = report.performance();

        html.push_str("<section class=\"performance-section\">\n");
        html.push_str("  <h2>Performance</h2>\n");
        html.push_str("  <dl>\n");
        for (label, value) in [
            ("Average", &perf.average),
            ("Min", &perf.min),
            ("Max", &perf.max),
            ("Total", &perf.total),
        ] {
            html.push_str(&format!(
                "    <dt>{label}</dt><dd>{}</dd>\n",
                format_duration(value)
            ));
        }
        html.push_str("  </dl>\n");
        html.push_str("</section>\n\n");
    }

    fn write_errors_section(&self, html: &mut String, report: &DetailedReport) {
        let errors = report.error_analysis();

        html.push_str("<section class=\"errors-section\">\n");
        html.push_str("  <h2>Error Analysis</h2>\n");
        html.push_str(&format!(
            "  <p>Total errors: <strong>{}</strong></p>\n",
            errors.total_errors
        ));
        if let Some(kind) = &errors.most_common_error_type {
            html.push_str(&format!(
                "  <p>Most common: <code>{}</code></p>\n",
                escape_markup(kind)
            ));
        }

        if !errors.error_type_counts.is_empty() {
            html.push_str("  <table>\n");
            html.push_str("    <thead><tr><th>Error Kind</th><th>Count</th></tr></thead>\n");
            html.push_str("    <tbody>\n");
            for (kind, count) in &errors.error_type_counts {
                html.push_str(&format!(
                    "      <tr><td><code>{}</code></td><td>{}</td></tr>\n",
                    escape_markup(kind),
                    count
                ));
            }
            html.push_str("    </tbody>\n");
            html.push_str("  </table>\n");
        }
        html.push_str("</section>\n\n");
    }

    fn write_outcomes_section(&self, html: &mut String, report: &AggregateReport) {
        html.push_str("<section class=\"outcomes-section\">\n");
        html.push_str("  <h2>Tests</h2>\n");

        if report.outcomes().is_empty() {
            html.push_str("  <p class=\"no-tests\">No tests were recorded.</p>\n");
            html.push_str("</section>\n\n");
            return;
        }

        html.push_str("  <table>\n");
        html.push_str(
            "    <thead><tr><th>Test</th><th>Status</th><th>Duration</th><th>Error</th></tr></thead>\n",
        );
        html.push_str("    <tbody>\n");
        for outcome in report.outcomes() {
            self.write_outcome_row(html, outcome);
        }
        html.push_str("    </tbody>\n");
        html.push_str("  </table>\n");
        html.push_str("</section>\n\n");
    }

    fn write_outcome_row(&self, html: &mut String, outcome: &TestOutcome) {
        let error = outcome
            .error()
            .map(|e| escape_markup(&e.to_string()))
            .unwrap_or_default();

        html.push_str(&format!(
            "      <tr class=\"{}\"><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            status_css_class(outcome.status()),
            escape_markup(outcome.name()),
            outcome.status(),
            format_duration(&outcome.duration()),
            error
        ));
    }

    fn write_footer(&self, html: &mut String, report: &AggregateReport) {
        html.push_str("<footer class=\"report-footer\">\n");
        html.push_str(&format!(
            "  <p>Generated by mockingbird-report at {}</p>\n",
            format_datetime(&report.generated_at())
        ));
        html.push_str("</footer>\n");
    }
}

impl ReportFormatter for HtmlReportFormatter {
    fn format_id(&self) -> &'static str {
        "html"
    }

    #[instrument(skip_all, fields(report_id = %report.report_id()))]
    fn format(&self, report: &AggregateReport) -> String {
        self.render(report, None)
    }

    #[instrument(skip_all, fields(report_id = %report.summary().report_id()))]
    fn format_detailed(&self, report: &DetailedReport) -> String {
        self.render(report.summary(), Some(report))
    }
}

fn status_css_class(status: TestStatus) -> &'static str {
    match status {
        TestStatus::Passed => "outcome-passed",
        TestStatus::Failed => "outcome-failed",
        TestStatus::Skipped => "outcome-skipped",
    }
}

/// Embedded CSS for the HTML report.
const EMBEDDED_CSS: &str = r#"
:root {
  --color-pass: #16a34a;
  --color-fail: #dc2626;
  --color-skip: #ca8a04;
  --color-bg: #ffffff;
  --color-bg-secondary: #f3f4f6;
  --color-text: #1f2937;
  --color-text-secondary: #6b7280;
  --color-border: #e5e7eb;
}

* {
  box-sizing: border-box;
  margin: 0;
  padding: 0;
}

body {
  font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, 'Helvetica Neue', Arial, sans-serif;
  line-height: 1.6;
  color: var(--color-text);
  background-color: var(--color-bg);
  max-width: 1200px;
  margin: 0 auto;
  padding: 2rem;
}

h1, h2, h3 {
  margin-bottom: 1rem;
  font-weight: 600;
}

h1 { font-size: 2rem; }
h2 { font-size: 1.5rem; border-bottom: 2px solid var(--color-border); padding-bottom: 0.5rem; margin-top: 2rem; }
h3 { font-size: 1.25rem; }

code {
  font-family: 'SFMono-Regular', Consolas, 'Liberation Mono', Menlo, monospace;
  font-size: 0.875rem;
  background-color: var(--color-bg-secondary);
  padding: 0.125rem 0.375rem;
  border-radius: 0.25rem;
}

.report-header {
  text-align: center;
  margin-bottom: 2rem;
  padding-bottom: 2rem;
  border-bottom: 2px solid var(--color-border);
}

.status-badge {
  display: inline-block;
  padding: 0.5rem 1.5rem;
  border-radius: 9999px;
  font-weight: bold;
  font-size: 1.25rem;
  margin-top: 1rem;
  color: white;
}

.status-badge.passed { background-color: var(--color-pass); }
.status-badge.failed { background-color: var(--color-fail); }

.summary-grid {
  display: grid;
  grid-template-columns: repeat(auto-fit, minmax(280px, 1fr));
  gap: 1.5rem;
  margin-top: 1rem;
}

.summary-card {
  background-color: var(--color-bg-secondary);
  padding: 1.5rem;
  border-radius: 0.5rem;
  border: 1px solid var(--color-border);
}

dl {
  display: grid;
  grid-template-columns: auto 1fr;
  gap: 0.5rem 1rem;
}

dt {
  font-weight: 600;
  color: var(--color-text-secondary);
}

dd.passed { color: var(--color-pass); }
dd.failed { color: var(--color-fail); font-weight: bold; }
dd.skipped { color: var(--color-skip); }

table {
  width: 100%;
  border-collapse: collapse;
  margin-top: 1rem;
}

th, td {
  text-align: left;
  padding: 0.5rem 0.75rem;
  border-bottom: 1px solid var(--color-border);
}

th { background-color: var(--color-bg-secondary); }

tr.outcome-passed td:nth-child(2) { color: var(--color-pass); }
tr.outcome-failed td:nth-child(2) { color: var(--color-fail); font-weight: bold; }
tr.outcome-skipped td:nth-child(2) { color: var(--color-skip); }

.report-footer {
  margin-top: 3rem;
  padding-top: 1rem;
  border-top: 1px solid var(--color-border);
  color: var(--color-text-secondary);
  font-size: 0.875rem;
  text-align: center;
}
"#;
