//! The formatter trait and the registry that selects formatters by id.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use mockingbird_core::{builtin_report_format, ReportingSettings};
use tracing::{debug, info, instrument};

use crate::html::HtmlReportFormatter;
use crate::json::{JsonFormat, JsonReportConfig, JsonReportFormatter};
use crate::sink::ReportSink;
use crate::text::TextReportFormatter;
use crate::types::{AggregateReport, DetailedReport, ReportError};
use crate::xml::{XmlReportConfig, XmlReportFormatter};

/// Renders reports into one output format.
///
/// Rendering never fails: formats that cannot represent something degrade to
/// a minimal valid document instead.
pub trait ReportFormatter: Send + Sync {
    /// Id the formatter is registered under, e.g. `"json"`.
    fn format_id(&self) -> &'static str;

    /// File extension for exported reports, without the dot.
    fn file_extension(&self) -> &'static str {
        self.format_id()
    }

    /// Render the summary report.
    fn format(&self, report: &AggregateReport) -> String;

    /// Render the detailed report.
    ///
    /// Formatters without a detailed rendering fall back to [`format`] on the
    /// summary.
    ///
    /// [`format`]: ReportFormatter::format
    fn format_detailed(&self, report: &DetailedReport) -> String {
        self.format(report.summary())
    }
}

/// Built-in output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportFormat {
    Text,
    Json,
    Html,
    Xml,
}

impl ReportFormat {
    /// Every built-in format, in rendering order.
    pub const ALL: [ReportFormat; 4] = [
        ReportFormat::Text,
        ReportFormat::Json,
        ReportFormat::Html,
        ReportFormat::Xml,
    ];

    /// Canonical id, which is also the file extension.
    pub fn id(&self) -> &'static str {
        match self {
            ReportFormat::Text => "txt",
            ReportFormat::Json => "json",
            ReportFormat::Html => "html",
            ReportFormat::Xml => "xml",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ReportFormat {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = builtin_report_format(s);
        ReportFormat::ALL
            .into_iter()
            .find(|format| Some(format.id()) == id)
            .ok_or_else(|| ReportError::UnsupportedFormat(s.to_string()))
    }
}

/// Maps format ids to formatters.
///
/// Build it once with [`with_defaults`](FormatterRegistry::with_defaults) or
/// [`from_settings`](FormatterRegistry::from_settings), add custom formatters
/// with [`register`](FormatterRegistry::register), then share it immutably.
#[derive(Clone, Default)]
pub struct FormatterRegistry {
    formatters: BTreeMap<String, Arc<dyn ReportFormatter>>,
}

impl fmt::Debug for FormatterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormatterRegistry")
            .field("formats", &self.formats())
            .finish()
    }
}

impl FormatterRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the text, JSON, HTML and XML formatters.
    pub fn with_defaults() -> Self {
        Self::from_settings(&ReportingSettings::default())
    }

    /// A registry with the built-in formatters configured from settings.
    pub fn from_settings(settings: &ReportingSettings) -> Self {
        let json_format = if settings.pretty_json {
            JsonFormat::Pretty
        } else {
            JsonFormat::Compact
        };

        let mut registry = Self::new();
        registry.register(Arc::new(TextReportFormatter::new()));
        registry.register(Arc::new(JsonReportFormatter::with_config(JsonReportConfig {
            format: json_format,
        })));
        registry.register(Arc::new(HtmlReportFormatter::new()));
        registry.register(Arc::new(XmlReportFormatter::with_config(XmlReportConfig {
            category_delimiter: settings.category_delimiter.clone(),
            ..XmlReportConfig::default()
        })));
        registry
    }

    /// Registers a formatter under its id, returning the one it replaces.
    pub fn register(
        &mut self,
        formatter: Arc<dyn ReportFormatter>,
    ) -> Option<Arc<dyn ReportFormatter>> {
        let id = formatter.format_id().to_ascii_lowercase();
        debug!(format = %id, "Registering report formatter");
        self.formatters.insert(id, formatter)
    }

    /// Registered format ids, sorted.
    pub fn formats(&self) -> Vec<&str> {
        self.formatters.keys().map(String::as_str).collect()
    }

    /// Looks up the formatter for `format`, ignoring case.
    ///
    /// A formatter registered under exactly that id wins. Otherwise built-in
    /// aliases such as `"text"` or `"htm"` resolve to their canonical id.
    pub fn get(&self, format: &str) -> Result<Arc<dyn ReportFormatter>, ReportError> {
        let key = format.trim().to_ascii_lowercase();

        self.formatters
            .get(&key)
            .or_else(|| builtin_report_format(&key).and_then(|id| self.formatters.get(id)))
            .cloned()
            .ok_or_else(|| ReportError::UnsupportedFormat(format.to_string()))
    }

    /// Renders the summary report in `format`.
    pub fn render(&self, format: &str, report: &AggregateReport) -> Result<String, ReportError> {
        Ok(self.get(format)?.format(report))
    }

    /// Renders the detailed report in `format`.
    pub fn render_detailed(
        &self,
        format: &str,
        report: &DetailedReport,
    ) -> Result<String, ReportError> {
        Ok(self.get(format)?.format_detailed(report))
    }

    /// Renders the summary report and writes it to `path`.
    #[instrument(skip(self, report, path), fields(path = %path.as_ref().display()))]
    pub fn export(
        &self,
        format: &str,
        report: &AggregateReport,
        path: impl AsRef<Path>,
    ) -> Result<(), ReportError> {
        let contents = self.render(format, report)?;
        std::fs::write(path.as_ref(), contents)?;
        info!(format, "Report exported");
        Ok(())
    }

    /// Renders the detailed report and writes it to `path`.
    #[instrument(skip(self, report, path), fields(path = %path.as_ref().display()))]
    pub fn export_detailed(
        &self,
        format: &str,
        report: &DetailedReport,
        path: impl AsRef<Path>,
    ) -> Result<(), ReportError> {
        let contents = self.render_detailed(format, report)?;
        std::fs::write(path.as_ref(), contents)?;
        info!(format, "Detailed report exported");
        Ok(())
    }

    /// Like [`export`](FormatterRegistry::export) without blocking the runtime.
    #[instrument(skip(self, report, path), fields(path = %path.as_ref().display()))]
    pub async fn export_async(
        &self,
        format: &str,
        report: &AggregateReport,
        path: impl AsRef<Path>,
    ) -> Result<(), ReportError> {
        let contents = self.render(format, report)?;
        tokio::fs::write(path.as_ref(), contents).await?;
        info!(format, "Report exported");
        Ok(())
    }

    /// Renders the summary report and hands it to `sink`, keyed by the
    /// formatter's file extension.
    pub async fn publish(
        &self,
        format: &str,
        report: &AggregateReport,
        sink: &dyn ReportSink,
    ) -> Result<(), ReportError> {
        let formatter = self.get(format)?;
        let contents = formatter.format(report);
        sink.write_report(formatter.file_extension(), &contents).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::ResultAggregator;
    use crate::sink::MemorySink;
    use mockingbird_core::{ErrorValue, TestOutcome};
    use std::time::Duration;

    struct CsvFormatter;

    impl ReportFormatter for CsvFormatter {
        fn format_id(&self) -> &'static str {
            "csv"
        }

        fn format(&self, report: &AggregateReport) -> String {
            let mut out = String::from("name,status\n");
            for outcome in report.outcomes() {
                out.push_str(&format!("{},{}\n", outcome.name(), outcome.status().label()));
            }
            out
        }
    }

    fn sample_report() -> AggregateReport {
        ResultAggregator::new().aggregate(&[
            TestOutcome::passed("Login_ok", Duration::from_millis(12)),
            TestOutcome::failed("Login_bad", Duration::from_millis(30), ErrorValue::timeout("slow")),
        ])
    }

    #[test]
    fn test_parse_format_aliases() {
        assert_eq!("TXT".parse::<ReportFormat>().unwrap(), ReportFormat::Text);
        assert_eq!("text".parse::<ReportFormat>().unwrap(), ReportFormat::Text);
        assert_eq!(" Json ".parse::<ReportFormat>().unwrap(), ReportFormat::Json);
        assert_eq!("htm".parse::<ReportFormat>().unwrap(), ReportFormat::Html);
        assert_eq!("xml".parse::<ReportFormat>().unwrap(), ReportFormat::Xml);
        assert!(matches!(
            "pdf".parse::<ReportFormat>(),
            Err(ReportError::UnsupportedFormat(f)) if f == "pdf"
        ));
    }

    #[test]
    fn test_defaults_cover_builtin_formats() {
        let registry = FormatterRegistry::with_defaults();
        assert_eq!(registry.formats(), vec!["html", "json", "txt", "xml"]);

        for format in ReportFormat::ALL {
            assert_eq!(registry.get(format.id()).unwrap().format_id(), format.id());
        }
        assert_eq!(registry.get("TEXT").unwrap().format_id(), "txt");
    }

    #[test]
    fn test_unsupported_format() {
        let registry = FormatterRegistry::with_defaults();
        let err = registry.render("pdf", &sample_report()).unwrap_err();
        assert!(matches!(err, ReportError::UnsupportedFormat(ref f) if f == "pdf"));
        assert_eq!(err.to_string(), "Unsupported report format: pdf");
    }

    #[test]
    fn test_unsupported_format_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.pdf");
        let registry = FormatterRegistry::with_defaults();

        let result = registry.export("pdf", &sample_report(), &path);

        assert!(matches!(result, Err(ReportError::UnsupportedFormat(_))));
        assert!(!path.exists());
    }

    #[test]
    fn test_export_writes_rendered_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        let registry = FormatterRegistry::with_defaults();
        let report = sample_report();

        registry.export("json", &report, &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, registry.render("json", &report).unwrap());
    }

    #[tokio::test]
    async fn test_export_async() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.xml");
        let registry = FormatterRegistry::with_defaults();

        registry
            .export_async("xml", &sample_report(), &path)
            .await
            .unwrap();

        let written = tokio::fs::read_to_string(&path).await.unwrap();
        assert!(written.starts_with("<?xml"));

        let missing = dir.path().join("report.pdf");
        assert!(registry
            .export_async("pdf", &sample_report(), &missing)
            .await
            .is_err());
        assert!(!missing.exists());
    }

    #[test]
    fn test_register_custom_formatter() {
        let mut registry = FormatterRegistry::with_defaults();
        assert!(registry.register(Arc::new(CsvFormatter)).is_none());

        let csv = registry.render("CSV", &sample_report()).unwrap();
        assert_eq!(csv, "name,status\nLogin_ok,passed\nLogin_bad,failed\n");

        // No detailed rendering, so the summary is used.
        let detailed = ResultAggregator::new().aggregate_detailed(sample_report().outcomes());
        assert_eq!(registry.render_detailed("csv", &detailed).unwrap(), csv);
    }

    #[test]
    fn test_formatter_registered_under_alias_id_is_reachable() {
        struct PlainFormatter;

        impl ReportFormatter for PlainFormatter {
            fn format_id(&self) -> &'static str {
                "text"
            }

            fn format(&self, report: &AggregateReport) -> String {
                format!("{} tests\n", report.total_tests())
            }
        }

        let mut registry = FormatterRegistry::with_defaults();
        assert!(registry.register(Arc::new(PlainFormatter)).is_none());
        let report = sample_report();

        assert_eq!(registry.render("text", &report).unwrap(), "2 tests\n");
        assert_eq!(registry.render("TEXT", &report).unwrap(), "2 tests\n");
        assert!(registry
            .render("txt", &report)
            .unwrap()
            .starts_with("Test Report"));
        assert_eq!(registry.get("htm").unwrap().format_id(), "html");
    }

    #[test]
    fn test_builtin_formats_match_core_ids() {
        for (id, aliases) in mockingbird_core::REPORT_FORMATS {
            let format: ReportFormat = id.parse().unwrap();
            assert_eq!(format.id(), id);
            for alias in aliases {
                assert_eq!(alias.parse::<ReportFormat>().unwrap(), format);
            }
        }
        assert_eq!(ReportFormat::ALL.len(), mockingbird_core::REPORT_FORMATS.len());
    }

    #[test]
    fn test_settings_select_compact_json() {
        let settings = ReportingSettings {
            pretty_json: false,
            ..ReportingSettings::default()
        };
        let json = FormatterRegistry::from_settings(&settings)
            .render("json", &sample_report())
            .unwrap();
        assert!(!json.contains('\n'));
    }

    #[tokio::test]
    async fn test_publish_to_sink() {
        let registry = FormatterRegistry::with_defaults();
        let sink = MemorySink::new();

        registry.publish("text", &sample_report(), &sink).await.unwrap();

        let reports = sink.reports().await;
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].0, "txt");
        assert!(reports[0].1.contains("Login_bad"));
    }
}
