//! JSON report rendering.
//!
//! Durations are written as floating point seconds and timestamps as
//! RFC 3339 strings. Rendering through [`ReportFormatter`] is best-effort:
//! a serialization failure is logged and yields `{}`.

use std::io::Write;

use serde::Serialize;
use serde_json::ser::{CompactFormatter, PrettyFormatter, Serializer};
use tracing::{instrument, warn};

use crate::formatter::ReportFormatter;
use crate::types::{AggregateReport, DetailedReport, ReportError};

/// Output used when a report cannot be serialized.
pub const EMPTY_JSON: &str = "{}";

/// JSON report format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Compact JSON (single line, minimal whitespace).
    Compact,
    /// Pretty-printed JSON with indentation.
    #[default]
    Pretty,
    /// Pretty-printed with custom indentation.
    PrettyIndent(usize),
}

/// Configuration for JSON report generation.
#[derive(Debug, Clone, Default)]
pub struct JsonReportConfig {
    /// Output format.
    pub format: JsonFormat,
}

impl JsonReportConfig {
    /// Create a compact configuration (smaller output).
    pub fn compact() -> Self {
        Self {
            format: JsonFormat::Compact,
        }
    }
}

/// JSON report formatter.
#[derive(Debug, Clone, Default)]
pub struct JsonReportFormatter {
    config: JsonReportConfig,
}

impl JsonReportFormatter {
    /// A pretty-printing formatter.
    pub fn new() -> Self {
        Self::default()
    }

    /// A formatter with the given configuration.
    pub fn with_config(config: JsonReportConfig) -> Self {
        Self { config }
    }

    /// Serialize `value` with the configured layout.
    pub fn generate<T: Serialize + ?Sized>(&self, value: &T) -> Result<String, ReportError> {
        let mut writer = Vec::new();
        self.generate_to_writer(value, &mut writer)?;
        String::from_utf8(writer).map_err(|e| {
            ReportError::SerializationError(serde_json::Error::io(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                e,
            )))
        })
    }

    /// Serialize `value` into a writer with the configured layout.
    pub fn generate_to_writer<T: Serialize + ?Sized, W: Write>(
        &self,
        value: &T,
        mut writer: W,
    ) -> Result<(), ReportError> {
        match self.config.format {
            JsonFormat::Compact => {
                let mut serializer = Serializer::with_formatter(&mut writer, CompactFormatter);
                value.serialize(&mut serializer)?;
            }
            JsonFormat::Pretty => {
                let mut serializer = Serializer::with_formatter(&mut writer, PrettyFormatter::new());
                value.serialize(&mut serializer)?;
            }
            JsonFormat::PrettyIndent(indent) => {
                let indent_str = " ".repeat(indent);
                let formatter = PrettyFormatter::with_indent(indent_str.as_bytes());
                let mut serializer = Serializer::with_formatter(&mut writer, formatter);
                value.serialize(&mut serializer)?;
            }
        }
        Ok(())
    }

    fn generate_or_empty<T: Serialize + ?Sized>(&self, value: &T) -> String {
        self.generate(value).unwrap_or_else(|e| {
            warn!(error = %e, "JSON report serialization failed, emitting empty object");
            EMPTY_JSON.to_string()
        })
    }
}

impl ReportFormatter for JsonReportFormatter {
    fn format_id(&self) -> &'static str {
        "json"
    }

    #[instrument(skip_all, fields(report_id = %report.report_id()))]
    fn format(&self, report: &AggregateReport) -> String {
        self.generate_or_empty(report)
    }

    #[instrument(skip_all, fields(report_id = %report.summary().report_id()))]
    fn format_detailed(&self, report: &DetailedReport) -> String {
        self.generate_or_empty(report)
    }
}
