//! Destinations for rendered reports.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use mockingbird_core::ReportingSettings;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::types::ReportError;

/// Receives rendered reports.
#[async_trait]
pub trait ReportSink: Send + Sync {
    /// Store `contents`, rendered in the format whose file extension is
    /// `format`.
    async fn write_report(&self, format: &str, contents: &str) -> Result<(), ReportError>;
}

/// Writes each report to `<dir>/<base_name>.<format>` as UTF-8, creating the
/// directory on first use.
#[derive(Debug, Clone)]
pub struct FileSink {
    dir: PathBuf,
    base_name: String,
}

impl FileSink {
    /// A sink writing `<dir>/<base_name>.<format>`.
    pub fn new(dir: impl Into<PathBuf>, base_name: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            base_name: base_name.into(),
        }
    }

    /// A sink writing into the configured output directory.
    pub fn from_settings(settings: &ReportingSettings, base_name: impl Into<String>) -> Self {
        Self::new(settings.output_dir.clone(), base_name)
    }

    /// Directory reports are written into.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path a report in `format` is written to.
    pub fn path_for(&self, format: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", self.base_name, format))
    }
}

#[async_trait]
impl ReportSink for FileSink {
    async fn write_report(&self, format: &str, contents: &str) -> Result<(), ReportError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.path_for(format);
        tokio::fs::write(&path, contents).await?;
        info!(path = %path.display(), bytes = contents.len(), "Report written");
        Ok(())
    }
}

/// Keeps rendered reports in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    reports: Mutex<Vec<(String, String)>>,
}

impl MemorySink {
    /// An empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// `(format, contents)` pairs in the order they were written.
    pub async fn reports(&self) -> Vec<(String, String)> {
        self.reports.lock().await.clone()
    }

    /// The most recent report written in `format`.
    pub async fn get(&self, format: &str) -> Option<String> {
        self.reports
            .lock()
            .await
            .iter()
            .rev()
            .find(|(f, _)| f == format)
            .map(|(_, contents)| contents.clone())
    }
}

#[async_trait]
impl ReportSink for MemorySink {
    async fn write_report(&self, format: &str, contents: &str) -> Result<(), ReportError> {
        debug!(format, bytes = contents.len(), "Report captured");
        self.reports
            .lock()
            .await
            .push((format.to_string(), contents.to_string()));
        Ok(())
    }
}
