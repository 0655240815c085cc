//! Tracing subscriber setup for test binaries.

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

/// Errors raised while installing the global subscriber.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    /// The level string is not a valid filter directive.
    #[error("failed to parse log filter: {0}")]
    Filter(String),
}

/// Installs a global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `config.level`. A subscriber that is
/// already installed is left in place, so every test may call this.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), LoggingError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| LoggingError::Filter(e.to_string()))?;

    let span_events = if config.include_spans {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let installed = match config.format.to_lowercase().as_str() {
        "json" => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_span_events(span_events))
            .try_init(),
        "pretty" => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().pretty().with_span_events(span_events))
            .try_init(),
        _ => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact().with_span_events(span_events))
            .try_init(),
    };

    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }

    Ok(())
}
