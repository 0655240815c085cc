//! # mockingbird-core
//!
//! Shared vocabulary for the mockingbird test tooling crates.
//!
//! - [`TestOutcome`] / [`TestStatus`]: results handed over by the host test
//!   runner and consumed by `mockingbird-report`
//! - [`ErrorValue`] / [`ErrorKind`]: errors tagged with an explicit kind, used
//!   both by mock failures and by failure analysis in reports
//! - [`MockingbirdConfig`]: TOML-loadable settings for mocks, reporting and
//!   logging
//! - [`logging::init_tracing`]: subscriber setup for test binaries

pub mod config;
pub mod error_value;
pub mod logging;
pub mod outcome;
pub mod serde_helpers;

pub use config::{
    builtin_report_format, ConfigError, LoggingConfig, MockSettings, MockingbirdConfig,
    ReportingSettings, REPORT_FORMATS,
};
pub use error_value::{ErrorKind, ErrorValue};
pub use outcome::{TestOutcome, TestStatus};
