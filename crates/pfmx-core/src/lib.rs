//! Shared configuration and request/row types for the `pfmx` retail KPI core.

pub mod app_config;
pub mod config;
pub mod request;
pub mod row;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use request::{Metric, NamedPeriod, Period, PeriodStep, ReportRequest, Source};
pub use row::NormalizedRow;

use thiserror::Error;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Errors raised while building a [`ReportRequest`] or parsing its tokens.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("report request needs at least one entity id")]
    EmptyEntityIds,

    #[error("report request needs at least one metric")]
    EmptyMetrics,

    #[error("unknown source: {0}")]
    UnknownSource(String),

    #[error("unknown period: {0}")]
    UnknownPeriod(String),

    #[error("unknown period step: {0}")]
    UnknownPeriodStep(String),

    #[error("unknown metric: {0}")]
    UnknownMetric(String),

    #[error("date range is reversed: {from} is after {to}")]
    ReversedRange { from: String, to: String },
}
