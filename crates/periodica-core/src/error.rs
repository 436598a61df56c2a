use crate::duration::format_duration;
use chrono::Duration;
use thiserror::Error;

/// Result type alias for feature computation
pub type Result<T> = std::result::Result<T, FeatureError>;

/// Feature computation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FeatureError {
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid period: {0}")]
    InvalidPeriod(String),

    #[error(
        "Sampling frequency must be at least two times the period to obtain meaningful results. \
         Sampling frequency = {}, period = {}",
        format_duration(.sampling),
        format_duration(.period)
    )]
    InsufficientSampling { sampling: Duration, period: Duration },

    #[error("Index conversion error: {0}")]
    IndexConversion(String),

    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to read configuration file {path}: {source}")]
    ReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration parse error: {0}")]
    ParseError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}
