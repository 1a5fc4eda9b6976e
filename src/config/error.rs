//! Configuration error types.

use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Port value is outside valid range (1-65535).
    #[error("invalid port '{value}': must be between 1 and 65535")]
    InvalidPort { value: String },

    /// Port string could not be parsed as a number.
    #[error("failed to parse port '{value}': {source}")]
    PortParseError {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    /// Bind address string could not be parsed.
    #[error("failed to parse bind address '{value}': {source}")]
    InvalidBindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },

    /// A required environment variable was not set.
    ///
    /// # Current usage
    ///
    /// `MODEL_API_TOKEN`, `STORE_URI` and `STORE_DATABASE_NAME` are required
    /// in production; this variant is what `validate()` returns for them.
    /// Every other key has a graceful default.
    #[error("missing required environment variable: {name}")]
    MissingEnvVar { name: &'static str },

    /// A `QUALITY_*` weight or threshold could not be parsed as a float.
    #[error("failed to parse {name}='{value}' as a float: {source}")]
    FloatParseError {
        name: &'static str,
        value: String,
        #[source]
        source: std::num::ParseFloatError,
    },

    /// The five quality weights must sum to 1.0 within rounding.
    #[error("quality weights must sum to 1.0 (within 0.01), got {sum}")]
    WeightsDoNotSumToOne { sum: f64 },

    /// `SHOP_CATEGORY_LABELS_FILE` was set but could not be read or parsed.
    #[error("failed to load shop category labels from '{path}': {source}")]
    CategoryLabelsFile {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
