use std::path::PathBuf;
use thiserror::Error;

pub mod model;

pub use model::{MeasurementSet, Metric, UrlSamples};

/// Error types for PaintStats operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PaintStatsError {
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Malformed JSON: {0}")]
    MalformedJson(String),

    #[error("Missing metric key {key:?} in {location}")]
    MissingMetricKey { key: String, location: String },

    #[error("Misaligned series: {detail}")]
    AlignmentError { detail: String },

    #[error("Series is empty: {0}")]
    EmptySeries(String),

    #[error("Domain error: {0}")]
    DomainError(String),

    #[error("Division by zero: baseline is 0 at index {index}")]
    DivisionByZero { index: usize },

    #[error("Percentile fraction {0} is outside [0, 1]")]
    InvalidPercentile(f64),

    #[error("Invalid chart: {0}")]
    InvalidChart(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for PaintStats operations
pub type Result<T> = std::result::Result<T, PaintStatsError>;
