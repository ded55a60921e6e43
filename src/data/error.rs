//! Error types for the census data layer.
//!
//! Two layers:
//! - [`FieldError`]: one combined text field could not be parsed. Loaders
//!   never propagate it; they zero-fill and record a `FieldIssue`.
//! - [`CensusError`]: everything a caller has to report to the user
//!   (missing files, unreadable CSV, bad criteria).

use std::path::PathBuf;

use thiserror::Error;

use super::model::SchoolLevel;

/// A malformed combined field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("'{raw}' does not match <total>(<special>)")]
    NoMatch { raw: String },

    #[error("special count {special} exceeds total {total}")]
    SpecialExceedsTotal { total: u32, special: u32 },

    #[error("'{raw}' has no leading digits")]
    NoLeadingDigits { raw: String },

    #[error("'{raw}' is out of range")]
    OutOfRange { raw: String },

    #[error("'{raw}' is not a decimal number")]
    NotDecimal { raw: String },

    #[error("row ends before this column")]
    MissingCell,
}

/// Top-level error type for the census pipeline.
#[derive(Debug, Error)]
pub enum CensusError {
    #[error("file not found: {}", path.display())]
    MissingFile { path: PathBuf },

    #[error("CSV error in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("CSV export failed: {0}")]
    Export(#[source] csv::Error),

    #[error("{} has no '{column}' column", path.display())]
    MissingColumn { path: PathBuf, column: String },

    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{0} is not an aggregated school level")]
    NotAggregated(SchoolLevel),

    #[error("invalid sampling criteria: {0}")]
    InvalidCriteria(String),

    #[error("invalid configuration in {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl CensusError {
    /// Create an IO error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    pub(crate) fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            source,
        }
    }

    /// Whether the error only means an input file is absent.
    pub fn is_missing_file(&self) -> bool {
        matches!(self, Self::MissingFile { .. })
    }
}

/// Result type alias for the census pipeline.
pub type Result<T> = std::result::Result<T, CensusError>;
