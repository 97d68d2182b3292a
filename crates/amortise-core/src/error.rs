use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// How two adjacent rate regimes fail to line up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoverageFault {
    /// At least one calendar month between the regimes has no rate.
    Gap,
    /// The regimes share at least one calendar month.
    Overlap,
    /// The regime starts between two scheduled payment dates.
    OffGrid,
}

impl fmt::Display for CoverageFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoverageFault::Gap => write!(f, "gap"),
            CoverageFault::Overlap => write!(f, "overlap"),
            CoverageFault::OffGrid => write!(f, "off-grid start"),
        }
    }
}

#[derive(Debug, Error)]
pub enum AmortiseError {
    #[error("Invalid term: {periods} periods (must be > 0)")]
    InvalidTerm { periods: i64 },

    #[error("Invalid principal: {principal} (must be > 0)")]
    InvalidPrincipal { principal: Decimal },

    #[error("Rate coverage {kind} at regime {index}: previous regime ends {previous_end}, next starts {next_start}")]
    RateCoverage {
        index: usize,
        previous_end: NaiveDate,
        next_start: NaiveDate,
        kind: CoverageFault,
    },

    #[error("Incomplete rate coverage: regimes cover {covered_from} to {covered_until}, loan requires {required_from} to {required_until}")]
    IncompleteCoverage {
        covered_from: NaiveDate,
        covered_until: NaiveDate,
        required_from: NaiveDate,
        required_until: NaiveDate,
    },

    #[error("Configuration error: {field} — {reason}")]
    Configuration { field: String, reason: String },

    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Date error: {0}")]
    DateError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for AmortiseError {
    fn from(e: serde_json::Error) -> Self {
        AmortiseError::SerializationError(e.to_string())
    }
}
