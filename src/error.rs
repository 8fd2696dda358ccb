//! Error types for loading and parsing the vehicle licensing dataset.

use thiserror::Error;

/// Errors raised while turning the CSV source into [`ParsedRecord`]s.
///
/// Only [`AggregatorError::MalformedRecord`] is recoverable: [`parse`] skips the
/// offending row and keeps going. An empty filter or grouping result is never
/// an error; it is an empty `Vec`.
///
/// [`ParsedRecord`]: crate::record::ParsedRecord
/// [`parse`]: crate::parser::parse
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AggregatorError {
    #[error("Malformed record at row {row}: {reason}")]
    MalformedRecord { row: usize, reason: String },

    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Source unavailable ({location}): {reason}")]
    SourceUnavailable { location: String, reason: String },
}

impl AggregatorError {
    pub fn malformed(row: usize, reason: impl Into<String>) -> Self {
        AggregatorError::MalformedRecord {
            row,
            reason: reason.into(),
        }
    }

    pub fn unavailable(location: impl Into<String>, reason: impl ToString) -> Self {
        AggregatorError::SourceUnavailable {
            location: location.into(),
            reason: reason.to_string(),
        }
    }

    /// Returns true if the caller can skip the failing row and continue.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, AggregatorError::MalformedRecord { .. })
    }
}
