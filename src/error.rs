//! Error taxonomy shared by every calculation in the crate

use thiserror::Error;

/// Errors raised by the amortization, mortality and pricing engines
#[derive(Debug, Error)]
pub enum LoanCoverError {
    /// A loan or insurance parameter is outside its domain
    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    /// The mortality source is missing, malformed or breaks the qx rules
    #[error("Mortality source error: {0}")]
    SourceData(String),

    /// Two monthly sequences that must be aligned have different lengths
    #[error("Dimension mismatch in {context}: {left} vs {right} entries")]
    DimensionMismatch {
        context: String,
        left: usize,
        right: usize,
    },

    /// The insured age range cannot be served by the mortality table
    #[error("Age range error: {reason} (ages: {ages:?})")]
    AgeRange { reason: String, ages: Vec<u32> },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl LoanCoverError {
    pub fn invalid_input(field: &str, reason: impl Into<String>) -> Self {
        LoanCoverError::InvalidInput {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub fn dimension_mismatch(context: &str, left: usize, right: usize) -> Self {
        LoanCoverError::DimensionMismatch {
            context: context.to_string(),
            left,
            right,
        }
    }

    /// Whether the error comes from the caller's parameters rather than the data source
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            LoanCoverError::InvalidInput { .. } | LoanCoverError::AgeRange { .. }
        )
    }
}

impl From<csv::Error> for LoanCoverError {
    fn from(e: csv::Error) -> Self {
        LoanCoverError::Serialization(e.to_string())
    }
}

impl From<serde_json::Error> for LoanCoverError {
    fn from(e: serde_json::Error) -> Self {
        LoanCoverError::Serialization(e.to_string())
    }
}

impl From<std::io::Error> for LoanCoverError {
    fn from(e: std::io::Error) -> Self {
        LoanCoverError::Serialization(e.to_string())
    }
}

pub type LoanCoverResult<T> = Result<T, LoanCoverError>;
