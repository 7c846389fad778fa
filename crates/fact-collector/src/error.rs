//! Validation Error Types

use thiserror::Error;

/// Errors during input validation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Value out of allowed range
    #[error("{field} value {value} is out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Invalid data format
    #[error("Invalid data format for {field}: {reason}")]
    InvalidFormat {
        field: &'static str,
        reason: String,
    },
}

impl ValidationError {
    /// Name of the offending input field
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::OutOfRange { field, .. } => field,
            ValidationError::InvalidFormat { field, .. } => field,
        }
    }
}

/// Errors while turning form input into a fact set
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CollectError {
    /// One or more readings failed validation; no facts were produced
    #[error("Input rejected: {}", join_errors(.0))]
    Rejected(Vec<ValidationError>),
}

impl CollectError {
    /// The individual validation failures
    pub fn errors(&self) -> &[ValidationError] {
        match self {
            CollectError::Rejected(errors) => errors,
        }
    }
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
