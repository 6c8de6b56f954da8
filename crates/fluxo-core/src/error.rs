//! # Error Types
//!
//! Domain-specific error types for fluxo-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  fluxo-core errors (this file)                                         │
//! │  ├── CoreError        - InvalidAmount and wrapped validation failures  │
//! │  └── ValidationError  - ValidationFailed: missing/invalid form fields  │
//! │                                                                         │
//! │  fluxo-app errors (separate crate)                                     │
//! │  ├── AppError         - store, config and I/O failures                 │
//! │  └── ApiError         - what the front end sees (serialized)           │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → AppError → ApiError → Front end   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## What Is NOT an Error
//! Parsing and formatting never fail: bad currency input parses to zero and
//! formats as `R$ 0,00`. Degenerate denominators in the pricing and
//! break-even formulas resolve to zero rates or
//! [`BreakEvenRevenue::Unreachable`](crate::break_even::BreakEvenRevenue),
//! so there is no division-by-zero variant here.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A monetary value is NaN, infinite, out of range, or has a sign the
    /// field does not allow.
    ///
    /// ## User Workflow
    /// ```text
    /// Saldo inicial: "-150,00" on a field that forbids negatives
    ///      │
    ///      ▼
    /// currency::validate(-15000, SignPolicy::NonNegative)
    ///      │
    ///      ▼
    /// InvalidAmount { reason: "negative values are not allowed" }
    ///      │
    ///      ▼
    /// Form shows: "Valor inválido" and keeps the user on the field
    /// ```
    #[error("Invalid amount: {reason}")]
    InvalidAmount { reason: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Submission validation failures.
///
/// Returned when a form is submitted with a missing or malformed field.
/// Each variant names the field so the UI can highlight it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive (amount on submission).
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., CPF with 10 digits, malformed date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

impl ValidationError {
    /// Name of the offending field.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::TooLong { field, .. }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::MustBePositive { field }
            | ValidationError::InvalidFormat { field, .. }
            | ValidationError::NotAllowed { field, .. } => field,
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InvalidAmount {
            reason: "NaN is not a finite number".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid amount: NaN is not a finite number");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "categoria".to_string(),
        };
        assert_eq!(err.to_string(), "categoria is required");
        assert_eq!(err.field(), "categoria");

        let err = ValidationError::MustBePositive {
            field: "valor".to_string(),
        };
        assert_eq!(err.to_string(), "valor must be positive");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "data".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
