//! # Application Errors
//!
//! Error types for the orchestration layer.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Fluxo                                  │
//! │                                                                         │
//! │  ValidationError ──► CoreError ──┐                                     │
//! │                                   ├──► AppError ──► ApiError ──► UI    │
//! │  RecordStore / config / I/O ─────┘      (typed)     (code + message)   │
//! │                                                                         │
//! │  The front end receives:                                               │
//! │    { "code": "VALIDATION_ERROR", "message": "valor must be positive" } │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use thiserror::Error;
use ts_rs::TS;

use fluxo_core::{CoreError, ValidationError};

/// Result type alias for application operations.
pub type AppResult<T> = Result<T, AppError>;

/// Everything that can go wrong above the pure core.
#[derive(Debug, Error)]
pub enum AppError {
    // =========================================================================
    // Domain Errors
    // =========================================================================
    /// Business rule or validation failure.
    #[error(transparent)]
    Core(#[from] CoreError),

    // =========================================================================
    // Persistence Errors
    // =========================================================================
    /// Record does not exist in the store.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// The persistence collaborator rejected or failed the operation.
    #[error("Store error: {0}")]
    Store(String),

    /// Submitting without an authenticated user.
    #[error("No authenticated user in session")]
    Unauthenticated,

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Failed to save the config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    /// Config file could not be parsed.
    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Config could not be serialized.
    #[error("Failed to serialize config: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    // =========================================================================
    // I/O and Serialization
    // =========================================================================
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Core(CoreError::Validation(err))
    }
}

// =============================================================================
// API Error
// =============================================================================

/// Error payload returned to the front end.
///
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Lançamento not found: 5f1c..."
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,

    /// Field to highlight in the form, for validation failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub field: Option<String>,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Missing field, non-positive amount, bad document (400)
    ValidationError,

    /// NaN / non-finite / disallowed-sign currency value (400)
    InvalidAmount,

    /// Resource not found (404)
    NotFound,

    /// No user in session (401)
    Unauthorized,

    /// Persistence collaborator failure (502)
    StoreError,

    /// Anything else (500)
    Internal,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
            field: None,
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn validation(err: &ValidationError) -> Self {
        ApiError {
            code: ErrorCode::ValidationError,
            message: err.to_string(),
            field: Some(err.field().to_string()),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidAmount { reason } => {
                ApiError::new(ErrorCode::InvalidAmount, format!("Invalid amount: {reason}"))
            }
            CoreError::Validation(e) => ApiError::validation(&e),
        }
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::Core(e) => e.into(),
            AppError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            AppError::Unauthenticated => {
                ApiError::new(ErrorCode::Unauthorized, "Sessão expirada, faça login novamente")
            }
            AppError::Store(e) => {
                // Log the backend message but return a generic one
                tracing::error!("Store operation failed: {}", e);
                ApiError::new(ErrorCode::StoreError, "Falha ao comunicar com o servidor")
            }
            other => {
                tracing::error!("Internal error: {}", other);
                ApiError::internal("Erro interno")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_maps_to_field() {
        let err: AppError = ValidationError::MustBePositive {
            field: "valor".to_string(),
        }
        .into();
        let api: ApiError = err.into();
        assert_eq!(api.code, ErrorCode::ValidationError);
        assert_eq!(api.field.as_deref(), Some("valor"));
        assert_eq!(api.message, "valor must be positive");
    }

    #[test]
    fn test_invalid_amount_code() {
        let api: ApiError = CoreError::InvalidAmount {
            reason: "NaN".to_string(),
        }
        .into();
        assert_eq!(api.code, ErrorCode::InvalidAmount);
    }

    #[test]
    fn test_store_error_hides_details() {
        let api: ApiError = AppError::Store("relation \"lancamentos\" does not exist".to_string()).into();
        assert_eq!(api.code, ErrorCode::StoreError);
        assert!(!api.message.contains("lancamentos"));
    }

    #[test]
    fn test_serialization() {
        let api = ApiError::not_found("Lançamento", "abc");
        let json = serde_json::to_value(&api).unwrap();
        assert_eq!(json["code"], "NOT_FOUND");
        assert_eq!(json["message"], "Lançamento not found: abc");
        assert!(json.get("field").is_none());
    }
}
