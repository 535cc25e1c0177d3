//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Handler: Result<T, ApiError>                                          │
//! │                                                                         │
//! │  ValidationError / bad JSON ──► VALIDATION_ERROR  400                  │
//! │  DbError::NotFound ───────────► NOT_FOUND         404                  │
//! │  other DbError ───────────────► DATABASE_ERROR    500 (generic text)   │
//! │  PrinterError::Layout ────────► VALIDATION_ERROR  400                  │
//! │  other PrinterError ──────────► PRINTER_ERROR     502                  │
//! │                                                                         │
//! │  Body: {"success": false, "code": "...", "message": "..."}             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The browser shows `message` in a blocking alert.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::{error, warn};

use tally_core::{CoreError, ValidationError};
use tally_db::DbError;
use tally_printer::PrinterError;

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// API error returned from handlers.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// Input validation failed (400)
    ValidationError,

    /// Database operation failed (500)
    DatabaseError,

    /// Printer unreachable or job not delivered (502)
    PrinterError,
}

impl ErrorCode {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
            ErrorCode::DatabaseError => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::PrinterError => StatusCode::BAD_GATEWAY,
        }
    }
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: impl std::fmt::Display) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }
}

/// Failure payload sent to the browser.
#[derive(Serialize)]
struct FailureBody<'a> {
    success: bool,
    code: ErrorCode,
    message: &'a str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.code.status();
        let body = FailureBody {
            success: false,
            code: self.code,
            message: &self.message,
        };

        (status, Json(body)).into_response()
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, id),
            DbError::UniqueViolation { field, value } => {
                ApiError::validation(format!("{} '{}' already exists", field, value))
            }
            DbError::ForeignKeyViolation { message } => {
                warn!("Foreign key violation: {}", message);
                ApiError::validation("Invalid reference")
            }
            other => {
                // Log the real cause, return a generic message
                error!(error = %other, "Database operation failed");
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotInCart(_) => ApiError::validation(err.to_string()),
            CoreError::Validation(e) => e.into(),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<PrinterError> for ApiError {
    fn from(err: PrinterError) -> Self {
        match err {
            PrinterError::Layout(inner) => ApiError::from(inner),
            other => {
                error!(error = %other, "Printer operation failed");
                ApiError::new(ErrorCode::PrinterError, other.to_string())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ErrorCode::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::ValidationError.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::DatabaseError.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(ErrorCode::PrinterError.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_db_not_found_is_404() {
        let err: ApiError = DbError::not_found("Sale", 7).into();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Sale not found: 7");
    }

    #[test]
    fn test_db_failure_hides_details() {
        let err: ApiError = DbError::QueryFailed("no such table: sales".into()).into();
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert!(!err.message.contains("sales"));
    }

    #[test]
    fn test_printer_error_is_bad_gateway() {
        let err: ApiError = PrinterError::connection("192.168.1.100:9100", "refused").into();
        assert_eq!(err.code.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_code_serialization() {
        let json = serde_json::to_string(&ErrorCode::ValidationError).unwrap();
        assert_eq!(json, "\"VALIDATION_ERROR\"");
    }

    #[test]
    fn test_printer_layout_error_is_400() {
        let layout: ApiError = PrinterError::Layout(ValidationError::OutOfRange {
            field: "quantity".into(),
            min: 0,
            max: i64::MAX,
        })
        .into();
        assert_eq!(layout.code, ErrorCode::ValidationError);

        let down: ApiError = PrinterError::Write("broken pipe".into()).into();
        assert_eq!(down.code, ErrorCode::PrinterError);
    }
}
