/// Error handling for the API server
///
/// This module provides a unified error type that maps to HTTP responses.
/// All handlers return `Result<T, ApiError>` which automatically converts
/// to the appropriate status code with a JSON body of the form
/// `{ "message": "..." }`. Validation failures additionally carry a
/// field-level `errors` array.
///
/// # Example
///
/// ```
/// use fiscus_api::error::{ApiError, ApiResult};
///
/// fn lookup(found: bool) -> ApiResult<&'static str> {
///     if found {
///         Ok("budget")
///     } else {
///         Err(ApiError::NotFound("Budget not found".to_string()))
///     }
/// }
/// ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400)
    BadRequest(String),

    /// Unauthorized (401)
    Unauthorized(String),

    /// Forbidden (403)
    Forbidden(String),

    /// Not found (404)
    NotFound(String),

    /// Conflict (409) - e.g., duplicate email
    Conflict(String),

    /// Validation failure (400) with per-field details
    ValidationError(Vec<ValidationErrorDetail>),

    /// Internal server error (500)
    InternalError(String),
}

/// Validation error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub message: String,

    /// Optional validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ValidationErrorDetail>>,

    /// Underlying error detail, echoed only in development mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// True when `APP_ENV=development`; anything else runs as production.
fn development_mode() -> bool {
    std::env::var("APP_ENV")
        .map(|v| v == "development")
        .unwrap_or(false)
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::ValidationError(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, errors, detail) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None, None),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg, None, None),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg, None, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg, None, None),
            ApiError::ValidationError(errors) => (
                StatusCode::BAD_REQUEST,
                "Validation failed".to_string(),
                Some(errors),
                None,
            ),
            ApiError::InternalError(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                let detail = development_mode().then_some(msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                    None,
                    detail,
                )
            }
        };

        let body = Json(ErrorResponse {
            message,
            errors,
            detail,
        });

        (status, body).into_response()
    }
}

/// Convert sqlx errors to API errors
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => {
                ApiError::NotFound("Resource not found".to_string())
            }
            sqlx::Error::Database(db_err) => {
                // Check for unique constraint violations
                if let Some(constraint) = db_err.constraint() {
                    if constraint.contains("email") {
                        return ApiError::Conflict("Email already in use".to_string());
                    }
                    return ApiError::Conflict(format!("Constraint violation: {}", constraint));
                }

                // Other database errors are internal
                ApiError::InternalError(format!("Database error: {}", db_err))
            }
            _ => ApiError::InternalError(format!("Database error: {}", err)),
        }
    }
}

/// Convert ownership errors to API errors
impl From<fiscus_shared::auth::ownership::OwnershipError> for ApiError {
    fn from(err: fiscus_shared::auth::ownership::OwnershipError) -> Self {
        match err {
            fiscus_shared::auth::ownership::OwnershipError::BudgetMissing => {
                ApiError::NotFound("Budget not found".to_string())
            }
            fiscus_shared::auth::ownership::OwnershipError::NotOwner => {
                ApiError::Forbidden("Not authorized".to_string())
            }
            fiscus_shared::auth::ownership::OwnershipError::Database(err) => err.into(),
        }
    }
}

/// Convert password errors to API errors
impl From<fiscus_shared::auth::password::PasswordError> for ApiError {
    fn from(err: fiscus_shared::auth::password::PasswordError) -> Self {
        ApiError::InternalError(format!("Password operation failed: {}", err))
    }
}

/// Convert JWT errors to API errors
impl From<fiscus_shared::auth::jwt::JwtError> for ApiError {
    fn from(err: fiscus_shared::auth::jwt::JwtError) -> Self {
        match err {
            fiscus_shared::auth::jwt::JwtError::CreateError(msg) => {
                ApiError::InternalError(format!("Token creation failed: {}", msg))
            }
            _ => ApiError::Unauthorized("Invalid token".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ApiError::BadRequest("Invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: Invalid input");

        let err = ApiError::NotFound("Budget not found".to_string());
        assert_eq!(err.to_string(), "Not found: Budget not found");
    }

    #[test]
    fn test_validation_error() {
        let errors = vec![
            ValidationErrorDetail {
                field: "email".to_string(),
                message: "Invalid email format".to_string(),
            },
            ValidationErrorDetail {
                field: "password".to_string(),
                message: "Password must be at least 6 characters".to_string(),
            },
        ];

        let err = ApiError::ValidationError(errors);
        assert_eq!(err.to_string(), "Validation failed: 2 errors");
    }

    #[test]
    fn test_error_response_omits_errors_when_none() {
        let response = ErrorResponse {
            message: "Budget not found".to_string(),
            errors: None,
            detail: None,
        };

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["message"], "Budget not found");
        assert!(value.get("errors").is_none());
        assert!(value.get("detail").is_none());
    }

    #[test]
    fn test_error_response_serializes_detail_when_present() {
        let response = ErrorResponse {
            message: "An internal error occurred".to_string(),
            errors: None,
            detail: Some("Database error: connection refused".to_string()),
        };

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["detail"], "Database error: connection refused");
    }

    #[test]
    fn test_row_not_found_maps_to_404() {
        let err: ApiError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[test]
    fn test_jwt_validation_error_maps_to_401() {
        let err: ApiError =
            fiscus_shared::auth::jwt::JwtError::Expired.into();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }
}
