// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};
use std::collections::HashMap;

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),
    ValidationError {
        message: String,
        field_errors: Option<HashMap<String, String>>,
    },

    // 401 Unauthorized
    Unauthorized(String),

    // 403 Forbidden
    Forbidden(String),

    // 404 Not Found
    NotFound(String),

    // 409 Conflict
    Conflict(String),

    // 429 Too Many Requests (carries Retry-After seconds)
    TooManyRequests { message: String, retry_after_secs: u64 },

    // 500 Internal Server Error
    InternalServerError(String),

    // 503 Service Unavailable
    ServiceUnavailable(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::BadRequest(_) => 400,
            ApiError::ValidationError { .. } => 400,
            ApiError::Unauthorized(_) => 401,
            ApiError::Forbidden(_) => 403,
            ApiError::NotFound(_) => 404,
            ApiError::Conflict(_) => 409,
            ApiError::TooManyRequests { .. } => 429,
            ApiError::InternalServerError(_) => 500,
            ApiError::ServiceUnavailable(_) => 503,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::ValidationError { message, .. } => message,
            ApiError::Unauthorized(msg) => msg,
            ApiError::Forbidden(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::Conflict(msg) => msg,
            ApiError::TooManyRequests { message, .. } => message,
            ApiError::InternalServerError(msg) => msg,
            ApiError::ServiceUnavailable(msg) => msg,
        }
    }

    /// Get stable error code for client handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::ValidationError { .. } => "VALIDATION_ERROR",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::TooManyRequests { .. } => "TOO_MANY_REQUESTS",
            ApiError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
            ApiError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
        }
    }

    /// Convert to the shared response envelope body
    pub fn to_json(&self) -> Value {
        match self {
            ApiError::ValidationError {
                message,
                field_errors,
            } => {
                let mut response = json!({
                    "success": false,
                    "message": message,
                    "error": "VALIDATION_ERROR"
                });

                if let Some(field_errors) = field_errors {
                    response["field_errors"] = json!(field_errors);
                }

                response
            }
            _ => {
                json!({
                    "success": false,
                    "message": self.message(),
                    "error": self.error_code()
                })
            }
        }
    }
}

// Static constructor methods
impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn validation_error(
        message: impl Into<String>,
        field_errors: Option<HashMap<String, String>>,
    ) -> Self {
        ApiError::ValidationError {
            message: message.into(),
            field_errors,
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }

    pub fn too_many_requests(message: impl Into<String>, retry_after_secs: u64) -> Self {
        ApiError::TooManyRequests {
            message: message.into(),
            retry_after_secs,
        }
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        ApiError::ServiceUnavailable(message.into())
    }
}

// Convert module error types to ApiError
impl From<crate::database::DatabaseError> for ApiError {
    fn from(err: crate::database::DatabaseError) -> Self {
        match err {
            crate::database::DatabaseError::NotFound(msg) => ApiError::not_found(msg),
            crate::database::DatabaseError::ConfigMissing(key) => {
                tracing::error!("Missing configuration: {}", key);
                ApiError::service_unavailable("Service is not configured")
            }
            crate::database::DatabaseError::Sqlx(sqlx_err) => {
                // Log the real error but return generic message
                tracing::error!("SQLx error: {}", sqlx_err);
                ApiError::internal_server_error("An error occurred while processing your request")
            }
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("SQLx error: {}", err);
        ApiError::internal_server_error("An error occurred while processing your request")
    }
}

impl From<crate::storage::StorageError> for ApiError {
    fn from(err: crate::storage::StorageError) -> Self {
        tracing::error!("Object storage error: {}", err);
        ApiError::internal_server_error("An error occurred while accessing stored files")
    }
}

impl From<crate::query::QueryError> for ApiError {
    fn from(err: crate::query::QueryError) -> Self {
        ApiError::bad_request(err.to_string())
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if let ApiError::TooManyRequests {
            retry_after_secs, ..
        } = &self
        {
            let retry_after = retry_after_secs.to_string();
            return (
                status,
                [(axum::http::header::RETRY_AFTER, retry_after)],
                Json(self.to_json()),
            )
                .into_response();
        }

        (status, Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_carries_stable_code_and_message() {
        let err = ApiError::not_found("Design not found");
        let body = err.to_json();
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "NOT_FOUND");
        assert_eq!(body["message"], "Design not found");
    }

    #[test]
    fn rate_limit_maps_to_429() {
        let err = ApiError::too_many_requests("Too many requests", 42);
        assert_eq!(err.status_code(), 429);
        assert_eq!(err.error_code(), "TOO_MANY_REQUESTS");
    }
}
