use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::json;

use crate::query::Pagination;

/// Success envelope shared by every JSON response:
/// `{success, message, data}` plus a `pagination` block on list responses.
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub message: String,
    pub status_code: StatusCode,
    pub pagination: Option<Pagination>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            data,
            message: message.into(),
            status_code: StatusCode::OK,
            pagination: None,
        }
    }

    /// 201 Created
    pub fn created(message: impl Into<String>, data: T) -> Self {
        Self {
            status_code: StatusCode::CREATED,
            ..Self::success(message, data)
        }
    }

    /// List response with a pagination block
    pub fn paginated(message: impl Into<String>, data: T, pagination: Pagination) -> Self {
        Self {
            pagination: Some(pagination),
            ..Self::success(message, data)
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let data_value = match serde_json::to_value(&self.data) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("Failed to serialize response data: {}", e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "success": false,
                        "message": "Failed to serialize response data",
                        "error": "INTERNAL_SERVER_ERROR"
                    })),
                )
                    .into_response();
            }
        };

        let mut envelope = json!({
            "success": true,
            "message": self.message,
            "data": data_value,
        });

        if let Some(pagination) = &self.pagination {
            envelope["pagination"] = json!(pagination);
        }

        (self.status_code, Json(envelope)).into_response()
    }
}

pub type ApiResult<T> = Result<ApiResponse<T>, crate::error::ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paginated_envelope_shape() {
        let resp = ApiResponse::paginated(
            "Designs retrieved",
            vec!["a", "b"],
            Pagination::new(1, 5, 12),
        );
        assert_eq!(resp.status_code, StatusCode::OK);
        let p = resp.pagination.as_ref().unwrap();
        assert_eq!(p.pages, 3);
        assert!(p.has_next);
    }
}
