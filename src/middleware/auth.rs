use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::auth::{verify_token, Claims};
use crate::error::ApiError;

/// Authenticated caller context extracted from verified token claims.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: Uuid,
    pub username: String,
    pub is_admin: bool,
    pub is_approved: bool,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            username: claims.username,
            is_admin: claims.is_admin,
            is_approved: claims.is_approved,
        }
    }
}

/// Mandatory authentication: 401 when the Authorization header is absent,
/// malformed, or the token fails verification.
pub async fn require_auth(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(&headers).map_err(ApiError::unauthorized)?;
    let claims = verify_token(&token)?;

    request.extensions_mut().insert(AuthUser::from(claims));
    Ok(next.run(request).await)
}

/// Extract the token from an `Authorization: Bearer <token>` header.
fn extract_bearer_token(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get("authorization")
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("Empty bearer token".to_string());
        }
        Ok(token.to_string())
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn extracts_bearer_token() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "authorization",
            HeaderValue::from_static("Bearer abc.def.ghi"),
        );
        assert_eq!(extract_bearer_token(&headers).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn rejects_missing_or_malformed_header() {
        assert!(extract_bearer_token(&HeaderMap::new()).is_err());

        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Basic abc"));
        assert!(extract_bearer_token(&headers).is_err());

        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Bearer "));
        assert!(extract_bearer_token(&headers).is_err());
    }
}
