use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::{async_trait, extract::Request, middleware::Next, response::Response};

use super::auth::AuthUser;
use crate::error::ApiError;

/// Admin gate as an extractor, so a path can expose read methods to any
/// approved account and mutation methods to admins only. Must run after
/// authentication: 401 when unauthenticated, 403 when not an admin.
pub struct AdminUser(pub AuthUser);

#[async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<AuthUser>() {
            None => Err(ApiError::unauthorized("Authentication required")),
            Some(user) if !user.is_admin => {
                Err(ApiError::forbidden("Administrator access required"))
            }
            Some(user) => Ok(AdminUser(user.clone())),
        }
    }
}

/// Approval gate. Admins are always considered approved; non-admins must
/// carry `is_approved` in their claims. Approval revocation only takes
/// effect once the token expires and a new one is refused at login.
pub async fn require_approved(request: Request, next: Next) -> Result<Response, ApiError> {
    match request.extensions().get::<AuthUser>() {
        None => Err(ApiError::unauthorized("Authentication required")),
        Some(user) if !user.is_admin && !user.is_approved => {
            Err(ApiError::forbidden("Account is pending approval"))
        }
        Some(_) => Ok(next.run(request).await),
    }
}
