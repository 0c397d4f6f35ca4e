use axum::extract::State;
use axum::Extension;
use serde_json::Value;

use crate::database::models::User;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

/// GET /me
///
/// Profile is re-read from the database rather than echoed from token
/// claims, so approval or role changes show up before the token expires.
pub async fn me(State(state): State<AppState>, Extension(user): Extension<AuthUser>) -> ApiResult<Value> {
    let record: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = $1")
        .bind(user.id)
        .fetch_optional(&state.pool)
        .await?;

    // A token for a deleted account is no longer valid
    let record = record.ok_or_else(|| ApiError::unauthorized("Invalid or expired token"))?;
    Ok(ApiResponse::success("Profile retrieved", record.to_profile()))
}
