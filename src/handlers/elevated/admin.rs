use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::database::models::{AppSetting, User};
use crate::middleware::{AdminUser, ApiResponse, ApiResult};
use crate::services::admin::{AdminService, Stats};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UserListParams {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    #[serde(default)]
    pub pending: bool,
}

#[derive(Debug, Deserialize)]
pub struct ApprovalRequest {
    pub approved: bool,
}

#[derive(Debug, Deserialize)]
pub struct RoleRequest {
    pub is_admin: bool,
}

#[derive(Debug, Deserialize)]
pub struct SettingRequest {
    pub value: String,
    pub description: Option<String>,
}

/// GET /admin/users
pub async fn list_users(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(params): Query<UserListParams>,
) -> ApiResult<Vec<User>> {
    let (users, pagination) = AdminService::new(&state.pool)
        .list_users(params.page, params.per_page, params.pending)
        .await?;
    Ok(ApiResponse::paginated("Users retrieved", users, pagination))
}

/// PUT /admin/users/:id/approval
pub async fn set_approval(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(user_id): Path<Uuid>,
    Json(body): Json<ApprovalRequest>,
) -> ApiResult<Value> {
    let user = AdminService::new(&state.pool)
        .set_approval(user_id, body.approved)
        .await?;
    let message = if body.approved {
        "User approved"
    } else {
        "User approval revoked"
    };
    Ok(ApiResponse::success(message, user.to_profile()))
}

/// PUT /admin/users/:id/role
pub async fn set_role(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(user_id): Path<Uuid>,
    Json(body): Json<RoleRequest>,
) -> ApiResult<Value> {
    let user = AdminService::new(&state.pool)
        .set_admin(admin.id, user_id, body.is_admin)
        .await?;
    Ok(ApiResponse::success("User role updated", user.to_profile()))
}

/// DELETE /admin/users/:id
pub async fn delete_user(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Value> {
    AdminService::new(&state.pool).delete_user(admin.id, user_id).await?;
    Ok(ApiResponse::success("User deleted", Value::Null))
}

/// GET /admin/stats
pub async fn stats(State(state): State<AppState>, _admin: AdminUser) -> ApiResult<Stats> {
    let stats = AdminService::new(&state.pool).stats().await?;
    Ok(ApiResponse::success("Stats retrieved", stats))
}

/// GET /admin/settings
pub async fn list_settings(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> ApiResult<Vec<AppSetting>> {
    let settings = AdminService::new(&state.pool).list_settings().await?;
    Ok(ApiResponse::success("Settings retrieved", settings))
}

/// PUT /admin/settings/:key
pub async fn upsert_setting(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(key): Path<String>,
    Json(body): Json<SettingRequest>,
) -> ApiResult<AppSetting> {
    let setting = AdminService::new(&state.pool)
        .upsert_setting(&key, &body.value, body.description.as_deref())
        .await?;
    Ok(ApiResponse::success("Setting saved", setting))
}

/// DELETE /admin/settings/:key
pub async fn delete_setting(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(key): Path<String>,
) -> ApiResult<Value> {
    AdminService::new(&state.pool).delete_setting(&key).await?;
    Ok(ApiResponse::success("Setting deleted", Value::Null))
}
