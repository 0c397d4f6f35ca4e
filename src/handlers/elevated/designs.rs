use axum::extract::{Path, State};
use axum::Json;
use serde_json::Value;
use uuid::Uuid;

use crate::handlers::protected::designs::design_with_url;
use crate::middleware::{AdminUser, ApiResponse, ApiResult};
use crate::services::catalog::{CatalogService, CreateDesign, UpdateDesign};
use crate::state::AppState;

/// POST /designs
///
/// The backing object must already be uploaded (see /upload/image);
/// creation verifies the referenced key exists before writing the row.
pub async fn create(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(data): Json<CreateDesign>,
) -> ApiResult<Value> {
    let service = CatalogService::new(&state.pool, state.store.as_ref());
    let design = service.create(data, admin.id).await?;
    Ok(ApiResponse::created("Design created", design_with_url(&design)))
}

/// PUT /designs/:id
pub async fn update(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(patch): Json<UpdateDesign>,
) -> ApiResult<Value> {
    let service = CatalogService::new(&state.pool, state.store.as_ref());
    let design = service.update(id, patch).await?;
    Ok(ApiResponse::success("Design updated", design_with_url(&design)))
}

/// DELETE /designs/:id
pub async fn delete(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Value> {
    let service = CatalogService::new(&state.pool, state.store.as_ref());
    service.delete(id).await?;
    Ok(ApiResponse::success("Design deleted", Value::Null))
}
