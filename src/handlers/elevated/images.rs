use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::handlers::protected::designs::image_with_url;
use crate::middleware::{AdminUser, ApiResponse, ApiResult};
use crate::services::catalog::{AddImage, CatalogService, UpdateImage};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    pub image_ids: Vec<Uuid>,
}

/// POST /designs/:id/images
///
/// References an already-uploaded object by key; use
/// /upload/design/:id/images to upload and attach in one request.
pub async fn add(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(design_id): Path<Uuid>,
    Json(data): Json<AddImage>,
) -> ApiResult<Value> {
    let service = CatalogService::new(&state.pool, state.store.as_ref());
    let image = service.add_image(design_id, data, admin.id).await?;
    Ok(ApiResponse::created("Image added", image_with_url(&image)))
}

/// PUT /designs/:id/images/reorder
pub async fn reorder(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(design_id): Path<Uuid>,
    Json(body): Json<ReorderRequest>,
) -> ApiResult<Vec<Value>> {
    let service = CatalogService::new(&state.pool, state.store.as_ref());
    let images = service.reorder_images(design_id, &body.image_ids).await?;
    let data = images.iter().map(image_with_url).collect();
    Ok(ApiResponse::success("Images reordered", data))
}

/// PUT /designs/:id/images/:image_id/primary
pub async fn set_primary(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path((design_id, image_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Value> {
    let service = CatalogService::new(&state.pool, state.store.as_ref());
    service.set_primary(design_id, image_id).await?;
    Ok(ApiResponse::success("Primary image updated", Value::Null))
}

/// PUT /designs/:id/images/:image_id
pub async fn update(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path((design_id, image_id)): Path<(Uuid, Uuid)>,
    Json(patch): Json<UpdateImage>,
) -> ApiResult<Value> {
    let service = CatalogService::new(&state.pool, state.store.as_ref());
    let image = service.update_image(design_id, image_id, patch).await?;
    Ok(ApiResponse::success("Image updated", image_with_url(&image)))
}

/// DELETE /designs/:id/images/:image_id
pub async fn delete(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path((design_id, image_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Value> {
    let service = CatalogService::new(&state.pool, state.store.as_ref());
    service.delete_image(design_id, image_id).await?;
    Ok(ApiResponse::success("Image deleted", Value::Null))
}
