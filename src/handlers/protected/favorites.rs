use axum::extract::{Path, Query, State};
use axum::Extension;
use serde_json::Value;
use uuid::Uuid;

use super::designs::{design_with_url, ListParams};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::FavoritesService;
use crate::state::AppState;

/// GET /designs/user/favorites
///
/// The same browse parameters apply, scoped to the caller's favorites.
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<ListParams>,
) -> ApiResult<Vec<Value>> {
    let query = params.into_query(user.is_admin)?.favorited_by(user.id);
    let service = FavoritesService::new(&state.pool);
    let (designs, pagination) = service.list(&query).await?;

    let data = designs.iter().map(design_with_url).collect();
    Ok(ApiResponse::paginated("Favorites retrieved", data, pagination))
}

/// POST /designs/:id/favorite
pub async fn add(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(design_id): Path<Uuid>,
) -> ApiResult<Value> {
    FavoritesService::new(&state.pool).add(user.id, design_id).await?;
    Ok(ApiResponse::created("Design added to favorites", Value::Null))
}

/// DELETE /designs/:id/favorite
pub async fn remove(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(design_id): Path<Uuid>,
) -> ApiResult<Value> {
    FavoritesService::new(&state.pool).remove(user.id, design_id).await?;
    Ok(ApiResponse::success("Design removed from favorites", Value::Null))
}
