use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::database::models::CartItem;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::cart::{CartService, CartView, ShareLink};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub design_id: Uuid,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
    pub notes: Option<String>,
}

fn default_quantity() -> i32 {
    1
}

#[derive(Debug, Deserialize)]
pub struct UpdateItemRequest {
    pub quantity: i32,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ShareRequest {
    pub design_ids: Option<Vec<Uuid>>,
    pub message: Option<String>,
}

/// GET /cart
pub async fn view(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<CartView> {
    let cart = CartService::new(&state.pool).view(user.id).await?;
    Ok(ApiResponse::success("Cart retrieved", cart))
}

/// POST /cart/items
pub async fn add_item(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<AddItemRequest>,
) -> ApiResult<CartItem> {
    let item = CartService::new(&state.pool)
        .add_item(user.id, body.design_id, body.quantity, body.notes)
        .await?;
    Ok(ApiResponse::created("Design added to cart", item))
}

/// PUT /cart/items/:id
pub async fn update_item(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(item_id): Path<Uuid>,
    Json(body): Json<UpdateItemRequest>,
) -> ApiResult<CartItem> {
    let item = CartService::new(&state.pool)
        .update_item(user.id, item_id, body.quantity, body.notes)
        .await?;
    Ok(ApiResponse::success("Cart item updated", item))
}

/// DELETE /cart/items/:id
pub async fn remove_item(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(item_id): Path<Uuid>,
) -> ApiResult<Value> {
    CartService::new(&state.pool).remove_item(user.id, item_id).await?;
    Ok(ApiResponse::success("Cart item removed", Value::Null))
}

/// DELETE /cart
pub async fn clear(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Value> {
    CartService::new(&state.pool).clear(user.id).await?;
    Ok(ApiResponse::success("Cart cleared", Value::Null))
}

/// POST /cart/share
///
/// Body is optional: without one the whole cart is shared with the
/// stored template.
pub async fn share(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    body: Option<Json<ShareRequest>>,
) -> ApiResult<ShareLink> {
    let body = body.map(|Json(b)| b).unwrap_or_default();
    let link = CartService::new(&state.pool)
        .share(user.id, body.design_ids, body.message)
        .await?;
    Ok(ApiResponse::success("Share link generated", link))
}
