use axum::extract::{Path, Query, State};
use axum::Extension;
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::database::models::{Design, DesignImage};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::query::{CatalogQuery, FilterField};
use crate::services::CatalogService;
use crate::state::AppState;
use crate::storage::object_url;

/// Browse/search parameters shared by the catalog and favorites listings.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub q: Option<String>,
    pub category: Option<String>,
    pub style: Option<String>,
    pub colour: Option<String>,
    pub fabric: Option<String>,
    pub occasion: Option<String>,
    pub designer: Option<String>,
    pub collection: Option<String>,
    pub season: Option<String>,
    pub design_number: Option<String>,
    pub featured: Option<bool>,
    pub status: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl ListParams {
    pub fn into_query(self, is_admin: bool) -> Result<CatalogQuery, crate::query::QueryError> {
        CatalogQuery::new(is_admin)
            .filter(FilterField::Category, self.category)
            .filter(FilterField::Style, self.style)
            .filter(FilterField::Colour, self.colour)
            .filter(FilterField::Fabric, self.fabric)
            .filter(FilterField::Occasion, self.occasion)
            .filter(FilterField::Designer, self.designer)
            .filter(FilterField::Collection, self.collection)
            .filter(FilterField::Season, self.season)
            .filter(FilterField::DesignNumber, self.design_number)
            .search(self.q)
            .featured(self.featured)
            .status(self.status)
            .map(|q| {
                q.sort(self.sort_by.as_deref(), self.sort_order.as_deref())
                    .paginate(self.page, self.per_page)
            })
    }
}

/// Serialize a design with the public URL of its backing object attached.
pub fn design_with_url(design: &Design) -> Value {
    let mut value = serde_json::to_value(design).unwrap_or(Value::Null);
    if let Value::Object(map) = &mut value {
        map.insert("image_url".into(), Value::String(object_url(&design.object_key)));
    }
    value
}

pub fn image_with_url(image: &DesignImage) -> Value {
    let mut value = serde_json::to_value(image).unwrap_or(Value::Null);
    if let Value::Object(map) = &mut value {
        map.insert("image_url".into(), Value::String(object_url(&image.object_key)));
    }
    value
}

/// GET /designs
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<ListParams>,
) -> ApiResult<Vec<Value>> {
    let query = params.into_query(user.is_admin)?;
    let service = CatalogService::new(&state.pool, state.store.as_ref());
    let (designs, pagination) = service.list(&query).await?;

    let data = designs.iter().map(design_with_url).collect();
    Ok(ApiResponse::paginated("Designs retrieved", data, pagination))
}

/// GET /designs/:id
pub async fn get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Value> {
    let service = CatalogService::new(&state.pool, state.store.as_ref());
    let design = service.get(id, user.is_admin).await?;
    Ok(ApiResponse::success("Design retrieved", design_with_url(&design)))
}

/// GET /designs/:id/images
pub async fn list_images(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Vec<Value>> {
    let service = CatalogService::new(&state.pool, state.store.as_ref());
    let images = service.list_images(id, user.is_admin).await?;
    let data = images.iter().map(image_with_url).collect();
    Ok(ApiResponse::success("Images retrieved", data))
}
