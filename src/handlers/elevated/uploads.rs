use axum::extract::{Multipart, Path, State};
use serde_json::{json, Value};
use uuid::Uuid;

use super::upload::{parse_multipart, parse_single_upload, UploadedFile};
use crate::handlers::protected::designs::image_with_url;
use crate::middleware::{AdminUser, ApiResponse, ApiResult};
use crate::services::catalog::{AddImage, CatalogService};
use crate::state::AppState;
use crate::storage::object_url;

/// POST /upload/image
///
/// Stores one image and returns its object reference and public URL.
/// Design creation then references the key, keeping the binary write and
/// the metadata write as separate, individually verifiable steps.
pub async fn upload_image(
    State(state): State<AppState>,
    _admin: AdminUser,
    multipart: Multipart,
) -> ApiResult<Value> {
    let (_, file) = parse_single_upload(multipart).await?;
    let object_key = file.object_key("designs");

    state
        .store
        .put(&object_key, &file.bytes, &file.content_type)
        .await?;

    Ok(ApiResponse::created("Image uploaded", uploaded_json(&file, &object_key)))
}

/// POST /upload/batch
///
/// Stores each file independently and reports per-file outcomes; one bad
/// file does not fail the rest.
pub async fn upload_batch(
    State(state): State<AppState>,
    _admin: AdminUser,
    multipart: Multipart,
) -> ApiResult<Vec<Value>> {
    let (_, files) = parse_multipart(multipart).await?;
    if files.is_empty() {
        return Err(crate::error::ApiError::validation_error(
            "At least one image file is required",
            None,
        ));
    }

    let mut results = Vec::with_capacity(files.len());
    for file in &files {
        let object_key = file.object_key("designs");
        match state
            .store
            .put(&object_key, &file.bytes, &file.content_type)
            .await
        {
            Ok(()) => results.push(uploaded_json(file, &object_key)),
            Err(e) => {
                tracing::warn!("batch upload of {} failed: {}", file.filename, e);
                results.push(json!({
                    "filename": file.filename,
                    "error": "Upload failed",
                }));
            }
        }
    }

    Ok(ApiResponse::success("Batch upload processed", results))
}

/// POST /upload/design/:id/images
///
/// Upload plus image row in one request. The object is stored first; if
/// the metadata insert then fails the stored object is deleted so no
/// orphan survives a half-completed upload.
pub async fn upload_design_image(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(design_id): Path<Uuid>,
    multipart: Multipart,
) -> ApiResult<Value> {
    let (mut fields, file) = parse_single_upload(multipart).await?;

    let object_key = file.object_key("designs/images");
    let file_size = file.bytes.len() as i64;
    state
        .store
        .put(&object_key, &file.bytes, &file.content_type)
        .await?;

    let data = AddImage {
        object_key: object_key.clone(),
        is_primary: fields
            .remove("is_primary")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false),
        alt_text: fields.remove("alt_text"),
        caption: fields.remove("caption"),
        image_type: fields.remove("image_type"),
        file_size: Some(file_size),
        width: fields.remove("width").and_then(|v| v.parse().ok()),
        height: fields.remove("height").and_then(|v| v.parse().ok()),
        content_type: Some(file.content_type.clone()),
    };

    let service = CatalogService::new(&state.pool, state.store.as_ref());
    match service.add_image(design_id, data, admin.id).await {
        Ok(image) => Ok(ApiResponse::created("Image added", image_with_url(&image))),
        Err(err) => {
            if let Err(e) = state.store.delete(&object_key).await {
                tracing::warn!("failed to clean up object {} after add error: {}", object_key, e);
            }
            Err(err)
        }
    }
}

fn uploaded_json(file: &UploadedFile, object_key: &str) -> Value {
    json!({
        "filename": file.filename,
        "object_key": object_key,
        "url": object_url(object_key),
        "content_type": file.content_type,
        "file_size": file.bytes.len(),
    })
}
