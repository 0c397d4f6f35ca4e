use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// One of a design's ordered images. At most one row per design carries
/// `is_primary = true`.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct DesignImage {
    pub id: Uuid,
    pub design_id: Uuid,
    pub object_key: String,
    pub image_order: i32,
    pub is_primary: bool,
    pub alt_text: Option<String>,
    pub caption: Option<String>,
    pub image_type: Option<String>,
    pub file_size: Option<i64>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub content_type: Option<String>,
    pub uploaded_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}
