use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A (user, design) like marker. The primary key on the pair guarantees
/// uniqueness; the design's like_count mirrors the row count.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct UserFavorite {
    pub user_id: Uuid,
    pub design_id: Uuid,
    pub created_at: DateTime<Utc>,
}
