use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A user's cart. Exactly one per user, created lazily on first access and
/// never deleted, only emptied.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Cart {
    pub id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CartItem {
    pub id: Uuid,
    pub cart_id: Uuid,
    pub design_id: Uuid,
    pub quantity: i32,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Cart item joined with the design attributes the client renders.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CartItemDetail {
    pub id: Uuid,
    pub design_id: Uuid,
    pub quantity: i32,
    pub notes: Option<String>,
    pub title: String,
    pub design_number: Option<String>,
    pub price_range: Option<String>,
    pub object_key: String,
    pub created_at: DateTime<Utc>,
}
