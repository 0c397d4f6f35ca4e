use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_admin: bool,
    pub is_approved: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Client-facing profile, never includes the password hash.
    pub fn to_profile(&self) -> Value {
        json!({
            "id": self.id,
            "username": self.username,
            "is_admin": self.is_admin,
            "is_approved": self.is_approved,
            "created_at": self.created_at,
        })
    }
}
