use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Free-form key/value rows for contact numbers and message templates.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AppSetting {
    pub id: Uuid,
    pub key: String,
    pub value: String,
    pub description: Option<String>,
    pub updated_at: DateTime<Utc>,
}
