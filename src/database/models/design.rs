use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Catalog entry for one garment/product listing.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Design {
    pub id: Uuid,
    pub title: String,
    pub description_short: Option<String>,
    pub description_long: Option<String>,
    pub description_plain: Option<String>,
    pub category: String,
    pub style: Option<String>,
    pub colour: Option<String>,
    pub fabric: Option<String>,
    pub occasion: Option<String>,
    pub designer_name: Option<String>,
    pub collection_name: Option<String>,
    pub season: Option<String>,
    pub price_range: Option<String>,
    pub sizes_available: Option<String>,
    pub tags: Option<String>,
    pub design_number: Option<String>,
    pub status: String,
    pub featured: bool,
    pub view_count: i32,
    pub like_count: i32,
    pub object_key: String,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Design lifecycle states. Non-admin callers only ever observe Active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DesignStatus {
    Active,
    Inactive,
    Draft,
}

impl DesignStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(DesignStatus::Active),
            "inactive" => Some(DesignStatus::Inactive),
            "draft" => Some(DesignStatus::Draft),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DesignStatus::Active => "active",
            DesignStatus::Inactive => "inactive",
            DesignStatus::Draft => "draft",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_statuses_only() {
        assert_eq!(DesignStatus::parse("active"), Some(DesignStatus::Active));
        assert_eq!(DesignStatus::parse("draft"), Some(DesignStatus::Draft));
        assert_eq!(DesignStatus::parse("archived"), None);
        assert_eq!(DesignStatus::parse(""), None);
    }
}
