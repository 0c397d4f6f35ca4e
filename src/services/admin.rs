use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::config;
use crate::database::models::{AppSetting, User};
use crate::error::ApiError;
use crate::query::Pagination;

#[derive(Debug, Serialize)]
pub struct Stats {
    pub total_users: i64,
    pub pending_users: i64,
    pub total_designs: i64,
    pub active_designs: i64,
    pub featured_designs: i64,
    pub total_favorites: i64,
    pub total_cart_items: i64,
    pub top_designs: Vec<TopDesign>,
}

/// Most-viewed active designs, trimmed to what the dashboard card needs.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct TopDesign {
    pub id: Uuid,
    pub title: String,
    pub design_number: Option<String>,
    pub view_count: i32,
    pub like_count: i32,
}

const TOP_DESIGNS_LIMIT: i64 = 5;

/// Moderation surface: user approval and role management, app settings,
/// and aggregate stats. Admin-only; route gating is enforced upstream.
pub struct AdminService<'a> {
    pool: &'a PgPool,
}

impl<'a> AdminService<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_users(
        &self,
        page: Option<i64>,
        per_page: Option<i64>,
        pending_only: bool,
    ) -> Result<(Vec<User>, Pagination), ApiError> {
        let api = &config::config().api;
        let page = page.unwrap_or(1).max(1);
        let per_page = per_page
            .unwrap_or(api.default_page_size)
            .clamp(1, api.max_page_size);

        let predicate = if pending_only {
            "WHERE is_approved = false AND is_admin = false"
        } else {
            ""
        };

        let users: Vec<User> = sqlx::query_as(&format!(
            "SELECT * FROM users {} ORDER BY created_at DESC LIMIT $1 OFFSET $2",
            predicate
        ))
        .bind(per_page)
        .bind((page - 1) * per_page)
        .fetch_all(self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM users {}", predicate))
            .fetch_one(self.pool)
            .await?;

        Ok((users, Pagination::new(page, per_page, total)))
    }

    pub async fn set_approval(
        &self,
        user_id: Uuid,
        approved: bool,
    ) -> Result<User, ApiError> {
        let user: Option<User> = sqlx::query_as(
            "UPDATE users SET is_approved = $1, updated_at = NOW() WHERE id = $2 RETURNING *",
        )
        .bind(approved)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        user.ok_or_else(|| ApiError::not_found("User not found"))
    }

    /// Grant or revoke the admin role. An admin cannot demote themselves,
    /// which keeps at least one reachable admin account.
    pub async fn set_admin(
        &self,
        acting_admin: Uuid,
        user_id: Uuid,
        is_admin: bool,
    ) -> Result<User, ApiError> {
        if user_id == acting_admin && !is_admin {
            return Err(ApiError::bad_request("You cannot revoke your own admin role"));
        }

        let user: Option<User> = sqlx::query_as(
            "UPDATE users SET is_admin = $1, updated_at = NOW() WHERE id = $2 RETURNING *",
        )
        .bind(is_admin)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        user.ok_or_else(|| ApiError::not_found("User not found"))
    }

    /// Delete a user. Their cart, cart items and favorites cascade;
    /// designs they created are kept with created_by set to NULL.
    pub async fn delete_user(&self, acting_admin: Uuid, user_id: Uuid) -> Result<(), ApiError> {
        if user_id == acting_admin {
            return Err(ApiError::bad_request("You cannot delete your own account"));
        }

        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::not_found("User not found"));
        }
        Ok(())
    }

    pub async fn stats(&self) -> Result<Stats, ApiError> {
        let (total_users, pending_users): (i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*),
                   COUNT(*) FILTER (WHERE is_approved = false AND is_admin = false)
            FROM users
            "#,
        )
        .fetch_one(self.pool)
        .await?;

        let (total_designs, active_designs, featured_designs): (i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*),
                   COUNT(*) FILTER (WHERE status = 'active'),
                   COUNT(*) FILTER (WHERE featured AND status = 'active')
            FROM designs
            "#,
        )
        .fetch_one(self.pool)
        .await?;

        let total_favorites: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user_favorites")
            .fetch_one(self.pool)
            .await?;
        let total_cart_items: i64 =
            sqlx::query_scalar("SELECT COALESCE(SUM(quantity), 0) FROM cart_items")
                .fetch_one(self.pool)
                .await?;

        let top_designs: Vec<TopDesign> = sqlx::query_as(
            r#"
            SELECT id, title, design_number, view_count, like_count
            FROM designs
            WHERE status = 'active'
            ORDER BY view_count DESC, like_count DESC
            LIMIT $1
            "#,
        )
        .bind(TOP_DESIGNS_LIMIT)
        .fetch_all(self.pool)
        .await?;

        Ok(Stats {
            total_users,
            pending_users,
            total_designs,
            active_designs,
            featured_designs,
            total_favorites,
            total_cart_items,
            top_designs,
        })
    }

    pub async fn list_settings(&self) -> Result<Vec<AppSetting>, ApiError> {
        let settings: Vec<AppSetting> =
            sqlx::query_as("SELECT * FROM app_settings ORDER BY key")
                .fetch_all(self.pool)
                .await?;
        Ok(settings)
    }

    /// Create or replace a setting by key.
    pub async fn upsert_setting(
        &self,
        key: &str,
        value: &str,
        description: Option<&str>,
    ) -> Result<AppSetting, ApiError> {
        if key.trim().is_empty() {
            return Err(ApiError::validation_error("Setting key is required", None));
        }

        let setting: AppSetting = sqlx::query_as(
            r#"
            INSERT INTO app_settings (id, key, value, description, updated_at)
            VALUES ($1, $2, $3, $4, NOW())
            ON CONFLICT (key) DO UPDATE
            SET value = EXCLUDED.value,
                description = COALESCE(EXCLUDED.description, app_settings.description),
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(key.trim())
        .bind(value)
        .bind(description)
        .fetch_one(self.pool)
        .await?;

        Ok(setting)
    }

    pub async fn delete_setting(&self, key: &str) -> Result<(), ApiError> {
        let result = sqlx::query("DELETE FROM app_settings WHERE key = $1")
            .bind(key)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::not_found("Setting not found"));
        }
        Ok(())
    }
}
