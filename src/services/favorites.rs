use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{Design, DesignStatus};
use crate::error::ApiError;
use crate::query::{exec, CatalogQuery, Pagination};

/// Per-user favorites. Membership changes move the design's like_count in
/// the same transaction so the counter never drifts from the membership
/// rows under concurrent toggles.
pub struct FavoritesService<'a> {
    pool: &'a PgPool,
}

impl<'a> FavoritesService<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Add a design to the user's favorites. Adding a design that is
    /// already favorited is a client error, not a no-op.
    pub async fn add(&self, user_id: Uuid, design_id: Uuid) -> Result<(), ApiError> {
        let mut tx = self.pool.begin().await?;

        let status: Option<String> =
            sqlx::query_scalar("SELECT status FROM designs WHERE id = $1 FOR UPDATE")
                .bind(design_id)
                .fetch_optional(&mut *tx)
                .await?;
        match status {
            Some(s) if s == DesignStatus::Active.as_str() => {}
            // Hidden designs read the same as missing ones
            _ => return Err(ApiError::not_found("Design not found")),
        }

        let inserted = sqlx::query(
            r#"
            INSERT INTO user_favorites (user_id, design_id, created_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (user_id, design_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(design_id)
        .execute(&mut *tx)
        .await?;

        if inserted.rows_affected() == 0 {
            return Err(ApiError::bad_request("Design is already in your favorites"));
        }

        sqlx::query("UPDATE designs SET like_count = like_count + 1 WHERE id = $1")
            .bind(design_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Remove a design from the user's favorites. Removing a design that
    /// is not favorited is a client error.
    pub async fn remove(&self, user_id: Uuid, design_id: Uuid) -> Result<(), ApiError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("SELECT id FROM designs WHERE id = $1 FOR UPDATE")
            .bind(design_id)
            .fetch_optional(&mut *tx)
            .await?;

        let deleted =
            sqlx::query("DELETE FROM user_favorites WHERE user_id = $1 AND design_id = $2")
                .bind(user_id)
                .bind(design_id)
                .execute(&mut *tx)
                .await?;

        if deleted.rows_affected() == 0 {
            return Err(ApiError::bad_request("Design is not in your favorites"));
        }

        sqlx::query("UPDATE designs SET like_count = GREATEST(like_count - 1, 0) WHERE id = $1")
            .bind(design_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// List the user's favorited designs through the standard catalog
    /// query path, so filters, search and sort all apply.
    pub async fn list(
        &self,
        query: &CatalogQuery,
    ) -> Result<(Vec<Design>, Pagination), ApiError> {
        let designs: Vec<Design> = exec::fetch_all(self.pool, &query.to_sql()).await?;
        let total = exec::fetch_count(self.pool, &query.to_count_sql()).await?;
        Ok((designs, query.pagination(total)))
    }

    /// Design ids the user has favorited, for client-side annotation.
    pub async fn ids_for_user(&self, user_id: Uuid) -> Result<Vec<Uuid>, ApiError> {
        let ids: Vec<Uuid> = sqlx::query_scalar(
            "SELECT design_id FROM user_favorites WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;
        Ok(ids)
    }
}
