use serde::Deserialize;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use super::design_number;
use crate::config;
use crate::database::models::{Design, DesignImage, DesignStatus};
use crate::error::ApiError;
use crate::query::types::SqlResult;
use crate::query::{exec, CatalogQuery, Pagination, QueryError};
use crate::storage::ObjectStore;

/// CRUD over designs and their ordered image sets. Binary storage is
/// delegated to the injected object store; every backing object is verified
/// to exist before a metadata row referencing it is written.
pub struct CatalogService<'a> {
    pool: &'a PgPool,
    store: &'a dyn ObjectStore,
}

#[derive(Debug, Deserialize)]
pub struct CreateDesign {
    pub title: String,
    pub category: String,
    pub object_key: String,
    /// Original upload filename, used for design number generation
    pub source_filename: Option<String>,
    pub design_number: Option<String>,
    pub description_short: Option<String>,
    pub description_long: Option<String>,
    pub description_plain: Option<String>,
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
    #[serde(default)]
    pub featured: bool,
}

/// Patchable design fields. Anything not listed here is ignored, not
/// errored; a patch with no recognized fields is rejected.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateDesign {
    pub title: Option<String>,
    pub description_short: Option<String>,
    pub description_long: Option<String>,
    pub description_plain: Option<String>,
    pub category: Option<String>,
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
    pub status: Option<String>,
    pub featured: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct AddImage {
    pub object_key: String,
    #[serde(default)]
    pub is_primary: bool,
    pub alt_text: Option<String>,
    pub caption: Option<String>,
    pub image_type: Option<String>,
    pub file_size: Option<i64>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub content_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateImage {
    pub alt_text: Option<String>,
    pub caption: Option<String>,
    pub image_type: Option<String>,
}

impl<'a> CatalogService<'a> {
    pub fn new(pool: &'a PgPool, store: &'a dyn ObjectStore) -> Self {
        Self { pool, store }
    }

    pub async fn list(
        &self,
        query: &CatalogQuery,
    ) -> Result<(Vec<Design>, Pagination), ApiError> {
        let designs: Vec<Design> = exec::fetch_all(self.pool, &query.to_sql()).await?;
        let total = exec::fetch_count(self.pool, &query.to_count_sql()).await?;
        Ok((designs, query.pagination(total)))
    }

    /// Fetch one design. Missing rows and rows a non-admin may not see both
    /// read as 404 so existence is not leaked. A successful fetch bumps
    /// view_count best-effort; an increment failure never fails the read.
    pub async fn get(&self, id: Uuid, caller_is_admin: bool) -> Result<Design, ApiError> {
        let design: Option<Design> = sqlx::query_as("SELECT * FROM designs WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        let mut design = design.ok_or_else(|| ApiError::not_found("Design not found"))?;
        if !caller_is_admin && design.status != DesignStatus::Active.as_str() {
            return Err(ApiError::not_found("Design not found"));
        }

        match sqlx::query("UPDATE designs SET view_count = view_count + 1 WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await
        {
            Ok(_) => design.view_count += 1,
            Err(e) => tracing::warn!("view_count increment failed for {}: {}", id, e),
        }

        Ok(design)
    }

    pub async fn create(
        &self,
        data: CreateDesign,
        created_by: Uuid,
    ) -> Result<Design, ApiError> {
        if data.title.trim().is_empty() {
            return Err(ApiError::validation_error("Title is required", None));
        }
        if data.category.trim().is_empty() {
            return Err(ApiError::validation_error("Category is required", None));
        }

        // The backing object must already be uploaded
        if !self.store.exists(&data.object_key).await? {
            return Err(ApiError::validation_error(
                "Backing object not found in storage",
                None,
            ));
        }

        let design_number = match &data.design_number {
            Some(number) => {
                if !design_number::is_valid(number) {
                    return Err(ApiError::validation_error(
                        "Design number must match the pattern XXX-###",
                        None,
                    ));
                }
                if self.design_number_taken(number).await? {
                    return Err(ApiError::conflict("Design number already in use"));
                }
                number.clone()
            }
            None => {
                let filename = data
                    .source_filename
                    .as_deref()
                    .unwrap_or(&data.object_key);
                self.unique_design_number(filename, &data.category).await?
            }
        };

        let design: Design = sqlx::query_as(
            r#"
            INSERT INTO designs (
                id, title, description_short, description_long, description_plain,
                category, style, colour, fabric, occasion,
                designer_name, collection_name, season, price_range, sizes_available,
                tags, design_number, status, featured, view_count, like_count,
                object_key, created_by, created_at, updated_at
            ) VALUES (
                $1, $2, $3, $4, $5,
                $6, $7, $8, $9, $10,
                $11, $12, $13, $14, $15,
                $16, $17, 'active', $18, 0, 0,
                $19, $20, NOW(), NOW()
            )
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.title.trim())
        .bind(&data.description_short)
        .bind(&data.description_long)
        .bind(&data.description_plain)
        .bind(data.category.trim())
        .bind(&data.style)
        .bind(&data.colour)
        .bind(&data.fabric)
        .bind(&data.occasion)
        .bind(&data.designer_name)
        .bind(&data.collection_name)
        .bind(&data.season)
        .bind(&data.price_range)
        .bind(&data.sizes_available)
        .bind(&data.tags)
        .bind(&design_number)
        .bind(data.featured)
        .bind(&data.object_key)
        .bind(created_by)
        .fetch_one(self.pool)
        .await?;

        Ok(design)
    }

    pub async fn update(&self, id: Uuid, patch: UpdateDesign) -> Result<Design, ApiError> {
        let mut sets: Vec<String> = vec![];
        let mut params: Vec<serde_json::Value> = vec![];

        // Fixed field-to-column mapping; caller strings never name columns
        let mut set = |column: &'static str, value: serde_json::Value| {
            params.push(value);
            sets.push(format!("{} = ${}", column, params.len()));
        };

        if let Some(v) = patch.title {
            if v.trim().is_empty() {
                return Err(ApiError::validation_error("Title cannot be empty", None));
            }
            set("title", json!(v.trim()));
        }
        if let Some(v) = patch.description_short {
            set("description_short", json!(v));
        }
        if let Some(v) = patch.description_long {
            set("description_long", json!(v));
        }
        if let Some(v) = patch.description_plain {
            set("description_plain", json!(v));
        }
        if let Some(v) = patch.category {
            if v.trim().is_empty() {
                return Err(ApiError::validation_error("Category cannot be empty", None));
            }
            set("category", json!(v.trim()));
        }
        if let Some(v) = patch.style {
            set("style", json!(v));
        }
        if let Some(v) = patch.colour {
            set("colour", json!(v));
        }
        if let Some(v) = patch.fabric {
            set("fabric", json!(v));
        }
        if let Some(v) = patch.occasion {
            set("occasion", json!(v));
        }
        if let Some(v) = patch.designer_name {
            set("designer_name", json!(v));
        }
        if let Some(v) = patch.collection_name {
            set("collection_name", json!(v));
        }
        if let Some(v) = patch.season {
            set("season", json!(v));
        }
        if let Some(v) = patch.price_range {
            set("price_range", json!(v));
        }
        if let Some(v) = patch.sizes_available {
            set("sizes_available", json!(v));
        }
        if let Some(v) = patch.tags {
            set("tags", json!(v));
        }
        if let Some(v) = patch.status {
            let status = DesignStatus::parse(&v).ok_or_else(|| {
                ApiError::validation_error("Status must be active, inactive or draft", None)
            })?;
            set("status", json!(status.as_str()));
        }
        if let Some(v) = patch.featured {
            set("featured", json!(v));
        }

        if sets.is_empty() {
            return Err(ApiError::bad_request("No updatable fields provided"));
        }

        params.push(json!(id));
        let sql = SqlResult {
            query: format!(
                "UPDATE designs SET {}, updated_at = NOW() WHERE id = ${}::uuid RETURNING *",
                sets.join(", "),
                params.len()
            ),
            params,
        };

        let updated: Vec<Design> = exec::fetch_all(self.pool, &sql).await?;
        updated
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::not_found("Design not found"))
    }

    /// Delete a design. Favorites, cart items and image rows cascade via
    /// foreign keys; stored objects are removed best-effort afterwards.
    pub async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        let design: Option<Design> = sqlx::query_as("SELECT * FROM designs WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        let design = design.ok_or_else(|| ApiError::not_found("Design not found"))?;

        let mut keys: Vec<String> =
            sqlx::query_scalar("SELECT object_key FROM design_images WHERE design_id = $1")
                .bind(id)
                .fetch_all(self.pool)
                .await?;
        keys.push(design.object_key);

        sqlx::query("DELETE FROM designs WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        for key in keys {
            if let Err(e) = self.store.delete(&key).await {
                tracing::warn!("failed to delete orphaned object {}: {}", key, e);
            }
        }

        Ok(())
    }

    /// List a design's images. Applies the same visibility rule as `get`:
    /// a design a non-admin may not see reads as 404, images included.
    pub async fn list_images(
        &self,
        design_id: Uuid,
        caller_is_admin: bool,
    ) -> Result<Vec<DesignImage>, ApiError> {
        self.require_design(design_id, caller_is_admin).await?;
        let images: Vec<DesignImage> = sqlx::query_as(
            "SELECT * FROM design_images WHERE design_id = $1 ORDER BY image_order, created_at",
        )
        .bind(design_id)
        .fetch_all(self.pool)
        .await?;
        Ok(images)
    }

    /// Add an image to a design's ordered set.
    ///
    /// Primary exclusivity is maintained clear-then-set inside one
    /// transaction; the design row is locked first so concurrent image
    /// mutations for the same design serialize.
    pub async fn add_image(
        &self,
        design_id: Uuid,
        data: AddImage,
        uploaded_by: Uuid,
    ) -> Result<DesignImage, ApiError> {
        self.require_design(design_id, true).await?;

        if !self.store.exists(&data.object_key).await? {
            return Err(ApiError::validation_error(
                "Backing object not found in storage",
                None,
            ));
        }

        let max_images = config::config().api.max_images_per_design;
        let mut tx = self.pool.begin().await?;

        sqlx::query("SELECT id FROM designs WHERE id = $1 FOR UPDATE")
            .bind(design_id)
            .fetch_one(&mut *tx)
            .await?;

        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM design_images WHERE design_id = $1")
                .bind(design_id)
                .fetch_one(&mut *tx)
                .await?;
        if count >= max_images {
            return Err(ApiError::validation_error(
                format!("Design already has the maximum of {} images", max_images),
                None,
            ));
        }

        // First image becomes the cover by default
        let is_primary = data.is_primary || count == 0;
        if is_primary {
            sqlx::query("UPDATE design_images SET is_primary = false WHERE design_id = $1")
                .bind(design_id)
                .execute(&mut *tx)
                .await?;
        }

        let next_order: i32 = sqlx::query_scalar(
            "SELECT COALESCE(MAX(image_order) + 1, 0) FROM design_images WHERE design_id = $1",
        )
        .bind(design_id)
        .fetch_one(&mut *tx)
        .await?;

        let image: DesignImage = sqlx::query_as(
            r#"
            INSERT INTO design_images (
                id, design_id, object_key, image_order, is_primary,
                alt_text, caption, image_type, file_size, width, height,
                content_type, uploaded_by, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(design_id)
        .bind(&data.object_key)
        .bind(next_order)
        .bind(is_primary)
        .bind(&data.alt_text)
        .bind(&data.caption)
        .bind(&data.image_type)
        .bind(data.file_size)
        .bind(data.width)
        .bind(data.height)
        .bind(&data.content_type)
        .bind(uploaded_by)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(image)
    }

    /// Make one image the design's single primary. Clear-then-set ordering
    /// inside the transaction avoids an observable multi-primary state.
    pub async fn set_primary(&self, design_id: Uuid, image_id: Uuid) -> Result<(), ApiError> {
        let mut tx = self.pool.begin().await?;

        let locked: Option<Uuid> =
            sqlx::query_scalar("SELECT id FROM designs WHERE id = $1 FOR UPDATE")
                .bind(design_id)
                .fetch_optional(&mut *tx)
                .await?;
        if locked.is_none() {
            return Err(ApiError::not_found("Design not found"));
        }

        let belongs: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM design_images WHERE id = $1 AND design_id = $2)",
        )
        .bind(image_id)
        .bind(design_id)
        .fetch_one(&mut *tx)
        .await?;
        if !belongs {
            return Err(ApiError::not_found("Image not found"));
        }

        sqlx::query("UPDATE design_images SET is_primary = false WHERE design_id = $1")
            .bind(design_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("UPDATE design_images SET is_primary = true WHERE id = $1")
            .bind(image_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Reassign image_order from the submitted id sequence. Only relative
    /// order matters; rows not listed keep their positions (gaps are fine).
    pub async fn reorder_images(
        &self,
        design_id: Uuid,
        image_ids: &[Uuid],
    ) -> Result<Vec<DesignImage>, ApiError> {
        if image_ids.is_empty() {
            return Err(ApiError::bad_request("image_ids cannot be empty"));
        }
        let limit = config::config().api.max_images_per_design as usize;
        if image_ids.len() > limit {
            return Err(QueryError::TooManyIds {
                got: image_ids.len(),
                limit,
            }
            .into());
        }

        let mut tx = self.pool.begin().await?;
        sqlx::query("SELECT id FROM designs WHERE id = $1 FOR UPDATE")
            .bind(design_id)
            .fetch_one(&mut *tx)
            .await?;

        for (position, image_id) in image_ids.iter().enumerate() {
            let result = sqlx::query(
                "UPDATE design_images SET image_order = $1 WHERE id = $2 AND design_id = $3",
            )
            .bind(position as i32)
            .bind(image_id)
            .bind(design_id)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                return Err(ApiError::not_found("Image not found"));
            }
        }

        tx.commit().await?;
        self.list_images(design_id, true).await
    }

    pub async fn update_image(
        &self,
        design_id: Uuid,
        image_id: Uuid,
        patch: UpdateImage,
    ) -> Result<DesignImage, ApiError> {
        if patch.alt_text.is_none() && patch.caption.is_none() && patch.image_type.is_none() {
            return Err(ApiError::bad_request("No updatable fields provided"));
        }

        let image: Option<DesignImage> = sqlx::query_as(
            r#"
            UPDATE design_images SET
                alt_text = COALESCE($1, alt_text),
                caption = COALESCE($2, caption),
                image_type = COALESCE($3, image_type)
            WHERE id = $4 AND design_id = $5
            RETURNING *
            "#,
        )
        .bind(&patch.alt_text)
        .bind(&patch.caption)
        .bind(&patch.image_type)
        .bind(image_id)
        .bind(design_id)
        .fetch_optional(self.pool)
        .await?;

        image.ok_or_else(|| ApiError::not_found("Image not found"))
    }

    pub async fn delete_image(&self, design_id: Uuid, image_id: Uuid) -> Result<(), ApiError> {
        let key: Option<String> = sqlx::query_scalar(
            "DELETE FROM design_images WHERE id = $1 AND design_id = $2 RETURNING object_key",
        )
        .bind(image_id)
        .bind(design_id)
        .fetch_optional(self.pool)
        .await?;

        let key = key.ok_or_else(|| ApiError::not_found("Image not found"))?;
        if let Err(e) = self.store.delete(&key).await {
            tracing::warn!("failed to delete orphaned object {}: {}", key, e);
        }

        Ok(())
    }

    async fn require_design(
        &self,
        design_id: Uuid,
        caller_is_admin: bool,
    ) -> Result<(), ApiError> {
        let status: Option<String> =
            sqlx::query_scalar("SELECT status FROM designs WHERE id = $1")
                .bind(design_id)
                .fetch_optional(self.pool)
                .await?;

        match status {
            Some(s) if caller_is_admin || s == DesignStatus::Active.as_str() => Ok(()),
            // Missing and not-visible read the same
            _ => Err(ApiError::not_found("Design not found")),
        }
    }

    async fn design_number_taken(&self, number: &str) -> Result<bool, ApiError> {
        let taken: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM designs WHERE design_number = $1)")
                .bind(number)
                .fetch_one(self.pool)
                .await?;
        Ok(taken)
    }

    /// Generate a collision-free design number, preferring the
    /// filename-derived candidate and falling back to random suffixes.
    async fn unique_design_number(
        &self,
        filename: &str,
        category: &str,
    ) -> Result<String, ApiError> {
        if let Some(candidate) = design_number::generate(filename, category) {
            if !self.design_number_taken(&candidate).await? {
                return Ok(candidate);
            }
        }

        let prefix: String = category
            .chars()
            .filter(|c| c.is_ascii_alphabetic())
            .take(3)
            .collect::<String>()
            .to_ascii_uppercase();
        let prefix = if prefix.len() >= 2 {
            prefix
        } else {
            "DSN".to_string()
        };

        for _ in 0..20 {
            let suffix = Uuid::new_v4().as_u128() % 10_000;
            let candidate = format!("{}-{:04}", prefix, suffix);
            if !self.design_number_taken(&candidate).await? {
                return Ok(candidate);
            }
        }

        Err(ApiError::internal_server_error(
            "Could not allocate a design number",
        ))
    }
}
