use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use super::whatsapp;
use crate::config;
use crate::database::models::{Cart, CartItem, CartItemDetail, Design, DesignStatus};
use crate::error::ApiError;

/// Per-item quantity ceiling, matching the table CHECK constraint.
pub const MAX_ITEM_QUANTITY: i32 = 10;

const WHATSAPP_NUMBER_KEY: &str = "whatsapp_number";
const WHATSAPP_TEMPLATE_KEY: &str = "whatsapp_message_template";

#[derive(Debug, Serialize)]
pub struct CartView {
    pub cart_id: Uuid,
    pub items: Vec<CartItemDetail>,
    pub total_quantity: i64,
}

#[derive(Debug, Serialize)]
pub struct ShareLink {
    pub url: String,
    pub message: String,
    pub design_count: usize,
}

/// One cart per user, created lazily and only ever emptied. Adds go through
/// an upsert on (cart_id, design_id) so concurrent adds of the same design
/// merge into one line instead of duplicating or erroring.
pub struct CartService<'a> {
    pool: &'a PgPool,
}

impl<'a> CartService<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_or_create(&self, user_id: Uuid) -> Result<Cart, ApiError> {
        sqlx::query(
            r#"
            INSERT INTO carts (id, user_id, created_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (user_id) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .execute(self.pool)
        .await?;

        let cart: Cart = sqlx::query_as("SELECT * FROM carts WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(self.pool)
            .await?;
        Ok(cart)
    }

    pub async fn view(&self, user_id: Uuid) -> Result<CartView, ApiError> {
        let cart = self.get_or_create(user_id).await?;

        let items: Vec<CartItemDetail> = sqlx::query_as(
            r#"
            SELECT ci.id, ci.design_id, ci.quantity, ci.notes,
                   d.title, d.design_number, d.price_range, d.object_key,
                   ci.created_at
            FROM cart_items ci
            JOIN designs d ON d.id = ci.design_id
            WHERE ci.cart_id = $1
            ORDER BY ci.created_at
            "#,
        )
        .bind(cart.id)
        .fetch_all(self.pool)
        .await?;

        let total_quantity = items.iter().map(|i| i.quantity as i64).sum();
        Ok(CartView {
            cart_id: cart.id,
            items,
            total_quantity,
        })
    }

    /// Add a design to the cart, merging with any existing line for the
    /// same design. The cap applies to the merged total, not each request,
    /// so repeated adds cannot creep past it; a merge that would exceed it
    /// is rejected without touching the line.
    pub async fn add_item(
        &self,
        user_id: Uuid,
        design_id: Uuid,
        quantity: i32,
        notes: Option<String>,
    ) -> Result<CartItem, ApiError> {
        if !(1..=MAX_ITEM_QUANTITY).contains(&quantity) {
            return Err(ApiError::validation_error(
                format!("Quantity must be between 1 and {}", MAX_ITEM_QUANTITY),
                None,
            ));
        }

        let status: Option<String> = sqlx::query_scalar("SELECT status FROM designs WHERE id = $1")
            .bind(design_id)
            .fetch_optional(self.pool)
            .await?;
        match status {
            Some(s) if s == DesignStatus::Active.as_str() => {}
            _ => return Err(ApiError::not_found("Design not found")),
        }

        let cart = self.get_or_create(user_id).await?;

        // Upsert so two concurrent first-time adds never trip the
        // (cart_id, design_id) unique constraint. The conflict arm's WHERE
        // keeps the merged total within the cap; RETURNING yields no row
        // when it does not, which maps to a validation error.
        let item: Option<CartItem> = sqlx::query_as(
            r#"
            INSERT INTO cart_items (id, cart_id, design_id, quantity, notes, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, NOW(), NOW())
            ON CONFLICT (cart_id, design_id) DO UPDATE
            SET quantity = cart_items.quantity + EXCLUDED.quantity,
                notes = COALESCE(EXCLUDED.notes, cart_items.notes),
                updated_at = NOW()
            WHERE cart_items.quantity + EXCLUDED.quantity <= $6
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(cart.id)
        .bind(design_id)
        .bind(quantity)
        .bind(&notes)
        .bind(MAX_ITEM_QUANTITY)
        .fetch_optional(self.pool)
        .await?;

        item.ok_or_else(|| {
            ApiError::validation_error(
                format!("Quantity cannot exceed {} per design", MAX_ITEM_QUANTITY),
                None,
            )
        })
    }

    /// Set an item's quantity outright. Items in other users' carts read
    /// as 404, never 403.
    pub async fn update_item(
        &self,
        user_id: Uuid,
        item_id: Uuid,
        quantity: i32,
        notes: Option<String>,
    ) -> Result<CartItem, ApiError> {
        if !(1..=MAX_ITEM_QUANTITY).contains(&quantity) {
            return Err(ApiError::validation_error(
                format!("Quantity must be between 1 and {}", MAX_ITEM_QUANTITY),
                None,
            ));
        }

        let item: Option<CartItem> = sqlx::query_as(
            r#"
            UPDATE cart_items ci
            SET quantity = $1, notes = COALESCE($2, ci.notes), updated_at = NOW()
            FROM carts c
            WHERE ci.id = $3 AND ci.cart_id = c.id AND c.user_id = $4
            RETURNING ci.*
            "#,
        )
        .bind(quantity)
        .bind(&notes)
        .bind(item_id)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        item.ok_or_else(|| ApiError::not_found("Cart item not found"))
    }

    pub async fn remove_item(&self, user_id: Uuid, item_id: Uuid) -> Result<(), ApiError> {
        let result = sqlx::query(
            r#"
            DELETE FROM cart_items ci
            USING carts c
            WHERE ci.id = $1 AND ci.cart_id = c.id AND c.user_id = $2
            "#,
        )
        .bind(item_id)
        .bind(user_id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::not_found("Cart item not found"));
        }
        Ok(())
    }

    pub async fn clear(&self, user_id: Uuid) -> Result<(), ApiError> {
        let cart = self.get_or_create(user_id).await?;
        sqlx::query("DELETE FROM cart_items WHERE cart_id = $1")
            .bind(cart.id)
            .execute(self.pool)
            .await?;
        Ok(())
    }

    /// Build a WhatsApp enquiry link for a set of designs: the explicitly
    /// requested ids, or the whole cart when none are given. The stored
    /// message template applies unless the caller supplies an override.
    pub async fn share(
        &self,
        user_id: Uuid,
        design_ids: Option<Vec<Uuid>>,
        message_override: Option<String>,
    ) -> Result<ShareLink, ApiError> {
        let designs: Vec<Design> = match &design_ids {
            Some(ids) if !ids.is_empty() => {
                sqlx::query_as(
                    "SELECT * FROM designs WHERE id = ANY($1) AND status = 'active'",
                )
                .bind(ids)
                .fetch_all(self.pool)
                .await?
            }
            _ => {
                let cart = self.get_or_create(user_id).await?;
                sqlx::query_as(
                    r#"
                    SELECT d.*
                    FROM cart_items ci
                    JOIN designs d ON d.id = ci.design_id
                    WHERE ci.cart_id = $1
                    ORDER BY ci.created_at
                    "#,
                )
                .bind(cart.id)
                .fetch_all(self.pool)
                .await?
            }
        };

        if designs.is_empty() {
            return Err(ApiError::bad_request("No designs to share"));
        }

        let max_share = config::config().api.max_share_designs;
        if designs.len() > max_share {
            return Err(ApiError::validation_error(
                format!("Cannot share more than {} designs at once", max_share),
                None,
            ));
        }

        let number = self
            .setting(WHATSAPP_NUMBER_KEY)
            .await?
            .ok_or_else(|| ApiError::service_unavailable("Sharing is not configured"))?;
        let template = match message_override {
            Some(m) if !m.trim().is_empty() => m,
            _ => self
                .setting(WHATSAPP_TEMPLATE_KEY)
                .await?
                .unwrap_or_else(|| whatsapp::DEFAULT_TEMPLATE.to_string()),
        };

        let url = whatsapp::build_share_link(&number, &template, &designs)
            .map_err(|_| ApiError::service_unavailable("Sharing is not configured"))?;
        let message = whatsapp::render_message(&template, &designs);

        Ok(ShareLink {
            url,
            message,
            design_count: designs.len(),
        })
    }

    async fn setting(&self, key: &str) -> Result<Option<String>, ApiError> {
        let value: Option<String> =
            sqlx::query_scalar("SELECT value FROM app_settings WHERE key = $1")
                .bind(key)
                .fetch_optional(self.pool)
                .await?;
        Ok(value)
    }
}
