//! PostgreSQL cart repository implementation
//!
//! The (cart_id, product_id) UNIQUE constraint backs the upsert and merge
//! queries; it is the only concurrency invariant storage enforces.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::models::{CartItemRow, CartRow};
use crate::repo::{CartRepository, UpsertCartItem};

const CART_COLUMNS: &str = "id, user_id, created_at, updated_at";
const ITEM_COLUMNS: &str = "id, cart_id, product_id, quantity, price";

/// PostgreSQL cart repository
#[derive(Clone)]
pub struct PgCartRepository {
    pool: PgPool,
}

impl PgCartRepository {
    /// Create a new cart repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CartRepository for PgCartRepository {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<CartRow>> {
        let cart = sqlx::query_as::<_, CartRow>(&format!(
            "SELECT {CART_COLUMNS} FROM carts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(cart)
    }

    async fn find_by_user(&self, user_id: Uuid) -> DbResult<Option<CartRow>> {
        let cart = sqlx::query_as::<_, CartRow>(&format!(
            "SELECT {CART_COLUMNS} FROM carts WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(cart)
    }

    async fn find_anonymous(&self, id: Uuid) -> DbResult<Option<CartRow>> {
        let cart = sqlx::query_as::<_, CartRow>(&format!(
            "SELECT {CART_COLUMNS} FROM carts WHERE id = $1 AND user_id IS NULL"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(cart)
    }

    async fn create(&self, user_id: Option<Uuid>) -> DbResult<CartRow> {
        let cart = sqlx::query_as::<_, CartRow>(&format!(
            "INSERT INTO carts (id, user_id) VALUES ($1, $2) RETURNING {CART_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(cart)
    }

    async fn assign_user(&self, id: Uuid, user_id: Uuid) -> DbResult<()> {
        let result = sqlx::query(
            "UPDATE carts SET user_id = $2, updated_at = NOW() WHERE id = $1 AND user_id IS NULL",
        )
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }
        Ok(())
    }

    async fn merge_into(&self, source: Uuid, target: Uuid) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        // Copy items over; shared products sum quantities and keep the
        // target's stored price.
        sqlx::query(
            r#"
            INSERT INTO cart_items (id, cart_id, product_id, quantity, price)
            SELECT gen_random_uuid(), $2, product_id, quantity, price
            FROM cart_items
            WHERE cart_id = $1
            ON CONFLICT (cart_id, product_id)
            DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity
            "#,
        )
        .bind(source)
        .bind(target)
        .execute(&mut *tx)
        .await?;

        // Dropping the cart row cascades to its items.
        sqlx::query("DELETE FROM carts WHERE id = $1")
            .bind(source)
            .execute(&mut *tx)
            .await?;

        sqlx::query("UPDATE carts SET updated_at = NOW() WHERE id = $1")
            .bind(target)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn upsert_item(&self, item: UpsertCartItem) -> DbResult<CartItemRow> {
        let row = sqlx::query_as::<_, CartItemRow>(&format!(
            r#"
            INSERT INTO cart_items (id, cart_id, product_id, quantity, price)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (cart_id, product_id)
            DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity
            RETURNING {ITEM_COLUMNS}
            "#
        ))
        .bind(item.id)
        .bind(item.cart_id)
        .bind(item.product_id)
        .bind(item.quantity)
        .bind(item.price)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn find_item(&self, id: Uuid) -> DbResult<Option<CartItemRow>> {
        let item = sqlx::query_as::<_, CartItemRow>(&format!(
            "SELECT {ITEM_COLUMNS} FROM cart_items WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    async fn update_item_quantity(&self, id: Uuid, quantity: i32) -> DbResult<CartItemRow> {
        let item = sqlx::query_as::<_, CartItemRow>(&format!(
            "UPDATE cart_items SET quantity = $2 WHERE id = $1 RETURNING {ITEM_COLUMNS}"
        ))
        .bind(id)
        .bind(quantity)
        .fetch_optional(&self.pool)
        .await?;

        item.ok_or(DbError::NotFound)
    }

    async fn delete_item(&self, id: Uuid) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM cart_items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }
        Ok(())
    }

    async fn items(&self, cart_id: Uuid) -> DbResult<Vec<CartItemRow>> {
        let items = sqlx::query_as::<_, CartItemRow>(&format!(
            "SELECT {ITEM_COLUMNS} FROM cart_items WHERE cart_id = $1 ORDER BY id"
        ))
        .bind(cart_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    async fn item_count(&self, cart_id: Uuid) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(quantity), 0)::BIGINT FROM cart_items WHERE cart_id = $1",
        )
        .bind(cart_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn total_price(&self, cart_id: Uuid) -> DbResult<Decimal> {
        let total: Decimal = sqlx::query_scalar(
            "SELECT COALESCE(SUM(quantity * price), 0::NUMERIC) FROM cart_items WHERE cart_id = $1",
        )
        .bind(cart_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }
}
