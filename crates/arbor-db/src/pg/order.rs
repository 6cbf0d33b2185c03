//! PostgreSQL order repository implementation
//!
//! `place_from_cart` is the checkout commit phase: a single transaction
//! that snapshots the cart into an order and clears the cart's items.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::models::{CartItemRow, OrderItemRow, OrderRow};
use crate::repo::{OrderRepository, PlaceOrder};

const ORDER_COLUMNS: &str =
    "id, user_id, order_date, total_price, shipping_address_id, payment_method, status";
const ORDER_ITEM_COLUMNS: &str = "id, order_id, product_id, quantity, price";

/// PostgreSQL order repository
#[derive(Clone)]
pub struct PgOrderRepository {
    pool: PgPool,
}

impl PgOrderRepository {
    /// Create a new order repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<OrderRow>> {
        let order = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    async fn list_by_user(&self, user_id: Uuid) -> DbResult<Vec<OrderRow>> {
        let orders = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = $1 ORDER BY order_date DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    async fn list_all(&self) -> DbResult<Vec<OrderRow>> {
        let orders = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders ORDER BY order_date DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    async fn place_from_cart(&self, order: PlaceOrder) -> DbResult<OrderRow> {
        let mut tx = self.pool.begin().await?;

        let items = sqlx::query_as::<_, CartItemRow>(
            "SELECT id, cart_id, product_id, quantity, price FROM cart_items WHERE cart_id = $1",
        )
        .bind(order.cart_id)
        .fetch_all(&mut *tx)
        .await?;

        if items.is_empty() {
            // Cart emptied between the read phase and here; nothing to
            // snapshot, the transaction rolls back on drop.
            return Err(DbError::NotFound);
        }

        let total: Decimal = items.iter().map(CartItemRow::line_total).sum();

        let row = sqlx::query_as::<_, OrderRow>(&format!(
            r#"
            INSERT INTO orders (id, user_id, total_price, shipping_address_id,
                                payment_method, status)
            VALUES ($1, $2, $3, $4, $5, 'PENDING')
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(order.id)
        .bind(order.user_id)
        .bind(total)
        .bind(order.shipping_address_id)
        .bind(&order.payment_method)
        .fetch_one(&mut *tx)
        .await?;

        for item in &items {
            sqlx::query(
                r#"
                INSERT INTO order_items (id, order_id, product_id, quantity, price)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(row.id)
            .bind(item.product_id)
            .bind(item.quantity)
            .bind(item.price)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query("DELETE FROM cart_items WHERE cart_id = $1")
            .bind(order.cart_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(row)
    }

    async fn update_status(&self, id: Uuid, status: &str) -> DbResult<()> {
        let result = sqlx::query("UPDATE orders SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }
        Ok(())
    }

    async fn items(&self, order_id: Uuid) -> DbResult<Vec<OrderItemRow>> {
        let items = sqlx::query_as::<_, OrderItemRow>(&format!(
            "SELECT {ORDER_ITEM_COLUMNS} FROM order_items WHERE order_id = $1 ORDER BY id"
        ))
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }
}
