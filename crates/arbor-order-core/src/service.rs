//! Order service
//!
//! Checkout splits into a read phase (preconditions: non-empty cart, owned
//! shipping address) and a commit phase delegated to
//! `OrderRepository::place_from_cart`, which snapshots cart items into order
//! items and clears the cart inside one transaction.

use std::str::FromStr;
use std::sync::Arc;

use uuid::Uuid;

use arbor_db::{
    AddressRepository, CartRepository, CartRow, DbError, OrderItemRow, OrderRepository, OrderRow,
    PlaceOrder, ProductRepository, ProductRow,
};
use arbor_types::{AddressId, CartContext, CartId, OrderId, OrderStatus, UserId};

use crate::OrderError;

/// The only supported payment method: cash on delivery
pub const PAYMENT_METHOD_COD: &str = "COD";

/// Caller identity for order operations
#[derive(Debug, Clone, Copy)]
pub struct Actor {
    pub user_id: UserId,
    pub is_staff: bool,
}

/// Outcome of a successful checkout
#[derive(Debug, Clone)]
pub struct PlacedOrder {
    pub order: OrderRow,
    /// Session slot with the item count reset to zero
    pub context: CartContext,
}

/// Outcome of a status update
#[derive(Debug, Clone, Copy)]
pub struct StatusChange {
    pub order_id: OrderId,
    pub status: OrderStatus,
}

/// One order line joined with its product
#[derive(Debug, Clone)]
pub struct OrderLine {
    pub item: OrderItemRow,
    pub product: ProductRow,
}

/// Read-model of an order for display
#[derive(Debug, Clone)]
pub struct OrderDetail {
    pub order: OrderRow,
    pub lines: Vec<OrderLine>,
}

/// Order engine over cart, address, order, and product repositories
#[derive(Clone)]
pub struct OrderService<C, A, O, P>
where
    C: CartRepository,
    A: AddressRepository,
    O: OrderRepository,
    P: ProductRepository,
{
    carts: Arc<C>,
    addresses: Arc<A>,
    orders: Arc<O>,
    products: Arc<P>,
}

impl<C, A, O, P> OrderService<C, A, O, P>
where
    C: CartRepository,
    A: AddressRepository,
    O: OrderRepository,
    P: ProductRepository,
{
    /// Create a new order service
    pub fn new(carts: Arc<C>, addresses: Arc<A>, orders: Arc<O>, products: Arc<P>) -> Self {
        Self {
            carts,
            addresses,
            orders,
            products,
        }
    }

    /// Place an order from the caller's resolved cart.
    ///
    /// The order's total is computed from the cart items inside the commit
    /// transaction, so it always equals the cart total at that instant.
    /// After success the cart row survives, empty.
    pub async fn checkout(
        &self,
        cart: &CartRow,
        user: UserId,
        shipping_address_id: Option<AddressId>,
    ) -> Result<PlacedOrder, OrderError> {
        if self.carts.item_count(cart.id).await? == 0 {
            return Err(OrderError::EmptyCart);
        }

        let address_id = shipping_address_id.ok_or_else(|| {
            OrderError::Validation("Please select a shipping address.".to_string())
        })?;

        let address = self
            .addresses
            .find_for_user(address_id.0, user.0)
            .await?
            .ok_or_else(|| {
                OrderError::Validation("Selected shipping address is invalid.".to_string())
            })?;

        let order = self
            .orders
            .place_from_cart(PlaceOrder {
                id: Uuid::new_v4(),
                cart_id: cart.id,
                user_id: Some(user.0),
                shipping_address_id: Some(address.id),
                payment_method: PAYMENT_METHOD_COD.to_string(),
            })
            .await
            .map_err(|e| match e {
                // Cart emptied between the precondition check and commit.
                DbError::NotFound => OrderError::EmptyCart,
                other => OrderError::Db(other),
            })?;

        tracing::info!(
            order_id = %order.id,
            user_id = %user,
            total = %order.total_price,
            "order placed"
        );

        Ok(PlacedOrder {
            order,
            context: CartContext::with_cart(CartId(cart.id), 0),
        })
    }

    /// Update an order's status.
    ///
    /// Staff may set any order to any of the five values; the set has no
    /// transition graph. A non-staff caller must own the order and its
    /// current status must be PENDING or PROCESSING. The *requested* status
    /// is not restricted for owners beyond parsing, so an owner can move
    /// their own pending order to any value, not just CANCELLED.
    pub async fn update_status(
        &self,
        actor: Actor,
        order_id: OrderId,
        requested: &str,
    ) -> Result<StatusChange, OrderError> {
        let order = self
            .orders
            .find_by_id(order_id.0)
            .await?
            .ok_or(OrderError::NotFound)?;

        if !actor.is_staff {
            if order.user_id != Some(actor.user_id.0) {
                return Err(OrderError::Unauthorized);
            }

            let current = OrderStatus::from_str(&order.status)
                .map_err(|e| OrderError::InvalidStatus(e.0))?;
            if !matches!(current, OrderStatus::Pending | OrderStatus::Processing) {
                return Err(OrderError::Precondition(
                    "Only pending or processing orders can be cancelled.".to_string(),
                ));
            }
        }

        let status = OrderStatus::from_str(requested)
            .map_err(|_| OrderError::InvalidStatus(requested.to_string()))?;

        self.orders.update_status(order.id, status.as_str()).await?;

        tracing::info!(order_id = %order.id, status = %status, "order status updated");

        Ok(StatusChange { order_id, status })
    }

    /// Delete an order.
    ///
    /// Staff delete anything; owners only their own orders and only once
    /// the order is CANCELLED.
    pub async fn delete(&self, actor: Actor, order_id: OrderId) -> Result<(), OrderError> {
        let order = self
            .orders
            .find_by_id(order_id.0)
            .await?
            .ok_or(OrderError::NotFound)?;

        if !actor.is_staff {
            if order.user_id != Some(actor.user_id.0) {
                return Err(OrderError::Unauthorized);
            }
            if order.status != OrderStatus::Cancelled.as_str() {
                return Err(OrderError::Precondition(
                    "Only cancelled orders can be removed from your list.".to_string(),
                ));
            }
        }

        self.orders.delete(order.id).await?;
        tracing::info!(order_id = %order.id, "order deleted");
        Ok(())
    }

    /// Fetch an order with its lines; visible to staff and the owner
    pub async fn get(&self, actor: Actor, order_id: OrderId) -> Result<OrderDetail, OrderError> {
        let order = self
            .orders
            .find_by_id(order_id.0)
            .await?
            .ok_or(OrderError::NotFound)?;

        if !actor.is_staff && order.user_id != Some(actor.user_id.0) {
            return Err(OrderError::Unauthorized);
        }

        self.with_lines(order).await
    }

    /// The caller's orders, most recent first
    pub async fn list_for_user(&self, user: UserId) -> Result<Vec<OrderRow>, OrderError> {
        Ok(self.orders.list_by_user(user.0).await?)
    }

    /// Every order, most recent first; staff only
    pub async fn list_all(&self, actor: Actor) -> Result<Vec<OrderRow>, OrderError> {
        if !actor.is_staff {
            return Err(OrderError::Unauthorized);
        }
        Ok(self.orders.list_all().await?)
    }

    async fn with_lines(&self, order: OrderRow) -> Result<OrderDetail, OrderError> {
        let items = self.orders.items(order.id).await?;

        let product_ids: Vec<Uuid> = items.iter().map(|i| i.product_id).collect();
        let products = self.products.find_many(&product_ids).await?;

        let mut lines = Vec::with_capacity(items.len());
        for item in items {
            let product = products
                .iter()
                .find(|p| p.id == item.product_id)
                .cloned()
                .ok_or(OrderError::NotFound)?;
            lines.push(OrderLine { item, product });
        }

        Ok(OrderDetail { order, lines })
    }
}
