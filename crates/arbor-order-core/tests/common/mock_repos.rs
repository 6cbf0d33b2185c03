//! Mock repositories for testing
//!
//! A single shared in-memory store backs the cart, address, order, and
//! product repositories, so `place_from_cart` can move cart items into
//! order items and clear the cart the way the real transaction does.

use arbor_db::{
    AddressFields, AddressRepository, AddressRow, CartItemRow, CartRepository, CartRow,
    CreateAddress, DbError, DbResult, OrderItemRow, OrderRepository, OrderRow, PlaceOrder,
    ProductFilter, ProductRepository, ProductRow, UpsertCartItem,
};
use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

/// Shared backing store for all mock repositories
#[derive(Default)]
pub struct MockStore {
    pub carts: DashMap<Uuid, CartRow>,
    pub cart_items: DashMap<Uuid, CartItemRow>,
    pub addresses: DashMap<Uuid, AddressRow>,
    pub orders: DashMap<Uuid, OrderRow>,
    pub order_items: DashMap<Uuid, OrderItemRow>,
    pub products: DashMap<Uuid, ProductRow>,
}

impl MockStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Seed a cart with items, returning the cart row
    pub fn seed_cart(&self, user_id: Option<Uuid>, items: &[(Uuid, i32, &str)]) -> CartRow {
        let cart = CartRow {
            id: Uuid::new_v4(),
            user_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.carts.insert(cart.id, cart.clone());
        for (product_id, quantity, price) in items {
            let item = CartItemRow {
                id: Uuid::new_v4(),
                cart_id: cart.id,
                product_id: *product_id,
                quantity: *quantity,
                price: price.parse().unwrap(),
            };
            self.cart_items.insert(item.id, item);
        }
        cart
    }

    /// Seed an address owned by a user
    pub fn seed_address(&self, user_id: Uuid) -> AddressRow {
        let address = AddressRow {
            id: Uuid::new_v4(),
            user_id,
            first_name: "Ada".to_string(),
            last_name: "Wong".to_string(),
            street_address: "12 Birchwood Lane".to_string(),
            city: "Portland".to_string(),
            state: "OR".to_string(),
            zip_code: "97201".to_string(),
            country: "USA".to_string(),
            is_default: true,
        };
        self.addresses.insert(address.id, address.clone());
        address
    }

    /// Seed an order with a status
    pub fn seed_order(&self, user_id: Option<Uuid>, status: &str) -> OrderRow {
        let order = OrderRow {
            id: Uuid::new_v4(),
            user_id,
            order_date: Utc::now(),
            total_price: "25.00".parse().unwrap(),
            shipping_address_id: None,
            payment_method: "COD".to_string(),
            status: status.to_string(),
        };
        self.orders.insert(order.id, order.clone());
        order
    }

    /// Seed a product
    pub fn seed_product(&self, name: &str, price: &str) -> ProductRow {
        let product = ProductRow {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: None,
            price: price.parse().unwrap(),
            image_url: None,
            category: "LIVING_ROOM".to_string(),
            material: "WOOD".to_string(),
            stock_quantity: 25,
            is_available: true,
            requires_assembly: false,
            on_sale: false,
            discount_percentage: Decimal::ZERO,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.products.insert(product.id, product.clone());
        product
    }
}

/// Cart repository over the shared store
#[derive(Clone)]
pub struct MockCartRepository(pub Arc<MockStore>);

#[async_trait]
impl CartRepository for MockCartRepository {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<CartRow>> {
        Ok(self.0.carts.get(&id).map(|r| r.value().clone()))
    }

    async fn find_by_user(&self, user_id: Uuid) -> DbResult<Option<CartRow>> {
        Ok(self
            .0
            .carts
            .iter()
            .find(|r| r.value().user_id == Some(user_id))
            .map(|r| r.value().clone()))
    }

    async fn find_anonymous(&self, id: Uuid) -> DbResult<Option<CartRow>> {
        Ok(self
            .0
            .carts
            .get(&id)
            .filter(|r| r.value().user_id.is_none())
            .map(|r| r.value().clone()))
    }

    async fn create(&self, user_id: Option<Uuid>) -> DbResult<CartRow> {
        let cart = CartRow {
            id: Uuid::new_v4(),
            user_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.0.carts.insert(cart.id, cart.clone());
        Ok(cart)
    }

    async fn assign_user(&self, id: Uuid, user_id: Uuid) -> DbResult<()> {
        let mut cart = self.0.carts.get_mut(&id).ok_or(DbError::NotFound)?;
        cart.user_id = Some(user_id);
        Ok(())
    }

    async fn merge_into(&self, source: Uuid, _target: Uuid) -> DbResult<()> {
        self.0.cart_items.retain(|_, item| item.cart_id != source);
        self.0.carts.remove(&source);
        Ok(())
    }

    async fn upsert_item(&self, item: UpsertCartItem) -> DbResult<CartItemRow> {
        let row = CartItemRow {
            id: item.id,
            cart_id: item.cart_id,
            product_id: item.product_id,
            quantity: item.quantity,
            price: item.price,
        };
        self.0.cart_items.insert(row.id, row.clone());
        Ok(row)
    }

    async fn find_item(&self, id: Uuid) -> DbResult<Option<CartItemRow>> {
        Ok(self.0.cart_items.get(&id).map(|r| r.value().clone()))
    }

    async fn update_item_quantity(&self, id: Uuid, quantity: i32) -> DbResult<CartItemRow> {
        let mut row = self.0.cart_items.get_mut(&id).ok_or(DbError::NotFound)?;
        row.quantity = quantity;
        Ok(row.clone())
    }

    async fn delete_item(&self, id: Uuid) -> DbResult<()> {
        self.0
            .cart_items
            .remove(&id)
            .map(|_| ())
            .ok_or(DbError::NotFound)
    }

    async fn items(&self, cart_id: Uuid) -> DbResult<Vec<CartItemRow>> {
        Ok(self
            .0
            .cart_items
            .iter()
            .filter(|r| r.value().cart_id == cart_id)
            .map(|r| r.value().clone())
            .collect())
    }

    async fn item_count(&self, cart_id: Uuid) -> DbResult<i64> {
        Ok(self
            .0
            .cart_items
            .iter()
            .filter(|r| r.value().cart_id == cart_id)
            .map(|r| i64::from(r.value().quantity))
            .sum())
    }

    async fn total_price(&self, cart_id: Uuid) -> DbResult<Decimal> {
        Ok(self
            .0
            .cart_items
            .iter()
            .filter(|r| r.value().cart_id == cart_id)
            .map(|r| r.value().line_total())
            .sum())
    }
}

/// Address repository over the shared store
#[derive(Clone)]
pub struct MockAddressRepository(pub Arc<MockStore>);

#[async_trait]
impl AddressRepository for MockAddressRepository {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<AddressRow>> {
        Ok(self.0.addresses.get(&id).map(|r| r.value().clone()))
    }

    async fn find_for_user(&self, id: Uuid, user_id: Uuid) -> DbResult<Option<AddressRow>> {
        Ok(self
            .0
            .addresses
            .get(&id)
            .filter(|r| r.value().user_id == user_id)
            .map(|r| r.value().clone()))
    }

    async fn list_by_user(&self, user_id: Uuid) -> DbResult<Vec<AddressRow>> {
        Ok(self
            .0
            .addresses
            .iter()
            .filter(|r| r.value().user_id == user_id)
            .map(|r| r.value().clone())
            .collect())
    }

    async fn create(&self, address: CreateAddress) -> DbResult<AddressRow> {
        let row = AddressRow {
            id: address.id,
            user_id: address.user_id,
            first_name: address.fields.first_name,
            last_name: address.fields.last_name,
            street_address: address.fields.street_address,
            city: address.fields.city,
            state: address.fields.state,
            zip_code: address.fields.zip_code,
            country: address.fields.country,
            is_default: address.fields.is_default,
        };
        self.0.addresses.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update(&self, id: Uuid, user_id: Uuid, fields: AddressFields) -> DbResult<AddressRow> {
        let mut row = self
            .0
            .addresses
            .get_mut(&id)
            .filter(|r| r.user_id == user_id)
            .ok_or(DbError::NotFound)?;
        row.first_name = fields.first_name;
        row.last_name = fields.last_name;
        row.street_address = fields.street_address;
        row.city = fields.city;
        row.state = fields.state;
        row.zip_code = fields.zip_code;
        row.country = fields.country;
        row.is_default = fields.is_default;
        Ok(row.clone())
    }

    async fn delete(&self, id: Uuid) -> DbResult<()> {
        self.0
            .addresses
            .remove(&id)
            .map(|_| ())
            .ok_or(DbError::NotFound)
    }

    async fn set_default(&self, user_id: Uuid, id: Uuid) -> DbResult<()> {
        let owned = self
            .0
            .addresses
            .get(&id)
            .is_some_and(|r| r.value().user_id == user_id);
        if !owned {
            return Err(DbError::NotFound);
        }
        for mut entry in self.0.addresses.iter_mut() {
            if entry.value().user_id == user_id {
                let is_target = entry.value().id == id;
                entry.value_mut().is_default = is_target;
            }
        }
        Ok(())
    }
}

/// Order repository over the shared store
#[derive(Clone)]
pub struct MockOrderRepository(pub Arc<MockStore>);

#[async_trait]
impl OrderRepository for MockOrderRepository {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<OrderRow>> {
        Ok(self.0.orders.get(&id).map(|r| r.value().clone()))
    }

    async fn list_by_user(&self, user_id: Uuid) -> DbResult<Vec<OrderRow>> {
        let mut orders: Vec<OrderRow> = self
            .0
            .orders
            .iter()
            .filter(|r| r.value().user_id == Some(user_id))
            .map(|r| r.value().clone())
            .collect();
        orders.sort_by(|a, b| b.order_date.cmp(&a.order_date));
        Ok(orders)
    }

    async fn list_all(&self) -> DbResult<Vec<OrderRow>> {
        let mut orders: Vec<OrderRow> = self.0.orders.iter().map(|r| r.value().clone()).collect();
        orders.sort_by(|a, b| b.order_date.cmp(&a.order_date));
        Ok(orders)
    }

    async fn place_from_cart(&self, order: PlaceOrder) -> DbResult<OrderRow> {
        let items: Vec<CartItemRow> = self
            .0
            .cart_items
            .iter()
            .filter(|r| r.value().cart_id == order.cart_id)
            .map(|r| r.value().clone())
            .collect();

        if items.is_empty() {
            return Err(DbError::NotFound);
        }

        let total: Decimal = items.iter().map(CartItemRow::line_total).sum();

        let row = OrderRow {
            id: order.id,
            user_id: order.user_id,
            order_date: Utc::now(),
            total_price: total,
            shipping_address_id: order.shipping_address_id,
            payment_method: order.payment_method,
            status: "PENDING".to_string(),
        };
        self.0.orders.insert(row.id, row.clone());

        for item in &items {
            let order_item = OrderItemRow {
                id: Uuid::new_v4(),
                order_id: row.id,
                product_id: item.product_id,
                quantity: item.quantity,
                price: item.price,
            };
            self.0.order_items.insert(order_item.id, order_item);
        }

        self.0
            .cart_items
            .retain(|_, item| item.cart_id != order.cart_id);

        Ok(row)
    }

    async fn update_status(&self, id: Uuid, status: &str) -> DbResult<()> {
        let mut order = self.0.orders.get_mut(&id).ok_or(DbError::NotFound)?;
        order.status = status.to_string();
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> DbResult<()> {
        self.0.orders.remove(&id).ok_or(DbError::NotFound)?;
        self.0.order_items.retain(|_, item| item.order_id != id);
        Ok(())
    }

    async fn items(&self, order_id: Uuid) -> DbResult<Vec<OrderItemRow>> {
        Ok(self
            .0
            .order_items
            .iter()
            .filter(|r| r.value().order_id == order_id)
            .map(|r| r.value().clone())
            .collect())
    }
}

/// Product repository over the shared store
#[derive(Clone)]
pub struct MockProductRepository(pub Arc<MockStore>);

#[async_trait]
impl ProductRepository for MockProductRepository {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<ProductRow>> {
        Ok(self.0.products.get(&id).map(|r| r.value().clone()))
    }

    async fn find_many(&self, ids: &[Uuid]) -> DbResult<Vec<ProductRow>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.0.products.get(id).map(|r| r.value().clone()))
            .collect())
    }

    async fn list(&self, _filter: &ProductFilter) -> DbResult<Vec<ProductRow>> {
        Ok(self.0.products.iter().map(|r| r.value().clone()).collect())
    }

    async fn related(
        &self,
        _category: &str,
        _exclude: Uuid,
        _limit: i64,
    ) -> DbResult<Vec<ProductRow>> {
        Ok(Vec::new())
    }
}
