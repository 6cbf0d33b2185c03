//! Mock repositories for testing
//!
//! In-memory stands-ins for the cart and product repositories. The mock
//! cart repository reproduces the storage invariants the service relies
//! on: one item row per (cart, product) and quantity summing on conflict.

use arbor_db::{
    CartItemRow, CartRepository, CartRow, DbError, DbResult, ProductFilter, ProductRepository,
    ProductRow, UpsertCartItem,
};
use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

/// In-memory cart repository for testing
#[derive(Default, Clone)]
pub struct MockCartRepository {
    carts: Arc<DashMap<Uuid, CartRow>>,
    items: Arc<DashMap<Uuid, CartItemRow>>,
}

impl MockCartRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cart rows currently stored
    #[allow(dead_code)]
    pub fn cart_count(&self) -> usize {
        self.carts.len()
    }

    /// Whether a cart row still exists
    #[allow(dead_code)]
    pub fn cart_exists(&self, id: Uuid) -> bool {
        self.carts.contains_key(&id)
    }
}

#[async_trait]
impl CartRepository for MockCartRepository {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<CartRow>> {
        Ok(self.carts.get(&id).map(|r| r.value().clone()))
    }

    async fn find_by_user(&self, user_id: Uuid) -> DbResult<Option<CartRow>> {
        Ok(self
            .carts
            .iter()
            .find(|r| r.value().user_id == Some(user_id))
            .map(|r| r.value().clone()))
    }

    async fn find_anonymous(&self, id: Uuid) -> DbResult<Option<CartRow>> {
        Ok(self
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
        self.carts.insert(cart.id, cart.clone());
        Ok(cart)
    }

    async fn assign_user(&self, id: Uuid, user_id: Uuid) -> DbResult<()> {
        let mut cart = self.carts.get_mut(&id).ok_or(DbError::NotFound)?;
        if cart.user_id.is_some() {
            return Err(DbError::NotFound);
        }
        cart.user_id = Some(user_id);
        cart.updated_at = Utc::now();
        Ok(())
    }

    async fn merge_into(&self, source: Uuid, target: Uuid) -> DbResult<()> {
        let source_items: Vec<CartItemRow> = self
            .items
            .iter()
            .filter(|r| r.value().cart_id == source)
            .map(|r| r.value().clone())
            .collect();

        for item in source_items {
            let existing = self
                .items
                .iter()
                .find(|r| r.value().cart_id == target && r.value().product_id == item.product_id)
                .map(|r| r.value().id);

            match existing {
                Some(id) => {
                    // Shared product: sum quantities, keep the target's price.
                    if let Some(mut row) = self.items.get_mut(&id) {
                        row.quantity += item.quantity;
                    }
                }
                None => {
                    let row = CartItemRow {
                        id: Uuid::new_v4(),
                        cart_id: target,
                        product_id: item.product_id,
                        quantity: item.quantity,
                        price: item.price,
                    };
                    self.items.insert(row.id, row);
                }
            }
        }

        self.items.retain(|_, item| item.cart_id != source);
        self.carts.remove(&source);
        Ok(())
    }

    async fn upsert_item(&self, item: UpsertCartItem) -> DbResult<CartItemRow> {
        let existing = self
            .items
            .iter()
            .find(|r| r.value().cart_id == item.cart_id && r.value().product_id == item.product_id)
            .map(|r| r.value().id);

        match existing {
            Some(id) => {
                let mut row = self.items.get_mut(&id).ok_or(DbError::NotFound)?;
                row.quantity += item.quantity;
                Ok(row.clone())
            }
            None => {
                let row = CartItemRow {
                    id: item.id,
                    cart_id: item.cart_id,
                    product_id: item.product_id,
                    quantity: item.quantity,
                    price: item.price,
                };
                self.items.insert(row.id, row.clone());
                Ok(row)
            }
        }
    }

    async fn find_item(&self, id: Uuid) -> DbResult<Option<CartItemRow>> {
        Ok(self.items.get(&id).map(|r| r.value().clone()))
    }

    async fn update_item_quantity(&self, id: Uuid, quantity: i32) -> DbResult<CartItemRow> {
        let mut row = self.items.get_mut(&id).ok_or(DbError::NotFound)?;
        row.quantity = quantity;
        Ok(row.clone())
    }

    async fn delete_item(&self, id: Uuid) -> DbResult<()> {
        self.items.remove(&id).map(|_| ()).ok_or(DbError::NotFound)
    }

    async fn items(&self, cart_id: Uuid) -> DbResult<Vec<CartItemRow>> {
        Ok(self
            .items
            .iter()
            .filter(|r| r.value().cart_id == cart_id)
            .map(|r| r.value().clone())
            .collect())
    }

    async fn item_count(&self, cart_id: Uuid) -> DbResult<i64> {
        Ok(self
            .items
            .iter()
            .filter(|r| r.value().cart_id == cart_id)
            .map(|r| i64::from(r.value().quantity))
            .sum())
    }

    async fn total_price(&self, cart_id: Uuid) -> DbResult<Decimal> {
        Ok(self
            .items
            .iter()
            .filter(|r| r.value().cart_id == cart_id)
            .map(|r| r.value().line_total())
            .sum())
    }
}

/// In-memory product repository for testing
#[derive(Default, Clone)]
pub struct MockProductRepository {
    products: Arc<DashMap<Uuid, ProductRow>>,
}

impl MockProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a test product directly
    pub fn insert(&self, product: ProductRow) {
        self.products.insert(product.id, product);
    }

    /// Overwrite a product's price/sale fields to simulate catalog edits
    #[allow(dead_code)]
    pub fn reprice(&self, id: Uuid, price: Decimal, on_sale: bool, discount: Decimal) {
        if let Some(mut p) = self.products.get_mut(&id) {
            p.price = price;
            p.on_sale = on_sale;
            p.discount_percentage = discount;
        }
    }
}

/// Build a test product
pub fn make_product(name: &str, price: &str, on_sale: bool, discount: &str) -> ProductRow {
    ProductRow {
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
        on_sale,
        discount_percentage: discount.parse().unwrap(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

#[async_trait]
impl ProductRepository for MockProductRepository {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<ProductRow>> {
        Ok(self.products.get(&id).map(|r| r.value().clone()))
    }

    async fn find_many(&self, ids: &[Uuid]) -> DbResult<Vec<ProductRow>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.products.get(id).map(|r| r.value().clone()))
            .collect())
    }

    async fn list(&self, _filter: &ProductFilter) -> DbResult<Vec<ProductRow>> {
        Ok(self
            .products
            .iter()
            .filter(|r| r.value().is_available)
            .map(|r| r.value().clone())
            .collect())
    }

    async fn related(
        &self,
        category: &str,
        exclude: Uuid,
        limit: i64,
    ) -> DbResult<Vec<ProductRow>> {
        Ok(self
            .products
            .iter()
            .filter(|r| {
                r.value().category == category && r.value().id != exclude && r.value().is_available
            })
            .take(limit as usize)
            .map(|r| r.value().clone())
            .collect())
    }
}
