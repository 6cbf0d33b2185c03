//! Repository traits
//!
//! Define async repository interfaces for database operations. The cart and
//! order traits expose a handful of multi-statement operations (merge,
//! checkout placement, default-address swap); implementations must run each
//! of those inside a single transaction.

use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::DbResult;
use crate::models::*;

/// User repository trait
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by ID
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<UserRow>>;

    /// Find a user by email
    async fn find_by_email(&self, email: &str) -> DbResult<Option<UserRow>>;

    /// Create a new user
    async fn create(&self, user: CreateUser) -> DbResult<UserRow>;

    /// Update profile fields (email, names)
    async fn update_profile(&self, id: Uuid, profile: UpdateProfile) -> DbResult<UserRow>;
}

/// Create user input
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub is_staff: bool,
}

/// Profile update input
#[derive(Debug, Clone)]
pub struct UpdateProfile {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

/// Product sort orders exposed by the catalog
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProductSort {
    /// Newest arrivals first (default)
    #[default]
    Newest,
    /// Price: low to high
    PriceAsc,
    /// Price: high to low
    PriceDesc,
    /// Name: A-Z
    NameAsc,
}

impl ProductSort {
    /// Parse a query-string sort value; unknown values fall back to Newest
    pub fn from_param(s: &str) -> Self {
        match s {
            "price" => Self::PriceAsc,
            "-price" => Self::PriceDesc,
            "name" => Self::NameAsc,
            _ => Self::Newest,
        }
    }
}

/// Catalog listing filter
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub category: Option<String>,
    pub material: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub requires_assembly: Option<bool>,
    pub sort: ProductSort,
}

/// Product repository trait
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Find a product by ID
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<ProductRow>>;

    /// Find several products by ID (order unspecified)
    async fn find_many(&self, ids: &[Uuid]) -> DbResult<Vec<ProductRow>>;

    /// List available products matching the filter
    async fn list(&self, filter: &ProductFilter) -> DbResult<Vec<ProductRow>>;

    /// Random available products from the same category, excluding one
    async fn related(&self, category: &str, exclude: Uuid, limit: i64) -> DbResult<Vec<ProductRow>>;
}

/// Cart repository trait
///
/// Covers the cart aggregate: cart rows and their items.
#[async_trait]
pub trait CartRepository: Send + Sync {
    /// Find a cart by ID
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<CartRow>>;

    /// Find the cart owned by a user
    async fn find_by_user(&self, user_id: Uuid) -> DbResult<Option<CartRow>>;

    /// Find a cart by ID only if it is still ownerless
    async fn find_anonymous(&self, id: Uuid) -> DbResult<Option<CartRow>>;

    /// Create a cart, optionally owned by a user
    async fn create(&self, user_id: Option<Uuid>) -> DbResult<CartRow>;

    /// Assign ownership of an ownerless cart
    async fn assign_user(&self, id: Uuid, user_id: Uuid) -> DbResult<()>;

    /// Merge all items of `source` into `target`, summing quantities for
    /// shared products and keeping the target's stored price, then delete
    /// the source cart. Single transaction.
    async fn merge_into(&self, source: Uuid, target: Uuid) -> DbResult<()>;

    /// Insert a cart item, or increment quantity if one already exists for
    /// the (cart, product) pair. The stored price is never overwritten.
    async fn upsert_item(&self, item: UpsertCartItem) -> DbResult<CartItemRow>;

    /// Find a cart item by ID
    async fn find_item(&self, id: Uuid) -> DbResult<Option<CartItemRow>>;

    /// Set a cart item's quantity
    async fn update_item_quantity(&self, id: Uuid, quantity: i32) -> DbResult<CartItemRow>;

    /// Delete a cart item
    async fn delete_item(&self, id: Uuid) -> DbResult<()>;

    /// All items in a cart
    async fn items(&self, cart_id: Uuid) -> DbResult<Vec<CartItemRow>>;

    /// Total item quantity in a cart (0 when empty)
    async fn item_count(&self, cart_id: Uuid) -> DbResult<i64>;

    /// Exact cart total: sum of quantity x stored price (0 when empty)
    async fn total_price(&self, cart_id: Uuid) -> DbResult<Decimal>;
}

/// Cart item upsert input
#[derive(Debug, Clone)]
pub struct UpsertCartItem {
    pub id: Uuid,
    pub cart_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub price: Decimal,
}

/// Address repository trait
#[async_trait]
pub trait AddressRepository: Send + Sync {
    /// Find an address by ID
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<AddressRow>>;

    /// Find an address by ID scoped to its owner
    async fn find_for_user(&self, id: Uuid, user_id: Uuid) -> DbResult<Option<AddressRow>>;

    /// All addresses of a user
    async fn list_by_user(&self, user_id: Uuid) -> DbResult<Vec<AddressRow>>;

    /// Create an address
    async fn create(&self, address: CreateAddress) -> DbResult<AddressRow>;

    /// Update an owned address
    async fn update(&self, id: Uuid, user_id: Uuid, fields: AddressFields) -> DbResult<AddressRow>;

    /// Delete an address
    async fn delete(&self, id: Uuid) -> DbResult<()>;

    /// Make `id` the user's only default address. Clears the previous
    /// default in the same transaction.
    async fn set_default(&self, user_id: Uuid, id: Uuid) -> DbResult<()>;
}

/// Create address input
#[derive(Debug, Clone)]
pub struct CreateAddress {
    pub id: Uuid,
    pub user_id: Uuid,
    pub fields: AddressFields,
}

/// Mutable address fields
#[derive(Debug, Clone)]
pub struct AddressFields {
    pub first_name: String,
    pub last_name: String,
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    pub is_default: bool,
}

/// Order repository trait
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Find an order by ID
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<OrderRow>>;

    /// A user's orders, most recent first
    async fn list_by_user(&self, user_id: Uuid) -> DbResult<Vec<OrderRow>>;

    /// Every order, most recent first (staff dashboard)
    async fn list_all(&self) -> DbResult<Vec<OrderRow>>;

    /// Convert a cart into an order in one transaction: read the cart's
    /// items, compute the exact total, insert the order and one order item
    /// per cart item (preserving quantity and stored price), then delete
    /// the cart items. Returns NotFound when the cart holds no items; no
    /// partial state is left behind.
    async fn place_from_cart(&self, order: PlaceOrder) -> DbResult<OrderRow>;

    /// Overwrite an order's status value
    async fn update_status(&self, id: Uuid, status: &str) -> DbResult<()>;

    /// Delete an order and its items
    async fn delete(&self, id: Uuid) -> DbResult<()>;

    /// All items of an order
    async fn items(&self, order_id: Uuid) -> DbResult<Vec<OrderItemRow>>;
}

/// Order placement input
#[derive(Debug, Clone)]
pub struct PlaceOrder {
    pub id: Uuid,
    pub cart_id: Uuid,
    pub user_id: Option<Uuid>,
    pub shipping_address_id: Option<Uuid>,
    pub payment_method: String,
}

/// Sale banner repository trait
#[async_trait]
pub trait BannerRepository: Send + Sync {
    /// Active banners whose sale window has not closed, newest update first
    async fn list_active(&self) -> DbResult<Vec<SaleBannerRow>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_param_known_values() {
        assert_eq!(ProductSort::from_param("price"), ProductSort::PriceAsc);
        assert_eq!(ProductSort::from_param("-price"), ProductSort::PriceDesc);
        assert_eq!(ProductSort::from_param("name"), ProductSort::NameAsc);
        assert_eq!(ProductSort::from_param("-created_at"), ProductSort::Newest);
    }

    #[test]
    fn test_sort_param_fallback() {
        assert_eq!(ProductSort::from_param("garbage"), ProductSort::Newest);
        assert_eq!(ProductSort::from_param(""), ProductSort::Newest);
    }
}
