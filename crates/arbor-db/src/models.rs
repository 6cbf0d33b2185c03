//! Database row models
//!
//! These types map directly to database rows using SQLx's FromRow derive.
//! Prices are `rust_decimal::Decimal` backed by Postgres NUMERIC columns;
//! no floating point enters price arithmetic.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

/// User row from the database
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub is_staff: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Product row from the database
#[derive(Debug, Clone, FromRow)]
pub struct ProductRow {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub image_url: Option<String>,
    pub category: String,
    pub material: String,
    pub stock_quantity: i32,
    pub is_available: bool,
    pub requires_assembly: bool,
    pub on_sale: bool,
    pub discount_percentage: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProductRow {
    /// Price after the sale discount: `price - price * (discount / 100)`
    /// when the product is on sale with a positive discount, else the list
    /// price. Never stored; cart items snapshot it at add time.
    pub fn discounted_price(&self) -> Decimal {
        if self.on_sale && self.discount_percentage > Decimal::ZERO {
            let discount = self.price * (self.discount_percentage / Decimal::ONE_HUNDRED);
            self.price - discount
        } else {
            self.price
        }
    }
}

/// Cart row from the database
///
/// `user_id` is NULL for anonymous carts; the column is UNIQUE so a user
/// owns at most one cart.
#[derive(Debug, Clone, FromRow)]
pub struct CartRow {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CartRow {
    /// Whether the cart has no owner
    pub fn is_anonymous(&self) -> bool {
        self.user_id.is_none()
    }
}

/// Cart item row from the database
///
/// `price` is the unit price snapshotted when the item was first added; it
/// is never refreshed from the product, even if the sale state changes.
#[derive(Debug, Clone, FromRow)]
pub struct CartItemRow {
    pub id: Uuid,
    pub cart_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub price: Decimal,
}

impl CartItemRow {
    /// Line total: quantity x stored unit price
    pub fn line_total(&self) -> Decimal {
        Decimal::from(self.quantity) * self.price
    }
}

/// Address row from the database
#[derive(Debug, Clone, FromRow)]
pub struct AddressRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    pub is_default: bool,
}

/// Order row from the database
///
/// `total_price` is an immutable snapshot taken at checkout. `status` holds
/// one of the `OrderStatus` string values.
#[derive(Debug, Clone, FromRow)]
pub struct OrderRow {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub order_date: DateTime<Utc>,
    pub total_price: Decimal,
    pub shipping_address_id: Option<Uuid>,
    pub payment_method: String,
    pub status: String,
}

/// Order item row from the database
#[derive(Debug, Clone, FromRow)]
pub struct OrderItemRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub price: Decimal,
}

impl OrderItemRow {
    /// Line total: quantity x snapshotted unit price
    pub fn line_total(&self) -> Decimal {
        Decimal::from(self.quantity) * self.price
    }
}

/// Sale banner row from the database
#[derive(Debug, Clone, FromRow)]
pub struct SaleBannerRow {
    pub id: Uuid,
    pub title: String,
    pub featured_product_id: Option<Uuid>,
    pub custom_message: Option<String>,
    pub sale_end_date: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(price: &str, on_sale: bool, discount: &str) -> ProductRow {
        ProductRow {
            id: Uuid::new_v4(),
            name: "Walnut Side Table".to_string(),
            description: None,
            price: price.parse().unwrap(),
            image_url: None,
            category: "LIVING_ROOM".to_string(),
            material: "WOOD".to_string(),
            stock_quantity: 10,
            is_available: true,
            requires_assembly: false,
            on_sale,
            discount_percentage: discount.parse().unwrap(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_discounted_price_on_sale() {
        let p = product("100.00", true, "25.00");
        assert_eq!(p.discounted_price(), "75.00".parse::<Decimal>().unwrap());
    }

    #[test]
    fn test_discounted_price_not_on_sale() {
        let p = product("100.00", false, "25.00");
        assert_eq!(p.discounted_price(), p.price);
    }

    #[test]
    fn test_discounted_price_zero_discount() {
        let p = product("49.90", true, "0.00");
        assert_eq!(p.discounted_price(), p.price);
    }

    #[test]
    fn test_discounted_price_exact_decimal() {
        // 19.99 at 10% off = 17.991, no binary float drift
        let p = product("19.99", true, "10.00");
        assert_eq!(p.discounted_price(), "17.991".parse::<Decimal>().unwrap());
    }

    #[test]
    fn test_line_total_exact() {
        let item = CartItemRow {
            id: Uuid::new_v4(),
            cart_id: Uuid::new_v4(),
            product_id: Uuid::new_v4(),
            quantity: 3,
            price: "19.99".parse().unwrap(),
        };
        assert_eq!(item.line_total(), "59.97".parse::<Decimal>().unwrap());
    }
}
