//! HTTP handlers

mod addresses;
mod auth;
mod cart;
mod catalog;
mod checkout;
mod health;
mod orders;

pub use addresses::{
    create_address, delete_address, list_addresses, set_default_address, update_address,
};
pub use auth::{login, logout, me, signup, update_profile};
pub use cart::{add_to_cart, remove_from_cart, update_cart_item, view_cart};
pub use catalog::{list_banners, list_products, product_detail};
pub use checkout::{checkout_page, submit_checkout};
pub use health::{health, ready};
pub use orders::{admin_orders, delete_order, list_my_orders, order_detail, update_order_status};
