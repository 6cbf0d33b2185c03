//! Arbor Types - Shared domain types
//!
//! This crate contains domain types used across Arbor crates:
//! - Entity identifiers (users, products, carts, addresses, orders)
//! - Order status values
//! - The request-scoped cart context carried by the session layer

pub mod cart;
pub mod ids;
pub mod status;

pub use cart::*;
pub use ids::*;
pub use status::*;
