//! Arbor Cart Core - The cart engine
//!
//! Owns cart resolution (anonymous carts, merge-on-login, adoption), item
//! mutation with price snapshots, and exact decimal totals. The engine is
//! stateless: every call takes the session's [`CartContext`] explicitly and
//! returns the refreshed context for the HTTP layer to persist.
//!
//! [`CartContext`]: arbor_types::CartContext

pub mod error;
pub mod service;

pub use error::CartError;
pub use service::{AddedItem, CartLine, CartService, CartView, RemovedItem, ResolvedCart, UpdatedItem};
