//! Arbor Order Core - The order engine
//!
//! Converts a cart into an immutable order snapshot at checkout, and owns
//! the authorization rules around order status changes and deletion. The
//! checkout commit phase runs as one storage transaction; an order is never
//! observable without its items, and a cleared cart never coexists with a
//! missing order.

pub mod error;
pub mod service;

pub use error::OrderError;
pub use service::{Actor, OrderDetail, OrderLine, OrderService, PlacedOrder, StatusChange};
