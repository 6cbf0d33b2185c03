//! Request-scoped cart context
//!
//! The browser session holds exactly two cart facts: the active cart id and
//! a cached item count for cheap redisplay. The HTTP layer decodes them from
//! the session cookie into a `CartContext`, passes it into the cart engine,
//! and persists whatever context comes back. The engine never touches
//! ambient session state.

use serde::{Deserialize, Serialize};

use crate::CartId;

/// Session-held cart slot: active cart id plus cached item count
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartContext {
    /// Cart referenced by the session, if any
    pub cart_id: Option<CartId>,
    /// Cached total item quantity (sum over cart items)
    pub item_count: i64,
}

impl CartContext {
    /// Context with no cart attached yet
    pub const fn empty() -> Self {
        Self {
            cart_id: None,
            item_count: 0,
        }
    }

    /// Context pointing at a resolved cart
    pub fn with_cart(cart_id: CartId, item_count: i64) -> Self {
        Self {
            cart_id: Some(cart_id),
            item_count,
        }
    }
}
