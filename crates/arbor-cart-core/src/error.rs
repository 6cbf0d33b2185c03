//! Cart engine errors

use thiserror::Error;

/// Cart engine errors
#[derive(Error, Debug)]
pub enum CartError {
    /// Caller must be logged in for this cart operation
    #[error("Please log in or create an account to add items to your cart.")]
    LoginRequired,

    /// A referenced record does not exist
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Rejected input
    #[error("{0}")]
    Validation(String),

    /// Cart item belongs to another shopper's cart
    #[error("Unauthorized action.")]
    Unauthorized,

    /// Database error
    #[error("database error")]
    Db(#[from] arbor_db::DbError),
}
