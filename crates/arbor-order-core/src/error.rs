//! Order engine errors

use thiserror::Error;

/// Order engine errors
#[derive(Error, Debug)]
pub enum OrderError {
    /// Order does not exist
    #[error("order not found")]
    NotFound,

    /// Checkout attempted on an empty cart
    #[error("Your cart is empty. Please add items before checking out.")]
    EmptyCart,

    /// Rejected input (missing or invalid address selection)
    #[error("{0}")]
    Validation(String),

    /// Caller may not act on this order
    #[error("You do not have permission to perform this action.")]
    Unauthorized,

    /// Order state forbids the operation
    #[error("{0}")]
    Precondition(String),

    /// Unrecognized status value
    #[error("invalid status: {0}")]
    InvalidStatus(String),

    /// Database error
    #[error("database error")]
    Db(#[from] arbor_db::DbError),
}
