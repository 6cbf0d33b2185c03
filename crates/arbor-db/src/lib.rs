//! Arbor DB - Database abstractions
//!
//! SQLx-based database layer for the Arbor storefront.
//!
//! # Example
//!
//! ```rust,ignore
//! use arbor_db::{create_pool, Repositories};
//!
//! let pool = create_pool("postgres://localhost/arbor").await?;
//! let repos = Repositories::new(pool);
//!
//! let product = repos.products.find_by_id(product_id).await?;
//! ```

pub mod error;
pub mod models;
pub mod pg;
pub mod pool;
pub mod repo;

pub use error::{DbError, DbResult};
pub use models::*;
pub use pg::Repositories;
pub use pool::{create_pool, DbPool};
pub use repo::*;
