//! PostgreSQL repository implementations

mod address;
mod banner;
mod cart;
mod order;
mod product;
mod user;

pub use address::PgAddressRepository;
pub use banner::PgBannerRepository;
pub use cart::PgCartRepository;
pub use order::PgOrderRepository;
pub use product::PgProductRepository;
pub use user::PgUserRepository;

use crate::DbPool;

/// All repositories bundled together
#[derive(Clone)]
pub struct Repositories {
    pub users: PgUserRepository,
    pub products: PgProductRepository,
    pub carts: PgCartRepository,
    pub addresses: PgAddressRepository,
    pub orders: PgOrderRepository,
    pub banners: PgBannerRepository,
}

impl Repositories {
    /// Create all repositories from a database pool
    pub fn new(pool: DbPool) -> Self {
        Self {
            users: PgUserRepository::new(pool.clone()),
            products: PgProductRepository::new(pool.clone()),
            carts: PgCartRepository::new(pool.clone()),
            addresses: PgAddressRepository::new(pool.clone()),
            orders: PgOrderRepository::new(pool.clone()),
            banners: PgBannerRepository::new(pool),
        }
    }
}
