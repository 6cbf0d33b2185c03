//! Application state for the storefront API service.

use std::sync::Arc;

use arbor_auth_core::{AuthService, SessionCodec};
use arbor_cart_core::CartService;
use arbor_db::pg::{
    PgAddressRepository, PgCartRepository, PgOrderRepository, PgProductRepository,
    PgUserRepository, Repositories,
};
use arbor_db::DbPool;
use arbor_order_core::OrderService;

use crate::config::Config;

/// Cart engine over the PostgreSQL repositories
pub type CartEngine = CartService<PgCartRepository, PgProductRepository>;

/// Order engine over the PostgreSQL repositories
pub type OrderEngine =
    OrderService<PgCartRepository, PgAddressRepository, PgOrderRepository, PgProductRepository>;

/// Account service over the PostgreSQL user repository
pub type Accounts = AuthService<PgUserRepository>;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Cart engine (resolution, merge-on-login, item mutation, totals)
    pub carts: CartEngine,
    /// Order engine (checkout, status transitions, deletion)
    pub orders: OrderEngine,
    /// Account service (signup, login, profile)
    pub accounts: Accounts,
    /// Session cookie codec
    pub sessions: SessionCodec,
    /// Database repositories (for direct access if needed)
    pub repos: Repositories,
    /// Configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Create new application state
    pub fn new(pool: DbPool, config: Config) -> Self {
        let repos = Repositories::new(pool);

        let carts = Arc::new(repos.carts.clone());
        let products = Arc::new(repos.products.clone());
        let addresses = Arc::new(repos.addresses.clone());
        let orders = Arc::new(repos.orders.clone());
        let users = Arc::new(repos.users.clone());

        let sessions = SessionCodec::new(
            config.session_secret.as_bytes(),
            config.session_duration_hours,
        );

        Self {
            carts: CartService::new(carts.clone(), products.clone()),
            orders: OrderService::new(carts, addresses, orders, products),
            accounts: AuthService::new(users),
            sessions,
            repos,
            config: Arc::new(config),
        }
    }

    /// Get request timeout from config
    pub fn request_timeout(&self) -> std::time::Duration {
        self.config.request_timeout
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
