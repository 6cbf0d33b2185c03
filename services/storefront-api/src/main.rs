//! Arbor Storefront API
//!
//! Furniture storefront backend: catalog browsing, persistent carts with
//! merge-on-login, checkout into orders, address book, staff order
//! dashboard.
//!
//! ## REST Endpoints
//!
//! - `POST /api/v1/auth/signup|login|logout`, `GET /api/v1/auth/me`
//! - `PATCH /api/v1/profile`
//! - `GET /api/v1/products` (filters + sort), `GET /api/v1/products/:id`
//! - `GET /api/v1/banners`
//! - `GET /api/v1/cart`, `POST /api/v1/cart/items`,
//!   `PATCH|DELETE /api/v1/cart/items/:id`
//! - `GET|POST /api/v1/checkout`
//! - `GET /api/v1/orders`, `GET|DELETE /api/v1/orders/:id`,
//!   `POST /api/v1/orders/:id/status`
//! - `GET /api/v1/admin/orders` (staff)
//! - `GET /api/v1/addresses`, `POST /api/v1/addresses`,
//!   `PUT|DELETE /api/v1/addresses/:id`, `POST /api/v1/addresses/:id/default`
//!
//! ## Health Endpoints
//!
//! - `GET /health` - Liveness probe
//! - `GET /ready` - Readiness probe
//! - `GET /metrics` - Prometheus metrics

mod config;
mod error;
mod extractors;
mod handlers;
mod state;

use std::net::SocketAddr;

use axum::routing::{get, patch, post, put};
use axum::Router;
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive("storefront_api=debug".parse()?))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Arbor Storefront API");

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!(http_port = config.http_port, "Configuration loaded");

    // Initialize metrics
    let metrics_handle = if config.metrics_enabled {
        Some(setup_metrics()?)
    } else {
        None
    };

    // Create database pool and run migrations
    let pool = arbor_db::create_pool(&config.database_url).await?;
    sqlx::migrate!().run(&pool).await?;
    tracing::info!("Database pool created, migrations applied");

    // Create application state
    let state = AppState::new(pool, config.clone());

    // Build HTTP router
    let app = build_router(state, metrics_handle);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));
    run_http_server(app, addr).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

fn build_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    let request_timeout = state.request_timeout();

    let api_v1 = Router::new()
        // Auth + profile
        .route("/auth/signup", post(handlers::signup))
        .route("/auth/login", post(handlers::login))
        .route("/auth/logout", post(handlers::logout))
        .route("/auth/me", get(handlers::me))
        .route("/profile", patch(handlers::update_profile))
        // Catalog
        .route("/products", get(handlers::list_products))
        .route("/products/{id}", get(handlers::product_detail))
        .route("/banners", get(handlers::list_banners))
        // Cart
        .route("/cart", get(handlers::view_cart))
        .route("/cart/items", post(handlers::add_to_cart))
        .route(
            "/cart/items/{id}",
            patch(handlers::update_cart_item).delete(handlers::remove_from_cart),
        )
        // Checkout
        .route(
            "/checkout",
            get(handlers::checkout_page).post(handlers::submit_checkout),
        )
        // Orders
        .route("/orders", get(handlers::list_my_orders))
        .route(
            "/orders/{id}",
            get(handlers::order_detail).delete(handlers::delete_order),
        )
        .route("/orders/{id}/status", post(handlers::update_order_status))
        .route("/admin/orders", get(handlers::admin_orders))
        // Address book
        .route(
            "/addresses",
            get(handlers::list_addresses).post(handlers::create_address),
        )
        .route(
            "/addresses/{id}",
            put(handlers::update_address).delete(handlers::delete_address),
        )
        .route(
            "/addresses/{id}/default",
            post(handlers::set_default_address),
        );

    // Health routes (no timeout - must always respond quickly)
    let health_routes = Router::new()
        .route("/health", get(handlers::health))
        .route("/ready", get(handlers::ready));

    // Metrics route (no timeout)
    let metrics_route = if let Some(handle) = metrics_handle {
        Router::new().route("/metrics", get(move || async move { handle.render() }))
    } else {
        Router::new()
    };

    // Build middleware stack (order matters - outermost first)
    let middleware = ServiceBuilder::new()
        // Request ID propagation (outermost)
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        // Tracing with request details
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // CORS
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        // Request timeout (innermost - closest to handler)
        .layer(TimeoutLayer::new(request_timeout));

    Router::new()
        .nest("/api/v1", api_v1)
        .layer(middleware)
        .merge(health_routes) // Health routes without timeout
        .merge(metrics_route) // Metrics route without timeout
        .with_state(state)
}

async fn run_http_server(app: Router, addr: SocketAddr) -> anyhow::Result<()> {
    tracing::info!("HTTP server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn setup_metrics() -> anyhow::Result<PrometheusHandle> {
    // Cart and checkout operations are single-transaction database work;
    // the upper buckets exist to surface contention.
    let latency_buckets = &[0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.2, 0.5, 1.0, 2.5];

    let builder = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            latency_buckets,
        )?
        .set_buckets_for_metric(
            Matcher::Full("storefront_operation_duration_seconds".to_string()),
            latency_buckets,
        )?;

    let handle = builder.install_recorder()?;

    metrics::describe_counter!(
        "storefront_cart_items_added_total",
        "Total items added to carts"
    );
    metrics::describe_counter!("storefront_orders_placed_total", "Total orders placed");
    metrics::describe_histogram!(
        "http_request_duration_seconds",
        "HTTP request latency in seconds"
    );
    metrics::describe_histogram!(
        "storefront_operation_duration_seconds",
        "Cart/checkout operation latency in seconds by operation type"
    );

    Ok(handle)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
