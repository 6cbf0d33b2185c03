//! Checkout handlers
//!
//! GET returns the cart plus the caller's address book for selection; POST
//! places the order. Both refuse an empty cart up front.

use std::time::Instant;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use arbor_db::{AddressRepository, AddressRow};
use arbor_order_core::OrderError;
use arbor_types::AddressId;

use crate::error::ApiResult;
use crate::extractors::{session_headers, AuthUser, Session};
use crate::handlers::cart::CartItemResponse;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct AddressResponse {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    pub is_default: bool,
}

impl From<&AddressRow> for AddressResponse {
    fn from(address: &AddressRow) -> Self {
        Self {
            id: address.id.to_string(),
            first_name: address.first_name.clone(),
            last_name: address.last_name.clone(),
            street_address: address.street_address.clone(),
            city: address.city.clone(),
            state: address.state.clone(),
            zip_code: address.zip_code.clone(),
            country: address.country.clone(),
            is_default: address.is_default,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CheckoutPageResponse {
    pub items: Vec<CartItemResponse>,
    pub cart_item_count: i64,
    pub cart_total_price: Decimal,
    pub addresses: Vec<AddressResponse>,
}

#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub shipping_address: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub success: bool,
    pub message: String,
    pub order_id: String,
    pub total_price: Decimal,
    pub status: String,
    pub cart_item_count: i64,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/v1/checkout
pub async fn checkout_page(
    State(state): State<AppState>,
    session: Session,
    user: AuthUser,
) -> ApiResult<impl IntoResponse> {
    let view = state.carts.view(session.cart, Some(user.user_id)).await?;

    if view.lines.is_empty() {
        return Err(OrderError::EmptyCart.into());
    }

    let addresses = state.repos.addresses.list_by_user(user.user_id.0).await?;

    let headers = session_headers(&state, Some(user.user_id), view.context);

    Ok((
        headers,
        Json(CheckoutPageResponse {
            items: view.lines.iter().map(CartItemResponse::from).collect(),
            cart_item_count: view.item_count,
            cart_total_price: view.total,
            addresses: addresses.iter().map(AddressResponse::from).collect(),
        }),
    ))
}

/// POST /api/v1/checkout
pub async fn submit_checkout(
    State(state): State<AppState>,
    session: Session,
    user: AuthUser,
    Json(req): Json<CheckoutRequest>,
) -> ApiResult<impl IntoResponse> {
    let start = Instant::now();

    // An unparseable id cannot belong to the caller's address book.
    let shipping_address_id = match req.shipping_address.as_deref() {
        Some(raw) => Some(AddressId::parse(raw).map_err(|_| {
            crate::error::ApiError::BadRequest("Selected shipping address is invalid.".to_string())
        })?),
        None => None,
    };

    let resolved = state
        .carts
        .resolve_or_create(session.cart, Some(user.user_id))
        .await?;

    let placed = state
        .orders
        .checkout(&resolved.cart, user.user_id, shipping_address_id)
        .await?;

    metrics::counter!("storefront_orders_placed_total").increment(1);
    metrics::histogram!(
        "storefront_operation_duration_seconds",
        "operation" => "checkout",
        "result" => "ok"
    )
    .record(start.elapsed().as_secs_f64());

    let headers = session_headers(&state, Some(user.user_id), placed.context);

    Ok((
        headers,
        Json(CheckoutResponse {
            success: true,
            message: format!("Your order #{} has been placed successfully!", placed.order.id),
            order_id: placed.order.id.to_string(),
            total_price: placed.order.total_price,
            status: placed.order.status.clone(),
            cart_item_count: 0,
        }),
    ))
}
