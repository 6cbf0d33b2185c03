//! Cart handlers: view, add, update quantity, remove
//!
//! Mutation responses carry the fields the storefront UI patches in place:
//! success flag, message, item count, and exact decimal totals.

use std::time::Instant;

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use arbor_cart_core::CartLine;
use arbor_types::{CartItemId, ProductId};

use crate::error::{ApiError, ApiResult};
use crate::extractors::{session_headers, OptionalAuthUser, Session};
use crate::state::AppState;

/// Record cart operation duration with result label
#[inline]
fn record_op_duration(operation: &'static str, start: Instant, success: bool) {
    let result = if success { "ok" } else { "err" };
    metrics::histogram!(
        "storefront_operation_duration_seconds",
        "operation" => operation,
        "result" => result
    )
    .record(start.elapsed().as_secs_f64());
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub product_id: String,
    pub quantity: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct CartItemResponse {
    pub id: String,
    pub product_id: String,
    pub product_name: String,
    pub image_url: Option<String>,
    pub quantity: i32,
    /// Unit price snapshotted at add time
    pub price: Decimal,
    pub line_total: Decimal,
}

impl From<&CartLine> for CartItemResponse {
    fn from(line: &CartLine) -> Self {
        Self {
            id: line.item.id.to_string(),
            product_id: line.product.id.to_string(),
            product_name: line.product.name.clone(),
            image_url: line.product.image_url.clone(),
            quantity: line.item.quantity,
            price: line.item.price,
            line_total: line.item.line_total(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub cart_id: String,
    pub items: Vec<CartItemResponse>,
    pub cart_item_count: i64,
    pub cart_total_price: Decimal,
}

#[derive(Debug, Serialize)]
pub struct AddToCartResponse {
    pub success: bool,
    pub message: String,
    pub cart_item_count: i64,
}

#[derive(Debug, Serialize)]
pub struct UpdateCartItemResponse {
    pub success: bool,
    pub message: String,
    pub new_quantity: i64,
    pub item_total: Decimal,
    pub cart_item_count: i64,
    pub cart_total_price: Decimal,
}

#[derive(Debug, Serialize)]
pub struct RemoveFromCartResponse {
    pub success: bool,
    pub message: String,
    pub cart_item_count: i64,
    pub cart_total_price: Decimal,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/v1/cart
pub async fn view_cart(
    State(state): State<AppState>,
    session: Session,
    auth: OptionalAuthUser,
) -> ApiResult<impl IntoResponse> {
    let view = state.carts.view(session.cart, auth.user_id()).await?;

    let headers = session_headers(&state, auth.user_id(), view.context);

    Ok((
        headers,
        Json(CartResponse {
            cart_id: view.cart.id.to_string(),
            items: view.lines.iter().map(CartItemResponse::from).collect(),
            cart_item_count: view.item_count,
            cart_total_price: view.total,
        }),
    ))
}

/// POST /api/v1/cart/items
pub async fn add_to_cart(
    State(state): State<AppState>,
    session: Session,
    auth: OptionalAuthUser,
    Json(req): Json<AddToCartRequest>,
) -> ApiResult<impl IntoResponse> {
    let start = Instant::now();

    let product_id = ProductId::parse(&req.product_id)
        .map_err(|_| ApiError::BadRequest("Invalid product id.".to_string()))?;

    let added = state
        .carts
        .add_item(
            session.cart,
            auth.user_id(),
            product_id,
            req.quantity.unwrap_or(1),
        )
        .await
        .inspect_err(|_| record_op_duration("add_to_cart", start, false))?;

    metrics::counter!("storefront_cart_items_added_total").increment(1);
    record_op_duration("add_to_cart", start, true);

    let headers = session_headers(&state, auth.user_id(), added.context);

    Ok((
        headers,
        Json(AddToCartResponse {
            success: true,
            message: format!("{} added to cart!", added.product_name),
            cart_item_count: added.item_count,
        }),
    ))
}

/// PATCH /api/v1/cart/items/{id}
///
/// The body is parsed leniently: `quantity` may arrive as a JSON number or
/// a numeric string; anything else counts as missing and is rejected after
/// the ownership check.
pub async fn update_cart_item(
    State(state): State<AppState>,
    session: Session,
    auth: OptionalAuthUser,
    Path(item_id): Path<Uuid>,
    Json(body): Json<Value>,
) -> ApiResult<impl IntoResponse> {
    let quantity = parse_quantity(&body);

    let updated = state
        .carts
        .update_quantity(session.cart, auth.user_id(), CartItemId(item_id), quantity)
        .await?;

    let message = if updated.removed {
        format!("{} removed from cart.", updated.product_name)
    } else {
        format!("Quantity for {} updated.", updated.product_name)
    };

    let headers = session_headers(&state, auth.user_id(), updated.context);

    Ok((
        headers,
        Json(UpdateCartItemResponse {
            success: true,
            message,
            new_quantity: updated.new_quantity,
            item_total: updated.item_total,
            cart_item_count: updated.item_count,
            cart_total_price: updated.cart_total,
        }),
    ))
}

/// DELETE /api/v1/cart/items/{id}
pub async fn remove_from_cart(
    State(state): State<AppState>,
    session: Session,
    auth: OptionalAuthUser,
    Path(item_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let removed = state
        .carts
        .remove_item(session.cart, auth.user_id(), CartItemId(item_id))
        .await?;

    let headers = session_headers(&state, auth.user_id(), removed.context);

    Ok((
        headers,
        Json(RemoveFromCartResponse {
            success: true,
            message: "Item removed from cart.".to_string(),
            cart_item_count: removed.item_count,
            cart_total_price: removed.cart_total,
        }),
    ))
}

/// Coerce the request's quantity field to an integer if possible
fn parse_quantity(body: &Value) -> Option<i64> {
    match body.get("quantity") {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    }
}
