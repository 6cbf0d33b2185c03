//! Order handlers: history, detail, staff dashboard, status updates, deletion

use axum::extract::{Path, State};
use axum::Json;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use arbor_db::OrderRow;
use arbor_order_core::OrderDetail;
use arbor_types::{OrderId, OrderStatus};

use crate::error::{ApiError, ApiResult};
use crate::extractors::AuthUser;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct OrderSummary {
    pub id: String,
    pub order_date: String,
    pub total_price: Decimal,
    pub payment_method: String,
    pub status: String,
    pub status_display: String,
}

impl From<&OrderRow> for OrderSummary {
    fn from(order: &OrderRow) -> Self {
        let status_display = order
            .status
            .parse::<OrderStatus>()
            .map(|s| s.label().to_string())
            .unwrap_or_else(|_| order.status.clone());

        Self {
            id: order.id.to_string(),
            order_date: order.order_date.to_rfc3339(),
            total_price: order.total_price,
            payment_method: order.payment_method.clone(),
            status: order.status.clone(),
            status_display,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OrderItemResponse {
    pub product_id: String,
    pub product_name: String,
    pub quantity: i32,
    /// Unit price snapshotted at order time
    pub price: Decimal,
    pub line_total: Decimal,
}

#[derive(Debug, Serialize)]
pub struct OrderDetailResponse {
    #[serde(flatten)]
    pub order: OrderSummary,
    pub shipping_address_id: Option<String>,
    pub items: Vec<OrderItemResponse>,
}

impl From<&OrderDetail> for OrderDetailResponse {
    fn from(detail: &OrderDetail) -> Self {
        Self {
            order: OrderSummary::from(&detail.order),
            shipping_address_id: detail.order.shipping_address_id.map(|id| id.to_string()),
            items: detail
                .lines
                .iter()
                .map(|line| OrderItemResponse {
                    product_id: line.product.id.to_string(),
                    product_name: line.product.name.clone(),
                    quantity: line.item.quantity,
                    price: line.item.price,
                    line_total: line.item.line_total(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OrderListResponse {
    pub orders: Vec<OrderSummary>,
}

#[derive(Debug, Serialize)]
pub struct StatusChoice {
    pub value: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Serialize)]
pub struct AdminOrderListResponse {
    pub orders: Vec<OrderSummary>,
    pub status_choices: Vec<StatusChoice>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UpdateStatusResponse {
    pub success: bool,
    pub message: String,
    pub new_status_value: String,
    pub new_status_display: String,
}

#[derive(Debug, Serialize)]
pub struct DeleteOrderResponse {
    pub success: bool,
    pub message: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/v1/orders
pub async fn list_my_orders(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<OrderListResponse>> {
    let orders = state.orders.list_for_user(user.user_id).await?;

    Ok(Json(OrderListResponse {
        orders: orders.iter().map(OrderSummary::from).collect(),
    }))
}

/// GET /api/v1/orders/{id}
pub async fn order_detail(
    State(state): State<AppState>,
    user: AuthUser,
    Path(order_id): Path<Uuid>,
) -> ApiResult<Json<OrderDetailResponse>> {
    let detail = state.orders.get(user.actor(), OrderId(order_id)).await?;

    Ok(Json(OrderDetailResponse::from(&detail)))
}

/// GET /api/v1/admin/orders
///
/// Staff dashboard: every order, newest first, plus the status choices the
/// dashboard's dropdowns render.
pub async fn admin_orders(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<AdminOrderListResponse>> {
    let orders = state.orders.list_all(user.actor()).await?;

    Ok(Json(AdminOrderListResponse {
        orders: orders.iter().map(OrderSummary::from).collect(),
        status_choices: OrderStatus::ALL
            .iter()
            .map(|s| StatusChoice {
                value: s.as_str(),
                label: s.label(),
            })
            .collect(),
    }))
}

/// POST /api/v1/orders/{id}/status
#[instrument(skip(state, user, req), fields(order_id = %order_id))]
pub async fn update_order_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(order_id): Path<Uuid>,
    Json(req): Json<UpdateStatusRequest>,
) -> ApiResult<Json<UpdateStatusResponse>> {
    let requested = req
        .status
        .ok_or_else(|| ApiError::BadRequest("Invalid status provided.".to_string()))?;

    let change = state
        .orders
        .update_status(user.actor(), OrderId(order_id), &requested)
        .await?;

    Ok(Json(UpdateStatusResponse {
        success: true,
        message: format!(
            "Order #{} status updated to {}.",
            order_id,
            change.status.label()
        ),
        new_status_value: change.status.as_str().to_string(),
        new_status_display: change.status.label().to_string(),
    }))
}

/// DELETE /api/v1/orders/{id}
pub async fn delete_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(order_id): Path<Uuid>,
) -> ApiResult<Json<DeleteOrderResponse>> {
    state.orders.delete(user.actor(), OrderId(order_id)).await?;

    Ok(Json(DeleteOrderResponse {
        success: true,
        message: format!("Order #{order_id} has been removed from your list."),
    }))
}
