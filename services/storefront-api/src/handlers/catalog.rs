//! Catalog handlers: product listing with filters, product detail, banners
//!
//! These are plain reads, but like every page view they resolve the cart so
//! the item-count badge stays fresh and the cookie keeps rolling.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use arbor_db::{
    BannerRepository, ProductFilter, ProductRepository, ProductRow, ProductSort, SaleBannerRow,
};

use crate::error::{ApiError, ApiResult};
use crate::extractors::{session_headers, OptionalAuthUser, Session};
use crate::state::AppState;

/// Related products shown on a detail page
const RELATED_PRODUCT_LIMIT: i64 = 4;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CatalogQuery {
    pub category: Option<String>,
    pub material: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub requires_assembly: Option<String>,
    pub sort_by: Option<String>,
}

impl CatalogQuery {
    fn into_filter(self) -> ProductFilter {
        ProductFilter {
            category: self.category.filter(|c| !c.is_empty()),
            material: self.material.filter(|m| !m.is_empty()),
            // Unparseable price bounds are ignored, not rejected.
            min_price: self.min_price.and_then(|p| p.parse::<Decimal>().ok()),
            max_price: self.max_price.and_then(|p| p.parse::<Decimal>().ok()),
            requires_assembly: match self.requires_assembly.as_deref() {
                Some("true") => Some(true),
                Some("false") => Some(false),
                _ => None,
            },
            sort: self
                .sort_by
                .map(|s| ProductSort::from_param(&s))
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub discounted_price: Decimal,
    pub on_sale: bool,
    pub discount_percentage: Decimal,
    pub image_url: Option<String>,
    pub category: String,
    pub material: String,
    pub stock_quantity: i32,
    pub is_available: bool,
    pub requires_assembly: bool,
}

impl From<&ProductRow> for ProductResponse {
    fn from(product: &ProductRow) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
            discounted_price: product.discounted_price(),
            on_sale: product.on_sale,
            discount_percentage: product.discount_percentage,
            image_url: product.image_url.clone(),
            category: product.category.clone(),
            material: product.material.clone(),
            stock_quantity: product.stock_quantity,
            is_available: product.is_available,
            requires_assembly: product.requires_assembly,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProductListResponse {
    pub products: Vec<ProductResponse>,
    pub cart_item_count: i64,
}

#[derive(Debug, Serialize)]
pub struct ProductDetailResponse {
    pub product: ProductResponse,
    pub related_products: Vec<ProductResponse>,
    pub cart_item_count: i64,
}

#[derive(Debug, Serialize)]
pub struct BannerResponse {
    pub id: String,
    pub title: String,
    pub featured_product_id: Option<String>,
    pub custom_message: Option<String>,
    pub sale_end_date: Option<String>,
}

impl From<&SaleBannerRow> for BannerResponse {
    fn from(banner: &SaleBannerRow) -> Self {
        Self {
            id: banner.id.to_string(),
            title: banner.title.clone(),
            featured_product_id: banner.featured_product_id.map(|id| id.to_string()),
            custom_message: banner.custom_message.clone(),
            sale_end_date: banner.sale_end_date.map(|d| d.to_rfc3339()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BannerListResponse {
    pub banners: Vec<BannerResponse>,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/v1/products
pub async fn list_products(
    State(state): State<AppState>,
    session: Session,
    auth: OptionalAuthUser,
    Query(query): Query<CatalogQuery>,
) -> ApiResult<impl IntoResponse> {
    let resolved = state
        .carts
        .resolve_or_create(session.cart, auth.user_id())
        .await?;

    let products = state.repos.products.list(&query.into_filter()).await?;

    let headers = session_headers(&state, auth.user_id(), resolved.context);

    Ok((
        headers,
        Json(ProductListResponse {
            products: products.iter().map(ProductResponse::from).collect(),
            cart_item_count: resolved.item_count,
        }),
    ))
}

/// GET /api/v1/products/{id}
pub async fn product_detail(
    State(state): State<AppState>,
    session: Session,
    auth: OptionalAuthUser,
    Path(product_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let product = state
        .repos
        .products
        .find_by_id(product_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("product not found".to_string()))?;

    let related = state
        .repos
        .products
        .related(&product.category, product.id, RELATED_PRODUCT_LIMIT)
        .await?;

    let resolved = state
        .carts
        .resolve_or_create(session.cart, auth.user_id())
        .await?;

    let headers = session_headers(&state, auth.user_id(), resolved.context);

    Ok((
        headers,
        Json(ProductDetailResponse {
            product: ProductResponse::from(&product),
            related_products: related.iter().map(ProductResponse::from).collect(),
            cart_item_count: resolved.item_count,
        }),
    ))
}

/// GET /api/v1/banners
pub async fn list_banners(State(state): State<AppState>) -> ApiResult<Json<BannerListResponse>> {
    let banners = state.repos.banners.list_active().await?;

    Ok(Json(BannerListResponse {
        banners: banners.iter().map(BannerResponse::from).collect(),
    }))
}
