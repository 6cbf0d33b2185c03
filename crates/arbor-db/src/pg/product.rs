//! PostgreSQL product repository implementation

use async_trait::async_trait;
use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

use crate::error::DbResult;
use crate::models::ProductRow;
use crate::repo::{ProductFilter, ProductRepository, ProductSort};

const PRODUCT_COLUMNS: &str = "id, name, description, price, image_url, category, material, \
     stock_quantity, is_available, requires_assembly, on_sale, discount_percentage, \
     created_at, updated_at";

/// PostgreSQL product repository
#[derive(Clone)]
pub struct PgProductRepository {
    pool: PgPool,
}

impl PgProductRepository {
    /// Create a new product repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<ProductRow>> {
        let product = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    async fn find_many(&self, ids: &[Uuid]) -> DbResult<Vec<ProductRow>> {
        let products = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ANY($1)"
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    async fn list(&self, filter: &ProductFilter) -> DbResult<Vec<ProductRow>> {
        let mut query = QueryBuilder::<sqlx::Postgres>::new(format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE is_available = TRUE"
        ));

        if let Some(category) = &filter.category {
            query.push(" AND category = ").push_bind(category.clone());
        }
        if let Some(material) = &filter.material {
            query.push(" AND material = ").push_bind(material.clone());
        }
        if let Some(min_price) = filter.min_price {
            query.push(" AND price >= ").push_bind(min_price);
        }
        if let Some(max_price) = filter.max_price {
            query.push(" AND price <= ").push_bind(max_price);
        }
        if let Some(requires_assembly) = filter.requires_assembly {
            query
                .push(" AND requires_assembly = ")
                .push_bind(requires_assembly);
        }

        query.push(match filter.sort {
            ProductSort::Newest => " ORDER BY created_at DESC",
            ProductSort::PriceAsc => " ORDER BY price ASC",
            ProductSort::PriceDesc => " ORDER BY price DESC",
            ProductSort::NameAsc => " ORDER BY name ASC",
        });

        let products = query
            .build_query_as::<ProductRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    async fn related(&self, category: &str, exclude: Uuid, limit: i64) -> DbResult<Vec<ProductRow>> {
        let products = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE category = $1 AND is_available = TRUE AND id <> $2 \
             ORDER BY random() LIMIT $3"
        ))
        .bind(category)
        .bind(exclude)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }
}
