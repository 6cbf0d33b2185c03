//! PostgreSQL sale banner repository implementation

use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::DbResult;
use crate::models::SaleBannerRow;
use crate::repo::BannerRepository;

/// PostgreSQL sale banner repository
#[derive(Clone)]
pub struct PgBannerRepository {
    pool: PgPool,
}

impl PgBannerRepository {
    /// Create a new banner repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BannerRepository for PgBannerRepository {
    async fn list_active(&self) -> DbResult<Vec<SaleBannerRow>> {
        let banners = sqlx::query_as::<_, SaleBannerRow>(
            r#"
            SELECT id, title, featured_product_id, custom_message, sale_end_date,
                   is_active, created_at, updated_at
            FROM sale_banners
            WHERE is_active = TRUE AND sale_end_date >= NOW()
            ORDER BY updated_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(banners)
    }
}
