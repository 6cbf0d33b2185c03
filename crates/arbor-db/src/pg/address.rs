//! PostgreSQL address repository implementation

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::models::AddressRow;
use crate::repo::{AddressFields, AddressRepository, CreateAddress};

const ADDRESS_COLUMNS: &str = "id, user_id, first_name, last_name, street_address, city, \
     state, zip_code, country, is_default";

/// PostgreSQL address repository
#[derive(Clone)]
pub struct PgAddressRepository {
    pool: PgPool,
}

impl PgAddressRepository {
    /// Create a new address repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AddressRepository for PgAddressRepository {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<AddressRow>> {
        let address = sqlx::query_as::<_, AddressRow>(&format!(
            "SELECT {ADDRESS_COLUMNS} FROM addresses WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(address)
    }

    async fn find_for_user(&self, id: Uuid, user_id: Uuid) -> DbResult<Option<AddressRow>> {
        let address = sqlx::query_as::<_, AddressRow>(&format!(
            "SELECT {ADDRESS_COLUMNS} FROM addresses WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(address)
    }

    async fn list_by_user(&self, user_id: Uuid) -> DbResult<Vec<AddressRow>> {
        let addresses = sqlx::query_as::<_, AddressRow>(&format!(
            "SELECT {ADDRESS_COLUMNS} FROM addresses WHERE user_id = $1 ORDER BY is_default DESC, id"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(addresses)
    }

    async fn create(&self, address: CreateAddress) -> DbResult<AddressRow> {
        let row = sqlx::query_as::<_, AddressRow>(&format!(
            r#"
            INSERT INTO addresses (id, user_id, first_name, last_name, street_address,
                                   city, state, zip_code, country, is_default)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {ADDRESS_COLUMNS}
            "#
        ))
        .bind(address.id)
        .bind(address.user_id)
        .bind(&address.fields.first_name)
        .bind(&address.fields.last_name)
        .bind(&address.fields.street_address)
        .bind(&address.fields.city)
        .bind(&address.fields.state)
        .bind(&address.fields.zip_code)
        .bind(&address.fields.country)
        .bind(address.fields.is_default)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn update(&self, id: Uuid, user_id: Uuid, fields: AddressFields) -> DbResult<AddressRow> {
        let row = sqlx::query_as::<_, AddressRow>(&format!(
            r#"
            UPDATE addresses
            SET first_name = $3, last_name = $4, street_address = $5, city = $6,
                state = $7, zip_code = $8, country = $9, is_default = $10
            WHERE id = $1 AND user_id = $2
            RETURNING {ADDRESS_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(user_id)
        .bind(&fields.first_name)
        .bind(&fields.last_name)
        .bind(&fields.street_address)
        .bind(&fields.city)
        .bind(&fields.state)
        .bind(&fields.zip_code)
        .bind(&fields.country)
        .bind(fields.is_default)
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or(DbError::NotFound)
    }

    async fn delete(&self, id: Uuid) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM addresses WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }
        Ok(())
    }

    async fn set_default(&self, user_id: Uuid, id: Uuid) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE addresses SET is_default = FALSE WHERE user_id = $1 AND is_default")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        let result =
            sqlx::query("UPDATE addresses SET is_default = TRUE WHERE id = $1 AND user_id = $2")
                .bind(id)
                .bind(user_id)
                .execute(&mut *tx)
                .await?;

        if result.rows_affected() == 0 {
            // Rolls back the unset above when the address is not the
            // caller's.
            return Err(DbError::NotFound);
        }

        tx.commit().await?;
        Ok(())
    }
}
