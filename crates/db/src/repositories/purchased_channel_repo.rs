//! Repository for the `purchased_channels` table.

use itam_core::types::DbId;
use sqlx::PgPool;

use crate::models::purchased_channel::{CreatePurchasedChannel, PurchasedChannel};

const COLUMNS: &str = "id, name, description, deleted_at, created_at, updated_at";

/// Provides CRUD operations for purchase channels.
pub struct PurchasedChannelRepo;

impl PurchasedChannelRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreatePurchasedChannel,
    ) -> Result<PurchasedChannel, sqlx::Error> {
        let query = format!(
            "INSERT INTO purchased_channels (name, description)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PurchasedChannel>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    /// Find a channel by ID. Excludes soft-deleted rows.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<PurchasedChannel>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM purchased_channels WHERE id = $1 AND deleted_at IS NULL"
        );
        sqlx::query_as::<_, PurchasedChannel>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<PurchasedChannel>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM purchased_channels WHERE deleted_at IS NULL ORDER BY name"
        );
        sqlx::query_as::<_, PurchasedChannel>(&query)
            .fetch_all(pool)
            .await
    }

    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE purchased_channels SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
