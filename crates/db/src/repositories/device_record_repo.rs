//! Repository for the `device_records` table.

use itam_core::types::DbId;
use sqlx::PgPool;

use crate::models::device_record::{CreateDeviceRecord, DeviceRecord};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, asset_number, deleted_at, created_at, updated_at";

/// Provides CRUD operations for devices.
pub struct DeviceRecordRepo;

impl DeviceRecordRepo {
    /// Insert a new device, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateDeviceRecord,
    ) -> Result<DeviceRecord, sqlx::Error> {
        let query = format!(
            "INSERT INTO device_records (name, description, asset_number)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DeviceRecord>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.asset_number)
            .fetch_one(pool)
            .await
    }

    /// Find a device by ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<DeviceRecord>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM device_records WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, DeviceRecord>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all devices ordered by most recently created first. Excludes soft-deleted rows.
    pub async fn list(pool: &PgPool) -> Result<Vec<DeviceRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM device_records WHERE deleted_at IS NULL ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, DeviceRecord>(&query).fetch_all(pool).await
    }

    /// Soft-delete a device by ID. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE device_records SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
