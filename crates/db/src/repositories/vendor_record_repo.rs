//! Repository for the `vendor_records` table.

use itam_core::types::DbId;
use sqlx::PgPool;

use crate::models::vendor_record::{CreateVendorRecord, VendorRecord};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, location, deleted_at, created_at, updated_at";

/// Provides CRUD operations for vendors.
pub struct VendorRecordRepo;

impl VendorRecordRepo {
    /// Insert a new vendor, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateVendorRecord,
    ) -> Result<VendorRecord, sqlx::Error> {
        let query = format!(
            "INSERT INTO vendor_records (name, description, location)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, VendorRecord>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.location)
            .fetch_one(pool)
            .await
    }

    /// Find a vendor by ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<VendorRecord>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM vendor_records WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, VendorRecord>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all vendors by name. Excludes soft-deleted rows.
    pub async fn list(pool: &PgPool) -> Result<Vec<VendorRecord>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM vendor_records WHERE deleted_at IS NULL ORDER BY name");
        sqlx::query_as::<_, VendorRecord>(&query).fetch_all(pool).await
    }

    /// Soft-delete a vendor by ID. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE vendor_records SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
