//! Repository for the `depreciation_rules` table.

use itam_core::types::DbId;
use sqlx::PgPool;

use crate::models::depreciation_rule::{CreateDepreciationRule, DepreciationRule};

const COLUMNS: &str = "id, name, description, deleted_at, created_at, updated_at";

/// Provides CRUD operations for depreciation rules.
pub struct DepreciationRuleRepo;

impl DepreciationRuleRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateDepreciationRule,
    ) -> Result<DepreciationRule, sqlx::Error> {
        let query = format!(
            "INSERT INTO depreciation_rules (name, description)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DepreciationRule>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    /// Find a rule by ID. Excludes soft-deleted rows.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<DepreciationRule>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM depreciation_rules WHERE id = $1 AND deleted_at IS NULL"
        );
        sqlx::query_as::<_, DepreciationRule>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<DepreciationRule>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM depreciation_rules WHERE deleted_at IS NULL ORDER BY name"
        );
        sqlx::query_as::<_, DepreciationRule>(&query)
            .fetch_all(pool)
            .await
    }

    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE depreciation_rules SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
