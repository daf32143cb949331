//! Repository for the `part_categories` table.
//!
//! Categories are a tree. Deleting a category soft-deletes every live
//! descendant before the category itself, following
//! [`PART_CATEGORY_DELETION`].

use itam_core::lifecycle::{DeletionStep, PART_CATEGORY_DELETION};
use itam_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::part_category::{CreatePartCategory, PartCategory};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, name, description, parent_id, depreciation_rule_id, deleted_at, created_at, updated_at";

/// Provides CRUD and tree operations for part categories.
pub struct PartCategoryRepo;

impl PartCategoryRepo {
    /// Insert a new category, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreatePartCategory,
    ) -> Result<PartCategory, sqlx::Error> {
        let query = format!(
            "INSERT INTO part_categories (name, description, parent_id, depreciation_rule_id)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PartCategory>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.parent_id)
            .bind(input.depreciation_rule_id)
            .fetch_one(pool)
            .await
    }

    /// Find a category by ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<PartCategory>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM part_categories WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, PartCategory>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all live categories, roots first, then by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<PartCategory>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM part_categories WHERE deleted_at IS NULL \
             ORDER BY parent_id NULLS FIRST, name"
        );
        sqlx::query_as::<_, PartCategory>(&query)
            .fetch_all(pool)
            .await
    }

    /// Direct live children of a category.
    pub async fn children(
        pool: &PgPool,
        parent_id: DbId,
    ) -> Result<Vec<PartCategory>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM part_categories \
             WHERE parent_id = $1 AND deleted_at IS NULL ORDER BY name"
        );
        sqlx::query_as::<_, PartCategory>(&query)
            .bind(parent_id)
            .fetch_all(pool)
            .await
    }

    /// Delete a category and its subtree.
    ///
    /// Returns `true` if the category itself was marked deleted; `false`
    /// if it did not exist or was already deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let mut deleted = false;

        for step in PART_CATEGORY_DELETION.steps() {
            tracing::debug!(category_id = id, step = %step, "Running deletion step");
            match step {
                // Categories carry no entity-specific cleanup.
                DeletionStep::EntityHook => {}
                DeletionStep::HierarchyHook => {
                    let removed = Self::soft_delete_descendants(&mut tx, id).await?;
                    tracing::debug!(category_id = id, removed, "Category descendants soft-deleted");
                }
                DeletionStep::SoftDelete => {
                    deleted = Self::soft_delete_row(&mut tx, id).await?;
                }
            }
        }

        tx.commit().await?;
        if deleted {
            tracing::info!(category_id = id, "Category soft-deleted");
        }
        Ok(deleted)
    }

    /// Soft-delete every live descendant of `id`. Returns the number of rows marked.
    async fn soft_delete_descendants(conn: &mut PgConnection, id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "WITH RECURSIVE descendants AS ( \
                SELECT id FROM part_categories WHERE parent_id = $1 AND deleted_at IS NULL \
                UNION \
                SELECT c.id FROM part_categories c \
                JOIN descendants d ON c.parent_id = d.id \
                WHERE c.deleted_at IS NULL \
             ) \
             UPDATE part_categories SET deleted_at = NOW() \
             WHERE id IN (SELECT id FROM descendants)",
        )
        .bind(id)
        .execute(conn)
        .await?;
        Ok(result.rows_affected())
    }

    async fn soft_delete_row(conn: &mut PgConnection, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE part_categories SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(conn)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
