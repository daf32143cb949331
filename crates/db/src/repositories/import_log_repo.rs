//! Repository for import logs and their detail rows.

use itam_core::error::CoreError;
use itam_core::import_log::ImportOutcome;
use itam_core::types::DbId;
use sqlx::PgPool;

use crate::error::{is_foreign_key_violation, RepoError};
use crate::models::import_log::{
    CreateImportLog, CreateImportLogDetail, ImportLog, ImportLogDetail, ImportOutcomeCounts,
};

/// Column list for `import_logs` queries.
const LOG_COLUMNS: &str = "id, item, operator, created_at, updated_at";

/// Column list for `import_log_details` queries.
const DETAIL_COLUMNS: &str = "id, log_id, status, log, created_at, updated_at";

/// Foreign key tying a detail row to its log.
const DETAIL_LOG_FK: &str = "fk_import_log_details_log_id";

/// Provides CRUD operations for import logs and their details.
pub struct ImportLogRepo;

impl ImportLogRepo {
    /// Open a new import batch, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateImportLog) -> Result<ImportLog, sqlx::Error> {
        let sql = format!(
            "INSERT INTO import_logs (item, operator) \
             VALUES ($1, $2) \
             RETURNING {LOG_COLUMNS}"
        );
        sqlx::query_as::<_, ImportLog>(&sql)
            .bind(&input.item)
            .bind(input.operator)
            .fetch_one(pool)
            .await
    }

    /// Find a log by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ImportLog>, sqlx::Error> {
        let sql = format!("SELECT {LOG_COLUMNS} FROM import_logs WHERE id = $1");
        sqlx::query_as::<_, ImportLog>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List logs, optionally filtered by `item`, newest first.
    pub async fn list(pool: &PgPool, item: Option<&str>) -> Result<Vec<ImportLog>, sqlx::Error> {
        let sql = format!(
            "SELECT {LOG_COLUMNS} FROM import_logs \
             WHERE ($1::TEXT IS NULL OR item = $1) \
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, ImportLog>(&sql)
            .bind(item)
            .fetch_all(pool)
            .await
    }

    // ── Details ──────────────────────────────────────────────────────

    /// Record one row's outcome against an existing log.
    ///
    /// A `log_id` with no matching log yields
    /// [`CoreError::ReferentialMismatch`].
    pub async fn add_detail(
        pool: &PgPool,
        input: &CreateImportLogDetail,
    ) -> Result<ImportLogDetail, RepoError> {
        let sql = format!(
            "INSERT INTO import_log_details (log_id, status, log) \
             VALUES ($1, $2, $3) \
             RETURNING {DETAIL_COLUMNS}"
        );
        let result = sqlx::query_as::<_, ImportLogDetail>(&sql)
            .bind(input.log_id)
            .bind(input.status.as_str())
            .bind(&input.log)
            .fetch_one(pool)
            .await;

        match result {
            Ok(detail) => Ok(detail),
            Err(err) if is_foreign_key_violation(&err, DETAIL_LOG_FK) => {
                tracing::warn!(log_id = input.log_id, "Import detail references missing log");
                Err(CoreError::ReferentialMismatch(format!(
                    "import log {} does not exist",
                    input.log_id
                ))
                .into())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// All details of a log in insertion order.
    pub async fn details(pool: &PgPool, log_id: DbId) -> Result<Vec<ImportLogDetail>, sqlx::Error> {
        let sql = format!(
            "SELECT {DETAIL_COLUMNS} FROM import_log_details \
             WHERE log_id = $1 ORDER BY id ASC"
        );
        sqlx::query_as::<_, ImportLogDetail>(&sql)
            .bind(log_id)
            .fetch_all(pool)
            .await
    }

    /// Count succeeded and failed details for a log.
    pub async fn outcome_counts(
        pool: &PgPool,
        log_id: DbId,
    ) -> Result<ImportOutcomeCounts, sqlx::Error> {
        let row: (i64, i64) = sqlx::query_as(
            "SELECT \
                COUNT(*) FILTER (WHERE status = $2), \
                COUNT(*) FILTER (WHERE status = $3) \
             FROM import_log_details WHERE log_id = $1",
        )
        .bind(log_id)
        .bind(ImportOutcome::Succeeded.as_str())
        .bind(ImportOutcome::Failed.as_str())
        .fetch_one(pool)
        .await?;
        Ok(ImportOutcomeCounts {
            succeeded: row.0,
            failed: row.1,
        })
    }
}
