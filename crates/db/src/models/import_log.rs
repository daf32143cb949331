//! Import log header and detail models.

use itam_core::datetime::admin_format;
use itam_core::import_log::ImportOutcome;
use itam_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `import_logs` table: one bulk import batch.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ImportLog {
    pub id: DbId,
    /// Entity kind that was imported (see `itam_core::import_log`).
    pub item: String,
    /// Admin user who ran the import.
    pub operator: DbId,
    #[serde(serialize_with = "admin_format")]
    pub created_at: Timestamp,
    #[serde(serialize_with = "admin_format")]
    pub updated_at: Timestamp,
}

/// DTO for opening a new import batch.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateImportLog {
    pub item: String,
    pub operator: DbId,
}

/// A row from the `import_log_details` table: one source row's outcome.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ImportLogDetail {
    pub id: DbId,
    pub log_id: DbId,
    pub status: String,
    pub log: Option<String>,
    #[serde(serialize_with = "admin_format")]
    pub created_at: Timestamp,
    #[serde(serialize_with = "admin_format")]
    pub updated_at: Timestamp,
}

impl ImportLogDetail {
    /// Parsed `status`. `None` if the stored value is unknown.
    pub fn outcome(&self) -> Option<ImportOutcome> {
        ImportOutcome::from_str(&self.status)
    }
}

/// DTO for recording one row's outcome against an existing log.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateImportLogDetail {
    pub log_id: DbId,
    pub status: ImportOutcome,
    pub log: Option<String>,
}

/// Per-batch tally of detail outcomes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportOutcomeCounts {
    pub succeeded: i64,
    pub failed: i64,
}
