//! Part category entity model and DTOs.
//!
//! Categories form a tree through `parent_id`.

use itam_core::datetime::admin_format;
use itam_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `part_categories` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PartCategory {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub parent_id: Option<DbId>,
    pub depreciation_rule_id: Option<DbId>,
    #[serde(skip_serializing)]
    pub deleted_at: Option<Timestamp>,
    #[serde(serialize_with = "admin_format")]
    pub created_at: Timestamp,
    #[serde(serialize_with = "admin_format")]
    pub updated_at: Timestamp,
}

/// DTO for creating a new category. `parent_id = None` creates a root.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePartCategory {
    pub name: String,
    pub description: Option<String>,
    pub parent_id: Option<DbId>,
    pub depreciation_rule_id: Option<DbId>,
}
